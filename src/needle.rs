// ============================================================================
// NEEDLE
// ============================================================================

use crate::config::Color;
use crate::geometry::{to_point, Point};
use crate::surface::{DrawingSurface, Layer, ShapeId};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeedleState {
    /// Dial angle in degrees. Values outside `[0, 270]` overshoot the arc.
    pub angle_degrees: f64,
}

/// Owns one dial's needle and keeps its segment on the surface current.
#[derive(Debug, Clone)]
pub struct NeedleController {
    state: NeedleState,
    r_back: f64,
    r_front: f64,
    width: f32,
    color: Color,
    segment: Option<ShapeId>,
}

impl Default for NeedleController {
    fn default() -> Self {
        Self::new(-0.22, 0.88)
    }
}

impl NeedleController {
    /// `r_back` is negative: the tail sticks out behind the hub.
    pub fn new(r_back: f64, r_front: f64) -> Self {
        Self {
            state: NeedleState::default(),
            r_back,
            r_front,
            width: 1.5,
            color: Color::RED,
            segment: None,
        }
    }

    pub fn with_stroke(mut self, width: f32, color: Color) -> Self {
        self.width = width;
        self.color = color;
        self
    }

    pub fn state(&self) -> NeedleState {
        self.state
    }

    /// Tail and tip of the needle at its current angle.
    pub fn endpoints(&self) -> (Point, Point) {
        let angle = self.state.angle_degrees;
        (to_point(self.r_back, angle), to_point(self.r_front, angle))
    }

    /// Points the needle at `angle_degrees` and flushes the surface.
    pub fn update<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, angle_degrees: f64) {
        self.state.angle_degrees = angle_degrees;
        let (back, front) = self.endpoints();
        match self.segment {
            Some(id) => surface.move_line_segment(id, back, front),
            None => {
                let id = surface.draw_line_segment(back, front, self.width, self.color, Layer::Needle);
                self.segment = Some(id);
            }
        }
        surface.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, Scene};

    fn needle_segments(scene: &Scene) -> Vec<(Point, Point)> {
        scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Segment {
                    from,
                    to,
                    layer: Layer::Needle,
                    ..
                } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn update_replaces_previous_segment() {
        let mut scene = Scene::new();
        let mut needle = NeedleController::default();
        needle.update(&mut scene, 10.0);
        needle.update(&mut scene, 100.0);
        needle.update(&mut scene, 200.0);

        let segments = needle_segments(&scene);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0], (to_point(-0.22, 200.0), to_point(0.88, 200.0)));
        assert_eq!(scene.revision(), 3);
    }

    #[test]
    fn tail_points_away_from_tip() {
        let mut needle = NeedleController::default();
        let mut scene = Scene::new();
        needle.update(&mut scene, 135.0);
        let (back, front) = needle.endpoints();
        assert!(front.y > 0.0 && back.y < 0.0);
        assert!((back.norm() - 0.22).abs() < 1e-12);
        assert!((front.norm() - 0.88).abs() < 1e-12);
    }

    #[test]
    fn angle_is_not_clamped() {
        let mut scene = Scene::new();
        let mut needle = NeedleController::default();
        needle.update(&mut scene, 300.0);
        assert_eq!(needle.state().angle_degrees, 300.0);
        needle.update(&mut scene, -20.0);
        assert_eq!(needle.state().angle_degrees, -20.0);
    }

    #[test]
    fn stroke_is_configurable() {
        let mut scene = Scene::new();
        let mut needle = NeedleController::default().with_stroke(3.0, Color::WHITE);
        needle.update(&mut scene, 0.0);
        assert!(matches!(
            scene.commands()[0],
            DrawCommand::Segment { width, color: Color::WHITE, .. } if width == 3.0
        ));
    }
}
