// ============================================================================
// DRAWING SURFACE
// ============================================================================

use crate::config::Color;
use crate::geometry::Point;

/// Stacking order of dial elements. Later variants draw on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Face,
    Scale,
    Hub,
    Needle,
    Annotation,
}

/// Axis-aligned region of dial space mapped onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub const UNIT: Self = Self {
        x_min: -1.0,
        x_max: 1.0,
        y_min: -1.0,
        y_max: 1.0,
    };

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Center,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub align: Align,
    pub size: f32,
    pub color: Color,
}

/// Handle to a shape previously drawn on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(usize);

/// Everything a dial needs from whatever it is drawn on.
///
/// Coordinates are in dial space. Shapes persist until moved; a surface that
/// presents frames does so on `flush`.
pub trait DrawingSurface {
    fn set_viewport(&mut self, bounds: Bounds, aspect: f64);

    fn set_background(&mut self, color: Color);

    fn draw_line_segment(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Color,
        layer: Layer,
    ) -> ShapeId;

    /// Moves an existing segment. Unknown handles are ignored.
    fn move_line_segment(&mut self, id: ShapeId, from: Point, to: Point);

    /// Arc around `center`, with angles in screen degrees counter-clockwise
    /// from +x, drawn from `start_deg` to `end_deg`.
    #[allow(clippy::too_many_arguments)]
    fn draw_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        width: f32,
        color: Color,
        layer: Layer,
    ) -> ShapeId;

    fn draw_disc(&mut self, center: Point, radius: f64, color: Color, layer: Layer) -> ShapeId;

    fn draw_text(&mut self, position: Point, text: &str, style: &TextStyle, layer: Layer)
        -> ShapeId;

    fn flush(&mut self);
}

// ============================================================================
// RETAINED MODE SCENE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Segment {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
        layer: Layer,
    },
    Arc {
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        width: f32,
        color: Color,
        layer: Layer,
    },
    Disc {
        center: Point,
        radius: f64,
        color: Color,
        layer: Layer,
    },
    Text {
        position: Point,
        text: String,
        style: TextStyle,
        layer: Layer,
    },
}

impl DrawCommand {
    pub fn layer(&self) -> Layer {
        match self {
            DrawCommand::Segment { layer, .. }
            | DrawCommand::Arc { layer, .. }
            | DrawCommand::Disc { layer, .. }
            | DrawCommand::Text { layer, .. } => *layer,
        }
    }
}

/// Surface that records draw commands for later rasterization or inspection.
#[derive(Debug, Clone)]
pub struct Scene {
    viewport: Bounds,
    aspect: f64,
    background: Color,
    commands: Vec<DrawCommand>,
    revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            viewport: Bounds::UNIT,
            aspect: 1.0,
            background: Color::BLACK,
            commands: Vec::new(),
            revision: 0,
        }
    }

    pub fn viewport(&self) -> Bounds {
        self.viewport
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Commands in the order they were drawn.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn get(&self, id: ShapeId) -> Option<&DrawCommand> {
        self.commands.get(id.0)
    }

    /// Commands in paint order: by layer, then by draw order.
    pub fn layered(&self) -> Vec<&DrawCommand> {
        let mut ordered: Vec<&DrawCommand> = self.commands.iter().collect();
        ordered.sort_by_key(|command| command.layer());
        ordered
    }

    /// Number of completed flushes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn push(&mut self, command: DrawCommand) -> ShapeId {
        self.commands.push(command);
        ShapeId(self.commands.len() - 1)
    }
}

impl DrawingSurface for Scene {
    fn set_viewport(&mut self, bounds: Bounds, aspect: f64) {
        self.viewport = bounds;
        self.aspect = aspect;
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn draw_line_segment(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Color,
        layer: Layer,
    ) -> ShapeId {
        self.push(DrawCommand::Segment {
            from,
            to,
            width,
            color,
            layer,
        })
    }

    fn move_line_segment(&mut self, id: ShapeId, new_from: Point, new_to: Point) {
        match self.commands.get_mut(id.0) {
            Some(DrawCommand::Segment { from, to, .. }) => {
                *from = new_from;
                *to = new_to;
            }
            other => tracing::warn!(?id, found = ?other, "move_line_segment on a non-segment"),
        }
    }

    fn draw_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        width: f32,
        color: Color,
        layer: Layer,
    ) -> ShapeId {
        self.push(DrawCommand::Arc {
            center,
            radius,
            start_deg,
            end_deg,
            width,
            color,
            layer,
        })
    }

    fn draw_disc(&mut self, center: Point, radius: f64, color: Color, layer: Layer) -> ShapeId {
        self.push(DrawCommand::Disc {
            center,
            radius,
            color,
            layer,
        })
    }

    fn draw_text(
        &mut self,
        position: Point,
        text: &str,
        style: &TextStyle,
        layer: Layer,
    ) -> ShapeId {
        self.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            style: style.clone(),
            layer,
        })
    }

    fn flush(&mut self) {
        self.revision += 1;
    }
}
