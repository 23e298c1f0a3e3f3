// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================

use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::surface::{Align, Bounds, DrawCommand, Scene, TextStyle};

/// Line widths and font sizes are given in points.
const PIXELS_PER_POINT: f64 = 96.0 / 72.0;

pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let font_error = |reason: String| Error::Font {
        path: path.display().to_string(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
    Font::try_from_vec(bytes).ok_or_else(|| font_error("not a TrueType/OpenType font".into()))
}

// ============================================================================
// PANELS AND PROJECTION
// ============================================================================

/// Pixel rectangle one dial is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PanelRect {
    /// Splits a `width` × `height` frame into `count` side-by-side columns.
    pub fn columns(width: usize, height: usize, count: usize) -> Vec<Self> {
        if count == 0 {
            return Vec::new();
        }
        let column = width / count;
        (0..count)
            .map(|i| Self {
                x: i * column,
                y: 0,
                width: if i + 1 == count { width - i * column } else { column },
                height,
            })
            .collect()
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x as f64
            && py >= self.y as f64
            && px < (self.x + self.width) as f64
            && py < (self.y + self.height) as f64
    }
}

/// Maps dial space onto a panel, y pointing up, centered, keeping `aspect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    center: Point,
    origin_x: f64,
    origin_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Projection {
    pub fn new(rect: PanelRect, bounds: Bounds, aspect: f64) -> Self {
        let aspect = if aspect > 0.0 { aspect } else { 1.0 };
        let scale_x = (rect.width as f64 / bounds.width())
            .min(rect.height as f64 / (bounds.height() * aspect));
        Self {
            center: bounds.center(),
            origin_x: rect.x as f64 + rect.width as f64 / 2.0,
            origin_y: rect.y as f64 + rect.height as f64 / 2.0,
            scale_x,
            scale_y: scale_x * aspect,
        }
    }

    pub fn to_pixel(&self, p: Point) -> (f64, f64) {
        (
            self.origin_x + (p.x - self.center.x) * self.scale_x,
            self.origin_y - (p.y - self.center.y) * self.scale_y,
        )
    }

    pub fn to_dial(&self, px: f64, py: f64) -> Point {
        Point::new(
            self.center.x + (px - self.origin_x) / self.scale_x,
            self.center.y - (py - self.origin_y) / self.scale_y,
        )
    }

    pub fn length(&self, d: f64) -> f64 {
        d * self.scale_x
    }
}

// ============================================================================
// CANVAS
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    clip: PanelRect,
}

impl<'a> Canvas<'a> {
    /// `frame` holds `width * height` RGBA pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let height = height.min(frame.len() / (width.max(1) * 4));
        Self {
            frame,
            width,
            height,
            clip: PanelRect {
                x: 0,
                y: 0,
                width,
                height,
            },
        }
    }

    pub fn clip_to(&mut self, rect: PanelRect) {
        self.clip = rect;
    }

    /// Fills the clip rectangle.
    pub fn clear(&mut self, color: Color) {
        let x_end = (self.clip.x + self.clip.width).min(self.width);
        let y_end = (self.clip.y + self.clip.height).min(self.height);
        for y in self.clip.y..y_end {
            for x in self.clip.x..x_end {
                let idx = (y * self.width + x) * 4;
                self.frame[idx..idx + 4].copy_from_slice(&[color.r, color.g, color.b, 0xff]);
            }
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || !self.clip.contains(x as f64, y as f64) {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, s) in src.iter().enumerate() {
            let d = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (s * a + d * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }
}

// ============================================================================
// SCENE RENDERING
// ============================================================================

/// Paints `scene` into `rect`, bottom layer first.
pub fn rasterize(canvas: &mut Canvas, rect: PanelRect, scene: &Scene, font: Option<&Font<'_>>) {
    canvas.clip_to(rect);
    canvas.clear(scene.background());
    let projection = Projection::new(rect, scene.viewport(), scene.aspect());

    for command in scene.layered() {
        match command {
            DrawCommand::Segment {
                from,
                to,
                width,
                color,
                ..
            } => {
                let (x0, y0) = projection.to_pixel(*from);
                let (x1, y1) = projection.to_pixel(*to);
                draw_thick_line_aa(canvas, x0, y0, x1, y1, points_to_pixels(*width), *color);
            }
            DrawCommand::Arc {
                center,
                radius,
                start_deg,
                end_deg,
                width,
                color,
                ..
            } => {
                let (cx, cy) = projection.to_pixel(*center);
                draw_arc_aa(
                    canvas,
                    cx,
                    cy,
                    projection.length(*radius),
                    *start_deg,
                    *end_deg,
                    points_to_pixels(*width),
                    *color,
                );
            }
            DrawCommand::Disc {
                center,
                radius,
                color,
                ..
            } => {
                let (cx, cy) = projection.to_pixel(*center);
                draw_disc_aa(canvas, cx, cy, projection.length(*radius), *color);
            }
            DrawCommand::Text {
                position,
                text,
                style,
                ..
            } => {
                if let Some(font) = font {
                    let (x, y) = projection.to_pixel(*position);
                    draw_text(canvas, x, y, text, font, style);
                }
            }
        }
    }
}

fn points_to_pixels(width: f32) -> f64 {
    (width as f64 * PIXELS_PER_POINT).max(1.0)
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    thickness: f64,
    color: Color,
) {
    let pad = thickness.ceil() + 1.0;
    let (min_x, max_x) = ((x0.min(x1) - pad) as i32, (x0.max(x1) + pad) as i32);
    let (min_y, max_y) = ((y0.min(y1) - pad) as i32, (y0.max(y1) + pad) as i32);
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            let t = if len_sq > 0.0 {
                (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = (x0 + t * dx - px).hypot(y0 + t * dy - py);
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.set_pixel(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_disc_aa(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color) {
    let reach = radius.ceil() as i32 + 1;
    let (bx, by) = (cx.floor() as i32, cy.floor() as i32);
    for y in by - reach..=by + reach {
        for x in bx - reach..=bx + reach {
            let dist = (x as f64 + 0.5 - cx).hypot(y as f64 + 0.5 - cy);
            let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
            if aa > 0.0 {
                canvas.set_pixel(x, y, color, aa as f32);
            }
        }
    }
}

/// Counter-clockwise arc from `start_deg` to `end_deg`, in screen degrees.
#[allow(clippy::too_many_arguments)]
fn draw_arc_aa(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    thickness: f64,
    color: Color,
) {
    let span = (end_deg - start_deg).rem_euclid(360.0);
    let span = if span == 0.0 && end_deg != start_deg { 360.0 } else { span };
    let half = thickness / 2.0;
    let reach = (radius + half).ceil() as i32 + 1;
    let (bx, by) = (cx.floor() as i32, cy.floor() as i32);
    for y in by - reach..=by + reach {
        for x in bx - reach..=bx + reach {
            let dx = x as f64 + 0.5 - cx;
            // Screen y grows downward.
            let dy = cy - (y as f64 + 0.5);
            let dist = dx.hypot(dy);
            let aa = (1.0 - ((dist - radius).abs() - half).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa <= 0.01 {
                continue;
            }
            let angle = dy.atan2(dx).to_degrees();
            if (angle - start_deg).rem_euclid(360.0) <= span {
                canvas.set_pixel(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_text(canvas: &mut Canvas, x: f64, y: f64, text: &str, font: &Font<'_>, style: &TextStyle) {
    let scale = Scale::uniform((style.size as f64 * PIXELS_PER_POINT) as f32);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    // Bounding box of the whole string
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    if min_x >= max_x || min_y >= max_y {
        return;
    }
    let width_px = max_x - min_x;
    let height_px = max_y - min_y;
    let offset_x = match style.align {
        Align::Center => x.round() as i32 - width_px / 2,
        Align::Left => x.round() as i32,
        Align::Right => x.round() as i32 - width_px,
    };
    let offset_y = y.round() as i32 - height_px / 2;

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.set_pixel(px, py, style.color, v);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::GaugeRenderer;
    use crate::gauge::{GaugeSpec, TickLevel};
    use crate::surface::{DrawingSurface, Layer};
    use pretty_assertions::assert_eq;

    #[test]
    fn columns_cover_the_frame() {
        let panels = PanelRect::columns(577, 192, 3);
        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0], PanelRect { x: 0, y: 0, width: 192, height: 192 });
        assert_eq!(panels[2].x + panels[2].width, 577);
    }

    #[test]
    fn projection_round_trips_and_flips_y() {
        let rect = PanelRect { x: 200, y: 0, width: 200, height: 100 };
        let projection = Projection::new(rect, Bounds::UNIT, 1.0);
        // Square viewport fits the height.
        assert_eq!(projection.to_pixel(Point::ORIGIN), (300.0, 50.0));
        assert_eq!(projection.to_pixel(Point::new(0.0, 1.0)), (300.0, 0.0));
        assert_eq!(projection.to_pixel(Point::new(1.0, 0.0)), (350.0, 50.0));
        let back = projection.to_dial(325.0, 75.0);
        assert!((back.x - 0.5).abs() < 1e-12 && (back.y + 0.5).abs() < 1e-12);
    }

    #[test]
    fn disc_fills_center_and_respects_clip() {
        let (w, h) = (40, 20);
        let mut frame = vec![0u8; w * h * 4];
        let mut scene = Scene::new();
        scene.set_background(Color::BLACK);
        scene.draw_disc(Point::ORIGIN, 0.5, Color::RED, Layer::Hub);

        let mut canvas = Canvas::new(&mut frame, w, h);
        let left = PanelRect { x: 0, y: 0, width: 20, height: 20 };
        rasterize(&mut canvas, left, &scene, None);

        assert_eq!(canvas.pixel(10, 10), Some([0xff, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(30, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn needle_overwrites_ticks_below_it() {
        let (w, h) = (64, 64);
        let mut frame = vec![0u8; w * h * 4];
        let mut scene = Scene::new();
        scene.draw_line_segment(Point::new(-1.0, 0.0), Point::new(1.0, 0.0), 3.0, Color::RED, Layer::Needle);
        scene.draw_line_segment(Point::new(-1.0, 0.0), Point::new(1.0, 0.0), 3.0, Color::WHITE, Layer::Scale);

        let mut canvas = Canvas::new(&mut frame, w, h);
        rasterize(&mut canvas, PanelRect { x: 0, y: 0, width: w, height: h }, &scene, None);
        assert_eq!(canvas.pixel(32, 32), Some([0xff, 0, 0, 0xff]));
    }

    #[test]
    fn arc_skips_the_bottom_gap() {
        let (w, h) = (100, 100);
        let mut frame = vec![0u8; w * h * 4];
        let spec = GaugeSpec::builder()
            .range(10.0)
            .red_threshold(10.0)
            .tick_levels(vec![TickLevel::new(10.0, 0.07)])
            .build()
            .unwrap();
        let mut scene = Scene::new();
        GaugeRenderer::default().render(&spec, &mut scene);

        let mut canvas = Canvas::new(&mut frame, w, h);
        rasterize(&mut canvas, PanelRect { x: 0, y: 0, width: w, height: h }, &scene, None);

        let gray = Some([0x80, 0x80, 0x80, 0xff]);
        // Top of the arc: y = 50 - 0.93 * 50.
        assert_eq!(canvas.pixel(50, 3), gray);
        // Bottom centre lies in the open quarter.
        assert_eq!(canvas.pixel(50, 96), Some([0, 0, 0, 0xff]));
    }
}
