// ============================================================================
// DIAL FACE RENDERING
// ============================================================================

use bon::Builder;

use crate::config::Color;
use crate::gauge::{GaugeSpec, Zone};
use crate::geometry::{to_point, Point, SWEEP_DEGREES, ZERO_DIRECTION_DEGREES};
use crate::surface::{Align, Bounds, DrawingSurface, Layer, TextStyle};

/// Fixed dimensions and colors of a dial face, in dial-space units.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct FaceStyle {
    #[builder(default = 0.93)]
    pub arc_radius: f64,
    #[builder(default = 0.06)]
    pub hub_radius: f64,
    /// Distance from the arc to the label centers.
    #[builder(default = 0.18)]
    pub label_inset: f64,
    #[builder(default = 1.5)]
    pub arc_width: f32,
    #[builder(default = 1.0)]
    pub tick_width: f32,
    #[builder(default = 9.0)]
    pub label_size: f32,

    #[builder(default = Color::BLACK)]
    pub background: Color,
    #[builder(default = Color::GRAY)]
    pub arc_color: Color,
    #[builder(default = Color::GRAY)]
    pub hub_color: Color,
    #[builder(default = Color::WHITE)]
    pub tick_color: Color,
    #[builder(default = Color::RED)]
    pub warning_color: Color,
    #[builder(default = Color::WHITE)]
    pub label_color: Color,
}

impl Default for FaceStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FaceStyle {
    pub fn label_radius(&self) -> f64 {
        self.arc_radius - self.label_inset
    }
}

/// Draws the static part of a dial: arc, hub, ticks and labels.
#[derive(Debug, Clone, Default)]
pub struct GaugeRenderer {
    style: FaceStyle,
}

impl GaugeRenderer {
    pub fn new(style: FaceStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &FaceStyle {
        &self.style
    }

    pub fn render<S: DrawingSurface + ?Sized>(&self, spec: &GaugeSpec, surface: &mut S) {
        let style = &self.style;
        surface.set_viewport(Bounds::UNIT, 1.0);
        surface.set_background(style.background);

        // The arc runs counter-clockwise from the end of the sweep to its start.
        surface.draw_arc(
            Point::ORIGIN,
            style.arc_radius,
            ZERO_DIRECTION_DEGREES - SWEEP_DEGREES,
            ZERO_DIRECTION_DEGREES,
            style.arc_width,
            style.arc_color,
            Layer::Face,
        );
        surface.draw_disc(Point::ORIGIN, style.hub_radius, style.hub_color, Layer::Hub);

        for (level, tick_level) in spec.tick_levels().iter().enumerate() {
            let inner = style.arc_radius - tick_level.inset;
            for tick in spec.ticks(level) {
                let color = match spec.zone(tick.angle) {
                    Zone::Normal => style.tick_color,
                    Zone::Warning => style.warning_color,
                };
                surface.draw_line_segment(
                    to_point(style.arc_radius, tick.angle),
                    to_point(inner, tick.angle),
                    style.tick_width,
                    color,
                    Layer::Scale,
                );
            }
        }

        let text = TextStyle {
            align: Align::Center,
            size: style.label_size,
            color: style.label_color,
        };
        for tick in spec.ticks(0) {
            if let Some(label) = spec.label(tick.index) {
                surface.draw_text(to_point(style.label_radius(), tick.angle), label, &text, Layer::Scale);
            }
        }
    }
}
