//! Click markers on the label ring.
//!
//! Optional: the dials run without it. A front end translates its own mouse
//! events into [`PointerEvent`]s in dial space and hands them to a
//! [`PointerHandler`].

use crate::config::Color;
use crate::geometry::Point;
use crate::surface::{DrawingSurface, Layer};

const PRIMARY_MARKER: Color = Color::new(0x1f, 0x77, 0xb4);
const SECONDARY_MARKER: Color = Color::new(0xff, 0x7f, 0x0e);
const OTHER_MARKER: Color = Color::new(0x2c, 0xa0, 0x2c);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in the dial's own coordinates.
    pub position: Point,
    pub button: PointerButton,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Point,
    pub color: Color,
}

/// Receives pointer events for a panel of dials.
pub trait PointerHandler {
    /// Returns whether the event changed anything on screen.
    fn on_pointer(&mut self, panel: usize, event: PointerEvent) -> bool;
}

/// Projects clicks onto the label ring and drops a marker there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotator {
    dead_zone: f64,
    ring_radius: f64,
    marker_radius: f64,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(0.93 - 0.18)
    }
}

impl Annotator {
    pub fn new(ring_radius: f64) -> Self {
        Self {
            dead_zone: 0.25,
            ring_radius,
            marker_radius: 0.035,
        }
    }

    /// Where a click would leave its marker, or `None` inside the dead zone
    /// around the hub.
    pub fn place(&self, event: PointerEvent) -> Option<Marker> {
        if event.position.norm() < self.dead_zone {
            return None;
        }
        let color = match event.button {
            PointerButton::Primary => PRIMARY_MARKER,
            PointerButton::Secondary => SECONDARY_MARKER,
            PointerButton::Other => OTHER_MARKER,
        };
        Some(Marker {
            position: event.position.with_norm(self.ring_radius),
            color,
        })
    }

    pub fn annotate<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        event: PointerEvent,
    ) -> Option<Marker> {
        let marker = self.place(event)?;
        tracing::debug!(?event, ?marker, "annotation placed");
        surface.draw_disc(marker.position, self.marker_radius, marker.color, Layer::Annotation);
        surface.flush();
        Some(marker)
    }
}
