//! Polar geometry shared by every dial.
//!
//! A dial angle of 0 points at screen direction 225° (lower left) and grows
//! clockwise over a 270° sweep that ends at screen direction -45°.

/// Angular span of every dial, in degrees.
pub const SWEEP_DEGREES: f64 = 270.0;

/// Screen direction of dial angle 0, in degrees counter-clockwise from +x.
pub const ZERO_DIRECTION_DEGREES: f64 = 225.0;

/// Point in dial space, where the face occupies the unit square `[-1, 1]²`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Same direction, rescaled to `radius`. The origin stays at the origin.
    pub fn with_norm(self, radius: f64) -> Self {
        let r = self.norm();
        if r == 0.0 {
            return self;
        }
        Self::new(self.x / r * radius, self.y / r * radius)
    }
}

/// Converts a dial angle into the screen direction it points at, in radians.
pub fn screen_radians(angle_degrees: f64) -> f64 {
    (ZERO_DIRECTION_DEGREES - angle_degrees).to_radians()
}

/// Point at `radius` along dial angle `angle_degrees`.
///
/// A negative radius lands on the opposite side of the hub, which is how the
/// needle tail is drawn.
pub fn to_point(radius: f64, angle_degrees: f64) -> Point {
    let theta = screen_radians(angle_degrees);
    Point::new(radius * theta.cos(), radius * theta.sin())
}
