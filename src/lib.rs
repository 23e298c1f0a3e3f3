//! Analog dials driven by the calendar.
//!
//! A [`GaugeSpec`] describes a face, [`GaugeRenderer`] draws it onto any
//! [`DrawingSurface`], a [`NeedleController`] moves the needle, and an
//! [`AnimationLoop`] feeds clock samples through a [`DialMapping`] to every
//! dial at a fixed interval.

pub mod animation;
pub mod annotation;
pub mod clock;
pub mod config;
pub mod error;
pub mod face;
pub mod gauge;
pub mod geometry;
pub mod mapping;
pub mod needle;
pub mod raster;
pub mod surface;
pub mod window;

pub use animation::{AnimationLoop, Dial, LoopState};
pub use annotation::{Annotator, PointerButton, PointerEvent, PointerHandler};
pub use clock::{Clock, FixedClock, SystemClock, ThreadSleeper, Waiter};
pub use config::{Color, DashboardConfig};
pub use error::{Error, Result};
pub use face::{FaceStyle, GaugeRenderer};
pub use gauge::{GaugeSpec, LabelPolicy, Tick, TickLevel, Zone};
pub use geometry::{to_point, Point};
pub use mapping::{daily_angle, deadline_angle, weekly_angle, ClockSample, DialMapping};
pub use needle::{NeedleController, NeedleState};
pub use surface::{DrawingSurface, Layer, Scene};
