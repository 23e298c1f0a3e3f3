//! Time sources and suspension for the animation loop.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};

use crate::mapping::ClockSample;

/// Anything that can read the current wall-clock time.
pub trait Clock {
    fn sample(&mut self) -> ClockSample;
}

/// Local time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sample(&mut self) -> ClockSample {
        ClockSample::from_datetime(Local::now().naive_local())
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn sample(&mut self) -> ClockSample {
        ClockSample::from_datetime(self.0)
    }
}

/// Blocks between animation cycles.
pub trait Waiter {
    fn wait(&mut self, interval: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Waiter for ThreadSleeper {
    fn wait(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}
