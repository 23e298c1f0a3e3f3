//! Calendar readings to needle angles.
//!
//! Every mapping is a pure function of a [`ClockSample`] and fixed reference
//! points. Out-of-range inputs are passed through; only the deadline mapping
//! clamps hours before the start of the working day.

use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::geometry::SWEEP_DEGREES;

/// Length of the active day the dials count, in hours.
pub const ACTIVE_HOURS: f64 = 18.0;

pub const DAYS_PER_WEEK: i64 = 7;

/// One reading of the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSample {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Days since Monday, Monday being 0.
    pub weekday: u32,
}

impl ClockSample {
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            date: at.date(),
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
            weekday: at.weekday().num_days_from_monday(),
        }
    }
}

/// Hours into the working day, with earlier hours counting as zero.
fn work_hours(sample: &ClockSample, hour_start: u32) -> f64 {
    (i64::from(sample.hour) - i64::from(hour_start)).max(0) as f64
}

/// Progress through a multi-week countdown of `total_days`.
pub fn deadline_angle(
    sample: &ClockSample,
    reference: NaiveDate,
    hour_start: u32,
    total_days: f64,
) -> f64 {
    let elapsed_days = (sample.date - reference).num_days() as f64;
    let work_hour = work_hours(sample, hour_start);
    SWEEP_DEGREES * (elapsed_days + work_hour / ACTIVE_HOURS) / total_days
}

/// Progress through a week that starts on `week_start`.
pub fn weekly_angle(sample: &ClockSample, week_start: Weekday, hour_start: u32) -> f64 {
    let offset = i64::from(week_start.num_days_from_monday());
    let workday = (DAYS_PER_WEEK + i64::from(sample.weekday) - offset).rem_euclid(DAYS_PER_WEEK);
    let work_hour = work_hours(sample, hour_start);
    let minute = f64::from(sample.minute) / 60.0 / ACTIVE_HOURS;
    SWEEP_DEGREES * (workday as f64 + work_hour / ACTIVE_HOURS + minute) / DAYS_PER_WEEK as f64
}

/// Progress through the active day.
///
/// The reading is pushed forward by half a sample interval so the needle
/// shows the middle of the period until the next sample.
pub fn daily_angle(sample: &ClockSample, hour_start: u32, interval: Duration) -> f64 {
    let hours = i64::from(sample.hour) - i64::from(hour_start);
    let half_step = interval.as_secs_f64() / 2.0 / 3600.0;
    SWEEP_DEGREES
        * (hours as f64
            + f64::from(sample.minute) / 60.0
            + f64::from(sample.second) / 3600.0
            + half_step)
        / ACTIVE_HOURS
}

/// The mapping a dial applies to each sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialMapping {
    Deadline {
        reference: NaiveDate,
        hour_start: u32,
        total_days: f64,
    },
    Weekly {
        week_start: Weekday,
        hour_start: u32,
    },
    Daily {
        hour_start: u32,
    },
}

impl DialMapping {
    pub fn angle(&self, sample: &ClockSample, interval: Duration) -> f64 {
        match *self {
            DialMapping::Deadline {
                reference,
                hour_start,
                total_days,
            } => deadline_angle(sample, reference, hour_start, total_days),
            DialMapping::Weekly {
                week_start,
                hour_start,
            } => weekly_angle(sample, week_start, hour_start),
            DialMapping::Daily { hour_start } => daily_angle(sample, hour_start, interval),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DialMapping::Deadline { .. } => "deadline",
            DialMapping::Weekly { .. } => "week",
            DialMapping::Daily { .. } => "day",
        }
    }
}
