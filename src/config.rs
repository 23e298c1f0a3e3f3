use std::path::PathBuf;
use std::time::Duration;

use bon::Builder;
use chrono::{Datelike, NaiveDate, Weekday};

use crate::animation::Dial;
use crate::error::Result;
use crate::face::{FaceStyle, GaugeRenderer};
use crate::gauge::{GaugeSpec, TickLevel};
use crate::mapping::{DialMapping, ACTIVE_HOURS};
use crate::needle::NeedleController;
use crate::surface::DrawingSurface;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);
    pub const RED: Self = Self::new(0xff, 0x00, 0x00);
    pub const GRAY: Self = Self::new(0x80, 0x80, 0x80);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

// ============================================================================
// DIAL PRESETS
// ============================================================================

/// Tick insets shared by all three dials, coarsest first.
const TICK_INSETS: [f64; 3] = [0.07, 0.05, 0.03];

/// Sub-divisions of an active day on the week dial.
const WEEK_STEPS_PER_DAY: f64 = ACTIVE_HOURS;

/// The week dial turns red six and a third days in.
const WEEK_RED_STEPS: f64 = 19.0 * 6.0;

const MINUTES_PER_DAY: f64 = ACTIVE_HOURS * 60.0;
const DAY_RED_MINUTES: f64 = 16.0 * 60.0;
const DAY_LABEL_HOURS: u32 = 3;

fn levels(intervals: [f64; 3]) -> Vec<TickLevel> {
    intervals
        .into_iter()
        .zip(TICK_INSETS)
        .map(|(interval, inset)| TickLevel::new(interval, inset))
        .collect()
}

/// One label every ten days: the month name where a new month starts,
/// otherwise the day of the month.
pub fn deadline_labels(start: NaiveDate, total_days: u32) -> Vec<String> {
    let mut labels = Vec::new();
    let mut last_month = None;
    for offset in (0..=total_days).step_by(10) {
        let Some(date) = start.checked_add_days(chrono::Days::new(u64::from(offset))) else {
            break;
        };
        if last_month == Some(date.month()) {
            labels.push(date.day().to_string());
        } else {
            labels.push(date.format("%b").to_string());
            last_month = Some(date.month());
        }
    }
    labels
}

/// Eight weekday names, closing the week on the day it opened.
pub fn week_labels(start: Weekday) -> Vec<String> {
    std::iter::successors(Some(start), |day| Some(day.succ()))
        .take(8)
        .map(|day| day.to_string())
        .collect()
}

/// Hours of the active day, every three hours.
pub fn day_labels(hour_start: u32) -> Vec<String> {
    (hour_start..=hour_start.saturating_add(ACTIVE_HOURS as u32))
        .step_by(DAY_LABEL_HOURS as usize)
        .map(|hour| hour.to_string())
        .collect()
}

// ============================================================================
// DASHBOARD CONFIGURATION
// ============================================================================

/// Everything needed to build and run the three calendar dials.
#[derive(Debug, Clone, Builder)]
pub struct DashboardConfig {
    /// Total running time of the animation.
    #[builder(default = Duration::from_secs(6 * 3600))]
    pub total: Duration,
    /// Time between samples.
    #[builder(default = Duration::from_secs(300))]
    pub interval: Duration,

    /// First day of the deadline countdown.
    pub deadline_start: NaiveDate,
    #[builder(default = 70)]
    pub deadline_days: u32,
    #[builder(default = 64.0)]
    pub deadline_red: f64,

    /// Hour the active day begins.
    #[builder(default = 6)]
    pub hour_start: u32,
    /// Weekday the week dial starts on.
    #[builder(default = Weekday::Thu)]
    pub week_start: Weekday,

    // Window configuration
    #[builder(default = 576)]
    pub window_width: u32,
    #[builder(default = 192)]
    pub window_height: u32,
    pub font_path: Option<PathBuf>,

    #[builder(default)]
    pub face: FaceStyle,
}

impl DashboardConfig {
    pub fn deadline_gauge(&self) -> Result<GaugeSpec> {
        GaugeSpec::builder()
            .range(f64::from(self.deadline_days))
            .red_threshold(self.deadline_red)
            .tick_levels(levels([10.0, 5.0, 1.0]))
            .labels(deadline_labels(self.deadline_start, self.deadline_days))
            .build()
    }

    pub fn week_gauge(&self) -> Result<GaugeSpec> {
        GaugeSpec::builder()
            .range(7.0 * WEEK_STEPS_PER_DAY)
            .red_threshold(WEEK_RED_STEPS)
            .tick_levels(levels([WEEK_STEPS_PER_DAY, 6.0, 1.0]))
            .labels(week_labels(self.week_start))
            .build()
    }

    pub fn day_gauge(&self) -> Result<GaugeSpec> {
        GaugeSpec::builder()
            .range(MINUTES_PER_DAY)
            .red_threshold(DAY_RED_MINUTES)
            .tick_levels(levels([180.0, 60.0, 10.0]))
            .labels(day_labels(self.hour_start))
            .build()
    }

    /// Gauges and their mappings, left to right.
    pub fn presets(&self) -> Result<Vec<(GaugeSpec, DialMapping)>> {
        Ok(vec![
            (
                self.deadline_gauge()?,
                DialMapping::Deadline {
                    reference: self.deadline_start,
                    hour_start: self.hour_start,
                    total_days: f64::from(self.deadline_days),
                },
            ),
            (
                self.week_gauge()?,
                DialMapping::Weekly {
                    week_start: self.week_start,
                    hour_start: self.hour_start,
                },
            ),
            (
                self.day_gauge()?,
                DialMapping::Daily {
                    hour_start: self.hour_start,
                },
            ),
        ])
    }

    /// Builds the three dials, asking `surface_for` for each dial's surface.
    pub fn dials<S, F>(&self, mut surface_for: F) -> Result<Vec<Dial<S>>>
    where
        S: DrawingSurface,
        F: FnMut(usize) -> S,
    {
        let renderer = GaugeRenderer::new(self.face.clone());
        Ok(self
            .presets()?
            .into_iter()
            .enumerate()
            .map(|(index, (spec, mapping))| {
                Dial::new(
                    spec,
                    mapping,
                    &renderer,
                    NeedleController::default(),
                    surface_for(index),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::surface::Scene;
    use pretty_assertions::assert_eq;

    fn config() -> DashboardConfig {
        DashboardConfig::builder()
            .deadline_start(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
            .build()
    }

    #[test]
    fn deadline_labels_mark_new_months() {
        let labels = deadline_labels(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(), 70);
        assert_eq!(labels, vec!["Feb", "11", "21", "Mar", "13", "23", "Apr", "12"]);
    }

    #[test]
    fn week_labels_wrap_to_start() {
        assert_eq!(
            week_labels(Weekday::Thu),
            vec!["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed", "Thu"]
        );
    }

    #[test]
    fn day_labels_every_three_hours() {
        assert_eq!(day_labels(6), vec!["6", "9", "12", "15", "18", "21", "24"]);
    }

    #[test]
    fn day_labels_stop_at_the_largest_hour() {
        assert_eq!(day_labels(u32::MAX), vec![u32::MAX.to_string()]);
        assert_eq!(day_labels(u32::MAX - 3).len(), 2);
    }

    #[test]
    fn presets_label_every_major_tick() {
        let config = config();
        for (spec, _) in config.presets().unwrap() {
            assert_eq!(spec.labels().len(), spec.ticks(0).count());
        }
    }

    #[test]
    fn week_gauge_turns_red_after_six_days() {
        let spec = config().week_gauge().unwrap();
        assert!((spec.red_angle() - 270.0 * 114.0 / 126.0).abs() < 1e-9);
    }

    #[test]
    fn dials_get_their_own_surface() {
        let mut made = Vec::new();
        let dials = config()
            .dials(|index| {
                made.push(index);
                Scene::new()
            })
            .unwrap();
        assert_eq!(made, vec![0, 1, 2]);
        assert_eq!(dials.len(), 3);
        assert!(dials.iter().all(|d| !d.surface().commands().is_empty()));
        assert_eq!(dials[2].mapping().name(), "day");
    }

    #[test]
    fn zero_day_deadline_is_invalid() {
        let config = DashboardConfig::builder()
            .deadline_start(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
            .deadline_days(0)
            .build();
        assert!(matches!(config.deadline_gauge(), Err(Error::InvalidConfiguration(_))));
    }
}
