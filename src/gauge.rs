// ============================================================================
// GAUGE SPECIFICATION
// ============================================================================

use std::collections::BTreeMap;

use bon::bon;

use crate::error::{Error, Result};
use crate::geometry::SWEEP_DEGREES;

/// Slack added to `range / interval` before flooring, so a quotient that
/// lands a hair under an integer still yields the closing tick.
const STEP_TOLERANCE: f64 = 1e-9;

/// Upper bound on ticks in one level.
pub const MAX_TICKS_PER_LEVEL: usize = 1_000_000;

/// One resolution of tick marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickLevel {
    /// Domain distance between neighbouring ticks.
    pub interval: f64,
    /// Tick length, measured inward from the dial arc.
    pub inset: f64,
}

impl TickLevel {
    pub const fn new(interval: f64, inset: f64) -> Self {
        Self { interval, inset }
    }
}

/// What to do when the label count differs from the major tick count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPolicy {
    /// Pair labels with ticks in order and leave the excess of either side out.
    #[default]
    Truncate,
    /// Refuse to build the gauge.
    Reject,
}

/// Which part of the scale a tick falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Normal,
    Warning,
}

/// A single generated tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Index into the spec's tick levels, 0 being the coarsest.
    pub level: usize,
    /// Position within its level, starting at the domain origin.
    pub index: usize,
    pub value: f64,
    pub angle: f64,
}

/// Immutable description of one dial face.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSpec {
    range: f64,
    red_threshold: f64,
    tick_levels: Vec<TickLevel>,
    labels: BTreeMap<usize, String>,
    label_policy: LabelPolicy,
}

#[bon]
impl GaugeSpec {
    #[builder]
    pub fn new(
        range: f64,
        red_threshold: f64,
        #[builder(default)] tick_levels: Vec<TickLevel>,
        #[builder(default)] labels: Vec<String>,
        #[builder(default)] label_policy: LabelPolicy,
    ) -> Result<Self> {
        if !(range.is_finite() && range > 0.0) {
            return Err(Error::invalid(format!("range must be positive, got {range}")));
        }
        if !(0.0..=range).contains(&red_threshold) {
            return Err(Error::invalid(format!(
                "red threshold {red_threshold} outside [0, {range}]"
            )));
        }
        for level in &tick_levels {
            if !(level.interval.is_finite() && level.interval > 0.0) {
                return Err(Error::invalid(format!(
                    "tick interval must be positive, got {}",
                    level.interval
                )));
            }
            if !(level.inset > 0.0 && level.inset < 1.0) {
                return Err(Error::invalid(format!(
                    "tick inset {} outside (0, 1)",
                    level.inset
                )));
            }
            match tick_count(range, level.interval) {
                Some(count) if count <= MAX_TICKS_PER_LEVEL => {}
                _ => {
                    return Err(Error::invalid(format!(
                        "tick interval {} yields more than {MAX_TICKS_PER_LEVEL} ticks over {range}",
                        level.interval
                    )))
                }
            }
        }

        let major_ticks = tick_levels
            .first()
            .and_then(|level| tick_count(range, level.interval))
            .unwrap_or(0);
        if label_policy == LabelPolicy::Reject && labels.len() != major_ticks {
            return Err(Error::LabelMismatch {
                labels: labels.len(),
                ticks: major_ticks,
            });
        }
        if labels.len() > major_ticks {
            tracing::debug!(
                labels = labels.len(),
                ticks = major_ticks,
                "dropping labels without a tick"
            );
        }
        let labels = labels.into_iter().take(major_ticks).enumerate().collect();

        Ok(Self {
            range,
            red_threshold,
            tick_levels,
            labels,
            label_policy,
        })
    }
}

impl GaugeSpec {
    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn red_threshold(&self) -> f64 {
        self.red_threshold
    }

    pub fn tick_levels(&self) -> &[TickLevel] {
        &self.tick_levels
    }

    pub fn label_policy(&self) -> LabelPolicy {
        self.label_policy
    }

    /// Dial angle where the warning zone starts.
    pub fn red_angle(&self) -> f64 {
        self.red_threshold / self.range * SWEEP_DEGREES
    }

    pub fn angle_of(&self, value: f64) -> f64 {
        value / self.range * SWEEP_DEGREES
    }

    /// Ticks below the red angle are normal; the red angle itself warns.
    pub fn zone(&self, angle: f64) -> Zone {
        if angle < self.red_angle() {
            Zone::Normal
        } else {
            Zone::Warning
        }
    }

    /// Ticks of one level, from 0 up to and including `range`.
    pub fn ticks(&self, level: usize) -> impl Iterator<Item = Tick> + '_ {
        let interval = self.tick_levels.get(level).map(|l| l.interval);
        let count = interval
            .and_then(|interval| tick_count(self.range, interval))
            .unwrap_or(0);
        (0..count).map(move |index| {
            let value = index as f64 * interval.unwrap_or_default();
            Tick {
                level,
                index,
                value,
                angle: self.angle_of(value),
            }
        })
    }

    /// Labels keyed by major tick index.
    pub fn labels(&self) -> &BTreeMap<usize, String> {
        &self.labels
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(&index).map(String::as_str)
    }
}

/// `floor(range / interval) + 1`: both domain endpoints are ticked.
///
/// `None` when the quotient is not a finite, non-negative count that fits
/// in `usize`.
pub fn tick_count(range: f64, interval: f64) -> Option<usize> {
    let steps = (range / interval + STEP_TOLERANCE).floor();
    if !(steps >= 0.0 && steps < usize::MAX as f64) {
        return None;
    }
    (steps as usize).checked_add(1)
}
