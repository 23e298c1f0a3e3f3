// ============================================================================
// ANIMATION LOOP
// ============================================================================

use std::time::Duration;

use crate::annotation::{Annotator, PointerEvent, PointerHandler};
use crate::clock::{Clock, Waiter};
use crate::error::{Error, Result};
use crate::face::GaugeRenderer;
use crate::gauge::GaugeSpec;
use crate::mapping::{ClockSample, DialMapping};
use crate::needle::NeedleController;
use crate::surface::DrawingSurface;

/// One gauge: its face, the mapping feeding it, its needle and its surface.
#[derive(Debug)]
pub struct Dial<S> {
    spec: GaugeSpec,
    mapping: DialMapping,
    needle: NeedleController,
    surface: S,
}

impl<S: DrawingSurface> Dial<S> {
    /// Draws the face onto `surface` and takes ownership of it.
    pub fn new(
        spec: GaugeSpec,
        mapping: DialMapping,
        renderer: &GaugeRenderer,
        needle: NeedleController,
        mut surface: S,
    ) -> Self {
        renderer.render(&spec, &mut surface);
        Self {
            spec,
            mapping,
            needle,
            surface,
        }
    }

    pub fn spec(&self) -> &GaugeSpec {
        &self.spec
    }

    pub fn mapping(&self) -> &DialMapping {
        &self.mapping
    }

    pub fn needle(&self) -> &NeedleController {
        &self.needle
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Maps `sample` and moves the needle there. Returns the angle shown.
    pub fn show(&mut self, sample: &ClockSample, interval: Duration) -> f64 {
        let angle = self.mapping.angle(sample, interval);
        self.needle.update(&mut self.surface, angle);
        angle
    }

    /// Drops a marker for a click, unless it falls in the dead zone.
    pub fn annotate(&mut self, annotator: &Annotator, event: PointerEvent) -> bool {
        annotator.annotate(&mut self.surface, event).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Samples the clock every `interval` and moves every dial, until `total`
/// has been spent.
#[derive(Debug)]
pub struct AnimationLoop<C, S> {
    clock: C,
    dials: Vec<Dial<S>>,
    interval: Duration,
    remaining: Duration,
    cycles: u64,
    state: LoopState,
    annotator: Option<Annotator>,
}

impl<C: Clock, S: DrawingSurface> AnimationLoop<C, S> {
    pub fn new(clock: C, dials: Vec<Dial<S>>, total: Duration, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::invalid("sample interval must be positive"));
        }
        Ok(Self {
            clock,
            dials,
            interval,
            remaining: total,
            cycles: 0,
            state: LoopState::Running,
            annotator: None,
        })
    }

    /// Accept click annotations through [`PointerHandler`].
    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = Some(annotator);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Completed sample/update cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn dials(&self) -> &[Dial<S>] {
        &self.dials
    }

    pub fn dial_mut(&mut self, index: usize) -> Option<&mut Dial<S>> {
        self.dials.get_mut(index)
    }

    /// Runs one cycle if time remains, without waiting afterwards.
    ///
    /// A cycle is sample, update, wait, decrement. The wait belongs to the
    /// caller, so `remaining` is charged for it here, ahead of time: after
    /// `Running`, wait `interval` before stepping again. Only the order of
    /// the bookkeeping differs; the cycle count is `ceil(total / interval)`
    /// either way.
    pub fn step(&mut self) -> LoopState {
        if self.state == LoopState::Stopped {
            return LoopState::Stopped;
        }
        if self.remaining.is_zero() {
            self.state = LoopState::Stopped;
            tracing::info!(cycles = self.cycles, "animation finished");
            return LoopState::Stopped;
        }

        let sample = self.clock.sample();
        let interval = self.interval;
        let angles: Vec<f64> = self
            .dials
            .iter_mut()
            .map(|dial| dial.show(&sample, interval))
            .collect();
        self.cycles += 1;
        self.remaining = self.remaining.saturating_sub(interval);
        tracing::debug!(
            cycle = self.cycles,
            ?angles,
            remaining_secs = self.remaining.as_secs(),
            "dials updated"
        );
        LoopState::Running
    }

    /// Steps and waits until the time budget is spent. Returns the number of
    /// cycles run.
    pub fn run<W: Waiter + ?Sized>(&mut self, waiter: &mut W) -> u64 {
        tracing::info!(
            total_secs = self.remaining.as_secs(),
            interval_secs = self.interval.as_secs(),
            dials = self.dials.len(),
            "animation started"
        );
        while self.step() == LoopState::Running {
            waiter.wait(self.interval);
        }
        self.cycles
    }
}

impl<C: Clock, S: DrawingSurface> PointerHandler for AnimationLoop<C, S> {
    fn on_pointer(&mut self, panel: usize, event: PointerEvent) -> bool {
        let Some(annotator) = self.annotator else {
            return false;
        };
        self.dials
            .get_mut(panel)
            .is_some_and(|dial| dial.annotate(&annotator, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::gauge::TickLevel;
    use crate::surface::Scene;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[derive(Default)]
    struct CountingWaiter {
        waits: Vec<Duration>,
    }

    impl Waiter for CountingWaiter {
        fn wait(&mut self, interval: Duration) {
            self.waits.push(interval);
        }
    }

    fn noon() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    fn day_dial() -> Dial<Scene> {
        let spec = GaugeSpec::builder()
            .range(1080.0)
            .red_threshold(960.0)
            .tick_levels(vec![TickLevel::new(180.0, 0.07)])
            .build()
            .unwrap();
        Dial::new(
            spec,
            DialMapping::Daily { hour_start: 6 },
            &GaugeRenderer::default(),
            NeedleController::default(),
            Scene::new(),
        )
    }

    fn looped(total: u64, interval: u64) -> AnimationLoop<FixedClock, Scene> {
        AnimationLoop::new(
            noon(),
            vec![day_dial()],
            Duration::from_secs(total),
            Duration::from_secs(interval),
        )
        .unwrap()
    }

    #[rstest]
    #[case(600, 300, 2)]
    #[case(0, 300, 0)]
    #[case(601, 300, 3)]
    #[case(21600, 300, 72)]
    #[case(100, 300, 1)]
    fn runs_ceil_total_over_interval_cycles(#[case] total: u64, #[case] interval: u64, #[case] cycles: u64) {
        let mut animation = looped(total, interval);
        let mut waiter = CountingWaiter::default();
        assert_eq!(animation.run(&mut waiter), cycles);
        assert_eq!(animation.state(), LoopState::Stopped);
        assert_eq!(waiter.waits.len() as u64, cycles);
        assert!(waiter.waits.iter().all(|w| *w == Duration::from_secs(interval)));
    }

    #[test]
    fn every_cycle_moves_and_flushes_every_dial() {
        let mut animation = AnimationLoop::new(
            noon(),
            vec![day_dial(), day_dial()],
            Duration::from_secs(600),
            Duration::from_secs(300),
        )
        .unwrap();
        animation.run(&mut CountingWaiter::default());
        for dial in animation.dials() {
            assert_eq!(dial.surface().revision(), 2);
            assert!((dial.needle().state().angle_degrees - 90.625).abs() < 1e-9);
        }
    }

    #[test]
    fn each_cycle_is_charged_one_interval_before_its_wait() {
        let mut animation = looped(500, 300);
        let mut waiter = CountingWaiter::default();

        assert_eq!(animation.step(), LoopState::Running);
        assert_eq!(animation.remaining(), Duration::from_secs(200));
        assert!(waiter.waits.is_empty());
        waiter.wait(animation.interval());

        assert_eq!(animation.step(), LoopState::Running);
        assert_eq!(animation.remaining(), Duration::ZERO);
        waiter.wait(animation.interval());

        assert_eq!(animation.step(), LoopState::Stopped);
        assert_eq!(animation.cycles(), 2);
        assert_eq!(waiter.waits.len(), 2);
    }

    #[test]
    fn stepping_after_stop_does_nothing() {
        let mut animation = looped(300, 300);
        assert_eq!(animation.step(), LoopState::Running);
        assert_eq!(animation.step(), LoopState::Stopped);
        assert_eq!(animation.step(), LoopState::Stopped);
        assert_eq!(animation.cycles(), 1);
        assert_eq!(animation.dials()[0].surface().revision(), 1);
    }

    #[test]
    fn pointer_events_reach_the_clicked_dial() {
        use crate::annotation::PointerButton;
        use crate::geometry::Point;

        let mut animation = AnimationLoop::new(
            noon(),
            vec![day_dial(), day_dial()],
            Duration::from_secs(300),
            Duration::from_secs(300),
        )
        .unwrap();
        let event = PointerEvent {
            position: Point::new(0.6, 0.0),
            button: PointerButton::Secondary,
        };
        assert!(!animation.on_pointer(1, event));

        let mut animation = animation.with_annotator(Annotator::default());
        assert!(animation.on_pointer(1, event));
        assert!(!animation.on_pointer(5, event));
        assert_eq!(animation.dials()[0].surface().revision(), 0);
        assert_eq!(animation.dials()[1].surface().revision(), 1);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let result = AnimationLoop::new(noon(), vec![day_dial()], Duration::from_secs(10), Duration::ZERO);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }
}
