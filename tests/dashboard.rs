use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use pretty_assertions::assert_eq;

use timedial::surface::DrawCommand;
use timedial::{
    AnimationLoop, Annotator, Clock, ClockSample, DashboardConfig, Layer, LoopState, Point,
    PointerButton, PointerEvent, PointerHandler, Scene, Waiter,
};

/// Advances by a fixed step on every sample.
struct SteppingClock {
    now: NaiveDateTime,
    step: chrono::Duration,
}

impl Clock for SteppingClock {
    fn sample(&mut self) -> ClockSample {
        let sample = ClockSample::from_datetime(self.now);
        self.now += self.step;
        sample
    }
}

#[derive(Default)]
struct NoWait {
    calls: usize,
}

impl Waiter for NoWait {
    fn wait(&mut self, _interval: Duration) {
        self.calls += 1;
    }
}

fn config() -> DashboardConfig {
    DashboardConfig::builder()
        .deadline_start(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap())
        .week_start(Weekday::Mon)
        .total(Duration::from_secs(1800))
        .interval(Duration::from_secs(300))
        .build()
}

fn animation(start: NaiveDateTime) -> AnimationLoop<SteppingClock, Scene> {
    let config = config();
    let dials = config.dials(|_| Scene::new()).unwrap();
    let clock = SteppingClock {
        now: start,
        step: chrono::Duration::minutes(5),
    };
    AnimationLoop::new(clock, dials, config.total, config.interval)
        .unwrap()
        .with_annotator(Annotator::new(config.face.label_radius()))
}

fn monday_noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn needle_count(scene: &Scene) -> usize {
    scene
        .commands()
        .iter()
        .filter(|c| c.layer() == Layer::Needle)
        .count()
}

#[test]
fn half_hour_budget_runs_six_cycles() {
    let mut animation = animation(monday_noon());
    let mut waiter = NoWait::default();
    assert_eq!(animation.run(&mut waiter), 6);
    assert_eq!(waiter.calls, 6);
    assert_eq!(animation.state(), LoopState::Stopped);
    for dial in animation.dials() {
        assert_eq!(needle_count(dial.surface()), 1);
        assert_eq!(dial.surface().revision(), 6);
    }
}

#[test]
fn needles_track_the_clock() {
    let mut animation = animation(monday_noon());
    animation.step();
    let angles: Vec<f64> = animation
        .dials()
        .iter()
        .map(|d| d.needle().state().angle_degrees)
        .collect();

    // 18 days and 6 work hours into the countdown.
    let deadline = 270.0 * (18.0 + 6.0 / 18.0) / 70.0;
    // Monday opens the week.
    let week = 270.0 * (6.0 / 18.0) / 7.0;
    let day = 90.625;
    for (got, want) in angles.iter().zip([deadline, week, day]) {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }

    animation.step();
    let day_after = animation.dials()[2].needle().state().angle_degrees;
    assert!((day_after - day - 270.0 * (5.0 / 60.0) / 18.0).abs() < 1e-9);
}

#[test]
fn faces_are_drawn_once_before_animation() {
    let animation = animation(monday_noon());
    let faces: Vec<(usize, usize)> = animation
        .dials()
        .iter()
        .map(|d| {
            let commands = d.surface().commands();
            let ticks = commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Segment { layer: Layer::Scale, .. }))
                .count();
            let labels = commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Text { .. }))
                .count();
            (ticks, labels)
        })
        .collect();
    assert_eq!(
        faces,
        vec![
            (8 + 15 + 71, 8),
            (8 + 22 + 127, 8),
            (7 + 19 + 109, 7),
        ]
    );
}

#[test]
fn clicks_mark_only_the_target_dial() {
    let mut animation = animation(monday_noon());
    let hub_click = PointerEvent {
        position: Point::new(0.1, 0.0),
        button: PointerButton::Primary,
    };
    let ring_click = PointerEvent {
        position: Point::new(0.0, 0.5),
        button: PointerButton::Other,
    };
    assert!(!animation.on_pointer(0, hub_click));
    assert!(animation.on_pointer(2, ring_click));

    let markers: Vec<Point> = animation.dials()[2]
        .surface()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Disc {
                center,
                layer: Layer::Annotation,
                ..
            } => Some(*center),
            _ => None,
        })
        .collect();
    assert_eq!(markers.len(), 1);
    assert!((markers[0].y - 0.75).abs() < 1e-9);
    assert!(animation.dials()[0]
        .surface()
        .commands()
        .iter()
        .all(|c| c.layer() != Layer::Annotation));
}
