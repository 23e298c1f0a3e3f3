use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate, Weekday};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use timedial::raster::load_font;
use timedial::window::{run_window, WindowOptions};
use timedial::{
    AnimationLoop, Annotator, DashboardConfig, LoopState, Scene, SystemClock, ThreadSleeper, Waiter,
};

/// Deadline, week and day dials that follow the clock.
#[derive(Debug, Parser)]
#[command(name = "timedial", version)]
struct Cli {
    /// Total running time in seconds.
    #[arg(long, default_value_t = 6 * 3600)]
    duration: u64,

    /// Seconds between clock samples.
    #[arg(long, default_value_t = 300)]
    interval: u64,

    /// First day of the deadline countdown (YYYY-MM-DD). Defaults to the
    /// first day of the current month.
    #[arg(long)]
    deadline_start: Option<NaiveDate>,

    /// Length of the deadline countdown in days.
    #[arg(long, default_value_t = 70)]
    deadline_days: u32,

    /// Day of the countdown where the scale turns red.
    #[arg(long, default_value_t = 64.0)]
    deadline_red: f64,

    /// Hour the active day starts.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=24))]
    hour_start: u32,

    /// Weekday the week dial starts on.
    #[arg(long, default_value_t = Weekday::Thu)]
    week_start: Weekday,

    /// TrueType/OpenType font for the scale labels.
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, default_value_t = 576)]
    width: u32,

    #[arg(long, default_value_t = 192)]
    height: u32,

    /// Log the needle angles instead of opening a window.
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn config(&self) -> DashboardConfig {
        let today = Local::now().date_naive();
        let deadline_start = self
            .deadline_start
            .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
        DashboardConfig::builder()
            .total(Duration::from_secs(self.duration))
            .interval(Duration::from_secs(self.interval))
            .deadline_start(deadline_start)
            .deadline_days(self.deadline_days)
            .deadline_red(self.deadline_red)
            .hour_start(self.hour_start)
            .week_start(self.week_start)
            .window_width(self.width)
            .window_height(self.height)
            .maybe_font_path(self.font.clone())
            .build()
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    tracing::info!(
        deadline_start = %config.deadline_start,
        week_start = %config.week_start,
        hour_start = config.hour_start,
        "building dials"
    );

    let dials = config
        .dials(|_| Scene::new())
        .context("invalid dial configuration")?;
    let animation = AnimationLoop::new(SystemClock, dials, config.total, config.interval)?
        .with_annotator(Annotator::new(config.face.label_radius()));

    if cli.headless {
        run_headless(animation);
        return Ok(());
    }

    let font = match &config.font_path {
        Some(path) => Some(load_font(path)?),
        None => {
            tracing::warn!("no --font given, scale labels will not be drawn");
            None
        }
    };
    let options = WindowOptions {
        title: "timedial".to_string(),
        width: config.window_width,
        height: config.window_height,
    };
    run_window(animation, options, font).context("window failed")?;
    Ok(())
}

fn run_headless(mut animation: AnimationLoop<SystemClock, Scene>) {
    let mut sleeper = ThreadSleeper;
    while animation.step() == LoopState::Running {
        for dial in animation.dials() {
            tracing::info!(
                dial = dial.mapping().name(),
                angle = dial.needle().state().angle_degrees,
                "needle"
            );
        }
        sleeper.wait(animation.interval());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_start_past_midnight_is_refused() {
        assert!(Cli::try_parse_from(["timedial", "--hour-start", "25"]).is_err());
        let cli = Cli::try_parse_from(["timedial", "--hour-start", "24"]).unwrap();
        assert_eq!(cli.hour_start, 24);
    }
}
