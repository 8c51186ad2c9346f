use std::path::Path;
use std::rc::Rc;

use clap::Args;
use yearturn_core::{Clock, CountdownSession, Event, ManualClock, ThresholdMode};

use super::load_config;
use crate::terminal;

#[derive(Args)]
pub struct SimulateArgs {
    /// Seconds before the deadline the simulated clock starts
    #[arg(long, default_value_t = 40)]
    pub lead: u64,
    /// Simulated seconds between ticks
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub step: u64,
    /// Press play/pause once this many simulated seconds have passed (repeatable)
    #[arg(long = "toggle-at")]
    pub toggle_at: Vec<u64>,
    /// Override the configured threshold mode (exact, crossing)
    #[arg(long)]
    pub mode: Option<ThresholdMode>,
    /// Let audio start without a prior key press
    #[arg(long)]
    pub allow_autoplay: bool,
}

fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn seconds(flag: &str, secs: u64) -> Result<chrono::Duration, String> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| format!("{flag} {secs} is out of range"))
}

pub fn run(explicit: Option<&Path>, args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(explicit)?;
    let mut settings = config.session_settings()?;
    if let Some(mode) = args.mode {
        settings.threshold_mode = mode;
    }
    let lead = seconds("--lead", args.lead)?;
    let step = seconds("--step", args.step)?;
    let start = settings
        .deadline
        .at()
        .checked_sub_signed(lead)
        .ok_or("--lead reaches before the earliest representable time")?;

    let clock = Rc::new(ManualClock::new(start));
    let (caps, screen) = terminal::capabilities(&config.audio);
    if args.allow_autoplay {
        screen.gate.open();
    }
    let mut session = CountdownSession::start(settings, Box::new(Rc::clone(&clock)), caps);

    let mut toggles = args.toggle_at;
    toggles.sort_unstable();
    let mut pending = toggles.into_iter().peekable();
    let mut elapsed = 0u64;

    loop {
        while pending.next_if(|at| *at <= elapsed).is_some() {
            screen.gate.open();
            if let Some(event) = session.toggle_play_pause() {
                emit(&event)?;
            }
        }
        for event in session.tick() {
            emit(&event)?;
        }
        if session.is_complete() {
            break;
        }
        let next = clock
            .now()
            .checked_add_signed(step)
            .ok_or("--step moves the clock past the latest representable time")?;
        clock.set(next);
        elapsed = elapsed.saturating_add(args.step);
    }

    emit(&session.snapshot())?;
    Ok(())
}
