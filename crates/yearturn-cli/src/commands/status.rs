use std::path::Path;

use yearturn_core::{CountdownSession, SystemClock};

use super::load_config;
use crate::terminal;

/// Tick a fresh session once against the real clock and print its state.
pub fn run(explicit: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(explicit)?;
    let settings = config.session_settings()?;
    let (caps, _screen) = terminal::capabilities(&config.audio);

    let mut session = CountdownSession::start(settings, Box::new(SystemClock), caps);
    session.tick();
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}
