use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use yearturn_core::config::AudioConfig;
use yearturn_core::{
    drive, Command, CountdownSession, DriveOutcome, Event, RemainingTime, SessionSettings,
    SystemClock,
};

use super::load_config;
use crate::terminal::{self, InteractionGate, Screen};

pub fn run(explicit: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(explicit)?;
    let settings = config.session_settings()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(live(settings, &config.audio));
    // A stdin read may still be parked on the blocking pool.
    runtime.shutdown_background();
    result
}

async fn live(
    settings: SessionSettings,
    audio: &AudioConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let period = settings.tick_interval;
    let (caps, screen) = terminal::capabilities(audio);
    let mut session = CountdownSession::start(settings, Box::new(SystemClock), caps);

    let (tx, rx) = mpsc::unbounded_channel();
    spawn_input(tx.clone(), screen.gate.clone());
    spawn_interrupt(tx);

    println!("Press Enter to play/pause the music, Ctrl-C to quit.");
    let mut frame = 0u64;
    let mut playing = false;
    let outcome = drive(&mut session, rx, |event| match event {
        Event::Tick { remaining, .. } => {
            screen.typewriter.advance();
            print_frame(&screen, frame, Some(remaining), playing);
            frame += 1;
        }
        Event::AmbientToggled { playing: now, .. } => playing = *now,
        Event::CountdownCompleted { .. } => println!("🎆 Happy New Year! 🎆"),
        _ => {}
    })
    .await;

    if outcome == DriveOutcome::Completed {
        // The countdown is gone; let the celebration text finish typing.
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    screen.typewriter.advance();
                    print_frame(&screen, frame, None, false);
                    frame += 1;
                    if screen.typewriter.finished() {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }

    session.close();
    Ok(())
}

fn print_frame(screen: &Screen, frame: u64, remaining: Option<&RemainingTime>, playing: bool) {
    let backdrop = screen.backdrop_row(frame);
    match remaining {
        Some(remaining) => {
            let button = if playing { "⏸" } else { "▶" };
            println!("{backdrop}  {remaining}  {button}  {}", screen.line());
        }
        None => println!("{backdrop}  {}", screen.line()),
    }
}

/// Every line on stdin is a press of the play/pause button.
fn spawn_input(tx: UnboundedSender<Command>, gate: InteractionGate) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            gate.open();
            if tx.send(Command::TogglePlayback).is_err() {
                break;
            }
        }
    });
}

fn spawn_interrupt(tx: UnboundedSender<Command>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Command::Shutdown);
        }
    });
}
