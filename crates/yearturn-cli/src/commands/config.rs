use std::path::Path;

use clap::Subcommand;
use yearturn_core::Config;

use super::{config_path, load_config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dotted key (e.g. "threshold.remaining_secs", "audio.ambient")
        key: String,
    },
    /// Set a config value
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(explicit: Option<&Path>, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path(explicit)?;
    match action {
        ConfigAction::Get { key } => {
            let config = load_config(explicit)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(explicit)?;
            config.set(&key, &value)?;
            // Reject values the session would refuse before writing them.
            config.session_settings()?;
            config.save_to(&path)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = load_config(explicit)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save_to(&path)?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}
