pub mod config;
pub mod run;
pub mod simulate;
pub mod status;

use std::path::{Path, PathBuf};

use yearturn_core::{Config, ConfigError};

fn config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path(),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    Config::load_from(&config_path(explicit)?)
}
