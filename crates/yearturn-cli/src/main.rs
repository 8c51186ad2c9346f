use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod terminal;

#[derive(Parser)]
#[command(name = "yearturn", version, about = "New Year countdown in the terminal")]
struct Cli {
    /// Config file (defaults to ~/.config/yearturn/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug-level logging unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live countdown; press Enter to play/pause the ambient track
    Run,
    /// Print the current state as JSON
    Status,
    /// Replay a countdown against a simulated clock, printing events as JSON lines
    Simulate(commands::simulate::SimulateArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run => commands::run::run(config_path),
        Commands::Status => commands::status::run(config_path),
        Commands::Simulate(args) => commands::simulate::run(config_path, args),
        Commands::Config { action } => commands::config::run(config_path, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
