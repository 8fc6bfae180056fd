use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::App;
use crate::config::ConfigLoader;

pub mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "noteboard",
    version,
    about = "Terminal note board: jot, search and page through notes for one session"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over NOTEBOARD_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive board (default)
    Tui,
    /// Print the effective configuration and where it was loaded from
    Config,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::discover(cli.config.clone())?;
    loader.paths().ensure_directories()?;
    let paths = loader.paths().clone();
    init_tracing(&cli.log_level, &paths.log_file())
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let config = loader.load_or_init()?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let mut app = App::new(&config);
            commands::run_tui(&mut app)
        }
        Commands::Config => commands::print_config(&paths, &config),
    }
}

/// Logs go to a file because the board owns the terminal while it runs.
fn init_tracing(level: &str, log_file: &Path) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .with_context(|| format!("opening log file {}", log_file.display()))?;
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
        Ok(())
    })
    .map(|_| ())
}
