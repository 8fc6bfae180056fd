use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::app::App;
use crate::config::{AppConfig, ConfigPaths};

pub fn run_tui(app: &mut App) -> Result<()> {
    app.run()
}

pub fn print_config(paths: &ConfigPaths, config: &AppConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_config(&mut out, paths, config)
}

fn write_config<W: Write>(out: &mut W, paths: &ConfigPaths, config: &AppConfig) -> Result<()> {
    writeln!(out, "# config file: {}", paths.config_file.display())
        .context("writing config report")?;
    writeln!(out, "# log file: {}", paths.log_file().display())
        .context("writing config report")?;
    write!(out, "{}", config.to_toml()?).context("writing config report")?;
    Ok(())
}
