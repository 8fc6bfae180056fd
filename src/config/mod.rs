use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::board::NOTES_PER_PAGE;
use crate::ui::PREVIEW_CHARS;

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "NoteBoard";
const APP_NAME: &str = "noteboard";
const CONFIG_FILE_NAME: &str = "config.toml";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover(config_override: Option<PathBuf>) -> Result<Self> {
        let paths = ConfigPaths::discover(config_override)?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let default_cfg = AppConfig::default();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = cfg.to_toml()?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub state_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl ConfigPaths {
    /// Resolves where config and logs live. An explicit override wins over
    /// `NOTEBOARD_CONFIG`; either may name a directory or a `.toml` file.
    pub fn discover(config_override: Option<PathBuf>) -> Result<Self> {
        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;

        let (config_dir, config_file) = match config_override
            .or_else(|| env::var_os("NOTEBOARD_CONFIG").map(PathBuf::from))
        {
            Some(path) => split_config_override(path),
            None => {
                let dir = project_dirs.config_dir().to_path_buf();
                let file = dir.join(CONFIG_FILE_NAME);
                (dir, file)
            }
        };

        let state_dir = project_dirs
            .state_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_dirs.data_local_dir().join("state"));

        Ok(Self::rooted(config_dir, config_file, state_dir))
    }

    pub fn rooted(config_dir: PathBuf, config_file: PathBuf, state_dir: PathBuf) -> Self {
        let log_dir = state_dir.join("logs");
        Self {
            config_dir,
            config_file,
            state_dir,
            log_dir,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("noteboard.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.config_dir, &self.state_dir, &self.log_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating application directory {}", dir.display()))?;
        }
        Ok(())
    }
}

fn split_config_override(path: PathBuf) -> (PathBuf, PathBuf) {
    if path.is_dir() || path.extension().is_none() {
        let file = path.join(CONFIG_FILE_NAME);
        return (path, file);
    }
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    (dir, path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Cards per page of the note list.
    pub notes_per_page: usize,
    /// Characters of body text shown on each card before the ellipsis.
    pub preview_chars: usize,
    /// Upper bound on how long the event loop waits for input before redrawing.
    pub tick_rate_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notes_per_page: NOTES_PER_PAGE,
            preview_chars: PREVIEW_CHARS,
            tick_rate_ms: 250,
        }
    }
}

impl AppConfig {
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }

    fn post_load(&mut self) {
        if self.notes_per_page == 0 {
            tracing::warn!(
                fallback = NOTES_PER_PAGE,
                "notes_per_page must be at least 1, using default"
            );
            self.notes_per_page = NOTES_PER_PAGE;
        }
    }
}
