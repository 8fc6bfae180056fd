pub mod app;
pub mod board;
pub mod cli;
pub mod config;
pub mod highlight;
pub mod ui;

pub use board::{Note, NoteBoard};
pub use config::{AppConfig, ConfigLoader, ConfigPaths};
