//! Crate-level error type.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::run_loop::RunError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("failed to query display size: {0}")]
    DisplaySize(String),

    #[error("failed to open input '{}': {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("failed to write '{}': {source}", .path.display())]
    WriteConfig {
        path: PathBuf,
        source: std::io::Error,
    },
}
