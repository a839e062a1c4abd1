use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("required tool not found on PATH: {0}")]
    PrerequisiteMissing(String),

    #[error("not installed: run 'forge install' (no .factory/config.yaml found)")]
    NotInstalled,

    #[error("no droid templates found in {}", .0.display())]
    NoTemplatesFound(PathBuf),

    #[error("failed to copy droid '{file}': {source}")]
    CopyFailed {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid droid filename: {0}")]
    InvalidDroidFilename(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
