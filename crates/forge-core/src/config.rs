use crate::error::{ForgeError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// Where droids get installed. Chosen exactly once per run (flag or prompt)
/// and passed down explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// `<root>/.factory/droids`
    Project,
    /// `~/.factory/droids`
    User,
}

impl Destination {
    pub fn label(&self) -> &'static str {
        match self {
            Destination::Project => "project",
            Destination::User => "user",
        }
    }

    pub fn factory_dir(&self, root: &Path) -> Result<PathBuf> {
        match self {
            Destination::Project => Ok(paths::factory_dir(root)),
            Destination::User => paths::user_factory_dir(),
        }
    }

    pub fn droids_dir(&self, root: &Path) -> Result<PathBuf> {
        match self {
            Destination::Project => Ok(paths::droids_dir(root)),
            Destination::User => paths::user_droids_dir(),
        }
    }

    pub fn logs_dir(&self, root: &Path) -> Result<PathBuf> {
        match self {
            Destination::Project => Ok(paths::logs_dir(root)),
            Destination::User => paths::user_logs_dir(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// `.factory/config.yaml`, written on the first project-local install.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: String,
    /// Version of the forge binary that last synchronized the droids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub droids_version: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: project.into(),
            droids_version: None,
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(ForgeError::NotInstalled);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Sanity check: the config should record which binary version last
    /// synchronized the droids, and it should match the running binary.
    pub fn validate(&self, binary_version: &str) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        match self.droids_version.as_deref() {
            None => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "droids_version missing from config; run 'forge install' to stamp it"
                    .to_string(),
            }),
            Some(v) if v != binary_version => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "droids were installed by forge v{v}, this binary is v{binary_version}; \
                     re-run 'forge install' to refresh"
                ),
            }),
            Some(_) => {}
        }
        if self.project.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "project name is empty".to_string(),
            });
        }
        warnings
    }
}

/// Stamp the running binary's version into the config after a successful sync.
pub fn stamp_droids_version(root: &Path, binary_version: &str) -> Result<()> {
    let mut cfg = Config::load(root)?;
    cfg.droids_version = Some(binary_version.to_string());
    cfg.save(root)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
