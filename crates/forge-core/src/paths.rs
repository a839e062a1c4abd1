use crate::error::{ForgeError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const FACTORY_DIR: &str = ".factory";
pub const DROIDS_DIR: &str = ".factory/droids";
pub const LOGS_DIR: &str = ".factory/logs";

pub const CONFIG_FILE: &str = ".factory/config.yaml";

/// Directory in a droid-forge checkout that holds the shipped templates.
pub const SOURCE_DIR: &str = "droids";

pub const DROID_SUFFIX: &str = "-droid.md";
pub const BACKUP_SUFFIX: &str = ".backup";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn factory_dir(root: &Path) -> PathBuf {
    root.join(FACTORY_DIR)
}

pub fn droids_dir(root: &Path) -> PathBuf {
    root.join(DROIDS_DIR)
}

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join(LOGS_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn source_dir(root: &Path) -> PathBuf {
    root.join(SOURCE_DIR)
}

/// `~/.factory`, the user-global install location.
pub fn user_factory_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|h| h.join(FACTORY_DIR))
        .ok_or(ForgeError::HomeNotFound)
}

pub fn user_droids_dir() -> Result<PathBuf> {
    Ok(user_factory_dir()?.join("droids"))
}

pub fn user_logs_dir() -> Result<PathBuf> {
    Ok(user_factory_dir()?.join("logs"))
}

// ---------------------------------------------------------------------------
// Filename validation
// ---------------------------------------------------------------------------

/// Reject filenames that could escape the droids directory via path traversal.
pub fn validate_droid_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
        || filename.contains('\0')
    {
        return Err(ForgeError::InvalidDroidFilename(filename.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.factory/config.yaml")
        );
        assert_eq!(droids_dir(root), PathBuf::from("/tmp/proj/.factory/droids"));
        assert_eq!(logs_dir(root), PathBuf::from("/tmp/proj/.factory/logs"));
        assert_eq!(source_dir(root), PathBuf::from("/tmp/proj/droids"));
    }

    #[test]
    fn valid_filenames() {
        for name in ["code-review-droid.md", "a-droid.md", "x.md"] {
            validate_droid_filename(name).unwrap_or_else(|_| panic!("expected valid: {name}"));
        }
    }

    #[test]
    fn invalid_filenames() {
        for name in ["", "../escape.md", "a/b-droid.md", "a\\b.md", "nul\0.md"] {
            assert!(
                validate_droid_filename(name).is_err(),
                "expected invalid: {name}"
            );
        }
    }
}
