use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Comment heading the installer writes above its `.gitignore` entry.
pub const GITIGNORE_HEADING: &str = "# Droid Forge (AI droid templates)";

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// An interrupted copy never leaves a half-written droid behind.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Append text to a file, creating it if it doesn't exist.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

/// Add `entry` to `root/.gitignore` under the Droid Forge heading, unless an
/// identical line is already present.
///
/// Checks for an exact line match. The heading is only written the first time
/// an entry is added.
pub fn ensure_gitignore_entry(root: &Path, entry: &str) -> Result<()> {
    let gitignore = root.join(".gitignore");
    let existing = if gitignore.exists() {
        std::fs::read_to_string(&gitignore)?
    } else {
        String::new()
    };
    // Exact line match avoids false positives from substring checks.
    if existing.lines().any(|l| l == entry) {
        return Ok(());
    }

    let mut block = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        block.push('\n');
    }
    if !existing.lines().any(|l| l == GITIGNORE_HEADING) {
        if !existing.is_empty() {
            block.push('\n');
        }
        block.push_str(GITIGNORE_HEADING);
        block.push('\n');
    }
    block.push_str(entry);
    block.push('\n');

    append_text(&gitignore, &block)
}
