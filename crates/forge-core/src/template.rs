//! Droid template discovery and frontmatter metadata.
//!
//! A droid is a markdown prompt definition named `<something>-droid.md` with
//! an optional YAML frontmatter block. The synchronizer treats the body as an
//! opaque blob; only the `version:` line matters here.

use crate::error::Result;
use crate::paths::{BACKUP_SUFFIX, DROID_SUFFIX};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A candidate template discovered in a source directory.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    /// Base filename, unique within one run.
    pub name: String,
    /// Version string from the frontmatter, `""` when absent.
    pub version_tag: String,
    pub source_path: PathBuf,
}

// ---------------------------------------------------------------------------
// Naming convention
// ---------------------------------------------------------------------------

pub fn is_droid_file(name: &str) -> bool {
    name.ends_with(DROID_SUFFIX)
}

/// Backup artifacts (`*.backup`) are never synchronized.
pub fn is_backup(name: &str) -> bool {
    name.ends_with(BACKUP_SUFFIX)
}

// ---------------------------------------------------------------------------
// Frontmatter parsing
// ---------------------------------------------------------------------------

/// Extract the YAML content between the first pair of `---` delimiters.
fn extract_frontmatter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let rest = if let Some(r) = rest.strip_prefix('\n') {
        r
    } else if let Some(r) = rest.strip_prefix("\r\n") {
        r
    } else {
        return None;
    };
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

/// Whether the content opens with a complete `---` fenced metadata block.
pub fn has_frontmatter(content: &str) -> bool {
    extract_frontmatter(content).is_some()
}

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn version_re() -> &'static Regex {
    VERSION_RE.get_or_init(|| Regex::new(r"(?m)^version:[ \t]*(.*)$").unwrap())
}

/// Pull the `version:` value out of a template's leading metadata.
///
/// Looks inside the frontmatter block when one exists, otherwise scans the
/// first few lines (some older droids carry bare `key: value` headers).
/// Surrounding quotes and whitespace are stripped. Absence yields `""`.
pub fn parse_version_tag(content: &str) -> String {
    let haystack: String = match extract_frontmatter(content) {
        Some(fm) => fm.to_string(),
        None => content.lines().take(10).collect::<Vec<_>>().join("\n"),
    };
    let Some(caps) = version_re().captures(&haystack) else {
        return String::new();
    };
    let raw = caps[1].trim();
    raw.trim_matches(|c: char| c == '"' || c == '\'')
        .trim()
        .to_string()
}

/// Read `path` and extract its version tag. Unreadable or absent files yield
/// `""`, which the synchronizer treats as "version provenance unknown".
pub fn version_tag_of(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_version_tag(&content),
        Err(_) => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// List droid templates in `source_dir`, skipping backup artifacts and
/// subdirectories, sorted by filename.
pub fn discover(source_dir: &Path) -> Result<Vec<TemplateFile>> {
    let mut templates = Vec::new();
    for entry in std::fs::read_dir(source_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_droid_file(&name) || is_backup(&name) {
            continue;
        }
        let source_path = entry.path();
        templates.push(TemplateFile {
            version_tag: version_tag_of(&source_path),
            name,
            source_path,
        });
    }
    templates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(templates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn version_from_frontmatter() {
        let content = "---\nname: code-review\nversion: \"1.2.0\"\ntools: [read]\n---\n\n# Body\n";
        assert_eq!(parse_version_tag(content), "1.2.0");
    }

    #[test]
    fn version_single_quoted_and_bare() {
        assert_eq!(parse_version_tag("---\nversion: '2.0'\n---\n"), "2.0");
        assert_eq!(parse_version_tag("---\nversion: 3.1.4\n---\n"), "3.1.4");
    }

    #[test]
    fn version_without_fence_in_leading_lines() {
        let content = "name: legacy\nversion: 0.9.0\n\n# Legacy droid\n";
        assert_eq!(parse_version_tag(content), "0.9.0");
    }

    #[test]
    fn missing_version_is_empty() {
        assert_eq!(parse_version_tag("---\nname: x\n---\nbody"), "");
        assert_eq!(parse_version_tag("# No metadata at all\n"), "");
    }

    #[test]
    fn version_key_must_start_the_line() {
        // `sdk_version:` is a different key, not a match.
        let content = "---\nsdk_version: 9.9.9\n---\n";
        assert_eq!(parse_version_tag(content), "");
    }

    #[test]
    fn version_below_frontmatter_is_ignored() {
        let content = "---\nname: x\n---\n\nversion: 5.0.0 appears in prose\n";
        assert_eq!(parse_version_tag(content), "");
    }

    #[test]
    fn naming_convention() {
        assert!(is_droid_file("bug-fix-droid.md"));
        assert!(!is_droid_file("README.md"));
        assert!(is_backup("a-droid.md.backup"));
        assert!(!is_backup("a-droid.md"));
    }

    #[test]
    fn discover_skips_backups_and_non_droids() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("a-droid.md"),
            "---\nversion: \"1.0.0\"\n---\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("b-droid.md"), "# no frontmatter\n").unwrap();
        std::fs::write(dir.path().join("a-droid.md.backup"), "old").unwrap();
        std::fs::write(dir.path().join("README.md"), "docs").unwrap();
        std::fs::create_dir(dir.path().join("nested-droid.md.d")).unwrap();

        let found = discover(dir.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a-droid.md", "b-droid.md"]);
        assert_eq!(found[0].version_tag, "1.0.0");
        assert_eq!(found[1].version_tag, "");
    }

    #[test]
    fn discover_is_sorted_by_filename() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta-droid.md", "alpha-droid.md", "mid-droid.md"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let names: Vec<String> = discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["alpha-droid.md", "mid-droid.md", "zeta-droid.md"]);
    }
}
