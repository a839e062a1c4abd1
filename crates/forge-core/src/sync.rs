//! The template synchronizer: one-shot, sequential copy of droid templates
//! from a source checkout into an install location, gated on the `version:`
//! frontmatter tag.

use crate::error::{ForgeError, Result};
use crate::io::atomic_write;
use crate::template::{self, TemplateFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Droids every install is expected to end up with. Absence is a warning,
/// never a failure.
pub const KEY_DROIDS: [&str; 4] = [
    "orchestrator-droid.md",
    "code-review-droid.md",
    "bug-fix-droid.md",
    "documentation-droid.md",
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// No file at the destination.
    Install,
    /// Both sides carry a version tag and they differ.
    Update,
    /// Version provenance unknown on at least one side; always re-copy.
    Refresh,
    /// Versions present and equal.
    Skip,
}

/// What happened to one template during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroidOutcome {
    pub name: String,
    pub action: SyncAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncResult {
    pub installed: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Key droids absent from the destination after the run.
    #[serde(default)]
    pub missing_required: Vec<String>,
    /// Per-file outcomes in filename order.
    #[serde(default)]
    pub outcomes: Vec<DroidOutcome>,
}

impl SyncResult {
    pub fn total(&self) -> usize {
        self.installed + self.updated + self.skipped
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Decide what to do with one template, given its source version tag and the
/// destination file (if any).
pub fn classify(source_tag: &str, dest_path: &Path) -> SyncAction {
    if !dest_path.exists() {
        return SyncAction::Install;
    }
    let dest_tag = template::version_tag_of(dest_path);
    if !source_tag.is_empty() && !dest_tag.is_empty() {
        if source_tag != dest_tag {
            SyncAction::Update
        } else {
            SyncAction::Skip
        }
    } else {
        // Missing version metadata on either side: re-copy so the newest
        // template content is always propagated.
        SyncAction::Refresh
    }
}

// ---------------------------------------------------------------------------
// Synchronize
// ---------------------------------------------------------------------------

/// Copy every non-backup droid template from `source_dir` into `dest_dir`.
///
/// Non-transactional: a copy failure aborts the batch with the offending
/// filename, leaving earlier copies in place. Re-running after the cause is
/// fixed resumes naturally: unchanged files skip and the failed one retries.
pub fn synchronize(source_dir: &Path, dest_dir: &Path) -> Result<SyncResult> {
    let templates = template::discover(source_dir)?;
    if templates.is_empty() {
        return Err(ForgeError::NoTemplatesFound(source_dir.to_path_buf()));
    }

    crate::io::ensure_dir(dest_dir)?;

    let mut result = SyncResult::default();
    for tpl in &templates {
        let dest_path = dest_dir.join(&tpl.name);
        let action = classify(&tpl.version_tag, &dest_path);
        tracing::debug!(droid = %tpl.name, ?action, "classified");
        match action {
            SyncAction::Skip => result.skipped += 1,
            SyncAction::Install | SyncAction::Update | SyncAction::Refresh => {
                copy_template(tpl, &dest_path)?;
                if action == SyncAction::Install {
                    result.installed += 1;
                } else {
                    result.updated += 1;
                }
            }
        }
        result.outcomes.push(DroidOutcome {
            name: tpl.name.clone(),
            action,
        });
    }
    Ok(result)
}

/// Byte-for-byte copy via write-to-temp-then-rename.
fn copy_template(tpl: &TemplateFile, dest_path: &Path) -> Result<()> {
    let copy = || -> Result<()> {
        let bytes = std::fs::read(&tpl.source_path)?;
        atomic_write(dest_path, &bytes)
    };
    copy().map_err(|e| match e {
        ForgeError::Io(source) => ForgeError::CopyFailed {
            file: tpl.name.clone(),
            source,
        },
        other => other,
    })
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Which of `required` are absent from `dest_dir`. Pure read, warning-only.
pub fn verify_required(dest_dir: &Path, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !dest_dir.join(name).exists())
        .map(|name| name.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_droid(dir: &Path, name: &str, version: Option<&str>) {
        let content = match version {
            Some(v) => format!("---\nname: test\nversion: \"{v}\"\n---\n\n# Droid body\n"),
            None => "# Droid with no metadata\n".to_string(),
        };
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn classify_matrix() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a-droid.md");

        // Destination absent
        assert_eq!(classify("1.0.0", &dest), SyncAction::Install);

        // Equal versions
        write_droid(dir.path(), "a-droid.md", Some("1.0.0"));
        assert_eq!(classify("1.0.0", &dest), SyncAction::Skip);

        // Differing versions
        assert_eq!(classify("2.0.0", &dest), SyncAction::Update);

        // Source missing version
        assert_eq!(classify("", &dest), SyncAction::Refresh);

        // Destination missing version
        write_droid(dir.path(), "a-droid.md", None);
        assert_eq!(classify("1.0.0", &dest), SyncAction::Refresh);
    }

    #[test]
    fn empty_source_dir_fails() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let err = synchronize(src.path(), dst.path()).unwrap_err();
        assert!(matches!(err, ForgeError::NoTemplatesFound(_)));
    }

    #[test]
    fn fresh_install_scenario() {
        // End-to-end: a-droid.md (versioned), b-droid.md (no version),
        // a-droid.md.backup. Empty destination.
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_droid(src.path(), "a-droid.md", Some("1.0.0"));
        write_droid(src.path(), "b-droid.md", None);
        std::fs::write(src.path().join("a-droid.md.backup"), "stale").unwrap();

        let result = synchronize(src.path(), dst.path()).unwrap();
        assert_eq!(result.installed, 2);
        assert_eq!(result.updated, 0);
        assert_eq!(result.skipped, 0);
        assert!(dst.path().join("a-droid.md").exists());
        assert!(dst.path().join("b-droid.md").exists());
        assert!(!dst.path().join("a-droid.md.backup").exists());

        let actions: Vec<_> = result
            .outcomes
            .iter()
            .map(|o| (o.name.as_str(), o.action))
            .collect();
        assert_eq!(
            actions,
            vec![
                ("a-droid.md", SyncAction::Install),
                ("b-droid.md", SyncAction::Install),
            ]
        );
    }

    #[test]
    fn rerun_with_version_bump() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_droid(src.path(), "a-droid.md", Some("1.0.0"));
        write_droid(src.path(), "b-droid.md", None);
        synchronize(src.path(), dst.path()).unwrap();

        write_droid(src.path(), "a-droid.md", Some("1.1.0"));
        let result = synchronize(src.path(), dst.path()).unwrap();
        // a-droid.md updates on the version change; b-droid.md refreshes
        // because it has no version line.
        assert_eq!(result.installed, 0);
        assert_eq!(result.updated, 2);
        assert_eq!(result.skipped, 0);
        assert_eq!(
            template::version_tag_of(&dst.path().join("a-droid.md")),
            "1.1.0"
        );
    }

    #[test]
    fn idempotent_when_versions_match() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_droid(src.path(), "a-droid.md", Some("1.0.0"));
        write_droid(src.path(), "c-droid.md", Some("0.3.0"));

        synchronize(src.path(), dst.path()).unwrap();
        let before = std::fs::read(dst.path().join("a-droid.md")).unwrap();

        let second = synchronize(src.path(), dst.path()).unwrap();
        assert_eq!(second.installed, 0);
        assert_eq!(second.updated, 0);
        assert_eq!(second.skipped, 2);
        let after = std::fs::read(dst.path().join("a-droid.md")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn copies_are_byte_identical() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let content = "---\nversion: \"2.4.1\"\n---\n\n# Exact bytes\r\nwith CRLF and unicode: ✓\n";
        std::fs::write(src.path().join("exact-droid.md"), content).unwrap();

        synchronize(src.path(), dst.path()).unwrap();
        assert_eq!(
            std::fs::read(dst.path().join("exact-droid.md")).unwrap(),
            content.as_bytes()
        );
    }

    #[test]
    fn local_edits_overwritten_on_update() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_droid(src.path(), "a-droid.md", Some("2.0.0"));
        // Destination has an older, locally edited copy.
        std::fs::write(
            dst.path().join("a-droid.md"),
            "---\nversion: \"1.0.0\"\n---\n\nlocal edits\n",
        )
        .unwrap();

        let result = synchronize(src.path(), dst.path()).unwrap();
        assert_eq!(result.updated, 1);
        let dest = std::fs::read_to_string(dst.path().join("a-droid.md")).unwrap();
        assert!(!dest.contains("local edits"));
    }

    #[test]
    fn copy_failure_names_the_file_and_aborts_the_batch() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_droid(src.path(), "a-droid.md", Some("1.0.0"));
        write_droid(src.path(), "m-droid.md", Some("1.0.0"));
        write_droid(src.path(), "z-droid.md", Some("1.0.0"));
        // A directory squatting on m-droid.md's destination path makes the
        // rename fail no matter what privileges the test runs with.
        std::fs::create_dir_all(dst.path().join("m-droid.md")).unwrap();

        let err = synchronize(src.path(), dst.path()).unwrap_err();
        match &err {
            ForgeError::CopyFailed { file, .. } => assert_eq!(file, "m-droid.md"),
            other => panic!("expected CopyFailed, got {other:?}"),
        }

        // Files before the failure are in place; files after it were never
        // reached. No rollback.
        assert!(dst.path().join("a-droid.md").is_file());
        assert!(!dst.path().join("z-droid.md").exists());
    }

    #[test]
    fn verify_required_reports_missing() {
        let dst = TempDir::new().unwrap();
        write_droid(dst.path(), "code-review-droid.md", Some("1.0.0"));
        let missing = verify_required(
            dst.path(),
            &["code-review-droid.md", "orchestrator-droid.md"],
        );
        assert_eq!(missing, vec!["orchestrator-droid.md".to_string()]);
    }

    #[test]
    fn verify_required_empty_when_all_present() {
        let dst = TempDir::new().unwrap();
        for name in KEY_DROIDS {
            write_droid(dst.path(), name, Some("1.0.0"));
        }
        assert!(verify_required(dst.path(), &KEY_DROIDS).is_empty());
    }
}
