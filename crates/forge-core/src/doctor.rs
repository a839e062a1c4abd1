//! Droid inspection: size and structure metrics plus advisory findings.
//!
//! Droid bodies are prompt text read by a language model, so size is cost.
//! The thresholds here (500-line droids, 5 fenced code examples) come from
//! the upstream optimization tooling.

use crate::error::{ForgeError, Result};
use crate::template;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

const LARGE_DROID_LINES: usize = 500;
const MAX_CODE_BLOCKS: usize = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroidMetrics {
    pub name: String,
    pub version_tag: String,
    pub lines: usize,
    pub chars: usize,
    pub code_blocks: usize,
    pub headings: usize,
    /// Advisory findings, never fatal.
    pub advisories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    pub droids: Vec<DroidMetrics>,
    pub total_lines: usize,
    pub total_chars: usize,
    /// Names of droids over the size threshold, largest first.
    pub large_droids: Vec<String>,
}

impl DoctorReport {
    pub fn advisory_count(&self) -> usize {
        self.droids.iter().map(|d| d.advisories.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

static HEADING_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    HEADING_RE.get_or_init(|| Regex::new(r"(?m)^##+ ").unwrap())
}

fn measure(name: &str, content: &str) -> DroidMetrics {
    let lines = content.lines().count();
    let code_blocks = content.matches("```").count() / 2;
    let headings = heading_re().find_iter(content).count();
    let version_tag = template::parse_version_tag(content);

    let mut advisories = Vec::new();
    if !template::has_frontmatter(content) {
        advisories.push("no frontmatter block".to_string());
    }
    if version_tag.is_empty() {
        advisories.push("no version tag; every sync will re-copy this droid".to_string());
    }
    if lines > LARGE_DROID_LINES {
        advisories.push(format!("large droid: {lines} lines (> {LARGE_DROID_LINES})"));
    }
    if code_blocks > MAX_CODE_BLOCKS {
        advisories.push(format!(
            "{code_blocks} code examples (> {MAX_CODE_BLOCKS}); consider consolidating"
        ));
    }

    DroidMetrics {
        name: name.to_string(),
        version_tag,
        lines,
        chars: content.chars().count(),
        code_blocks,
        headings,
        advisories,
    }
}

/// Measure every droid template in `dir`.
pub fn examine(dir: &Path) -> Result<DoctorReport> {
    let templates = template::discover(dir)?;
    if templates.is_empty() {
        return Err(ForgeError::NoTemplatesFound(dir.to_path_buf()));
    }

    let mut droids = Vec::with_capacity(templates.len());
    for tpl in &templates {
        let content = std::fs::read_to_string(&tpl.source_path)?;
        droids.push(measure(&tpl.name, &content));
    }

    let total_lines = droids.iter().map(|d| d.lines).sum();
    let total_chars = droids.iter().map(|d| d.chars).sum();
    let mut large: Vec<&DroidMetrics> = droids
        .iter()
        .filter(|d| d.lines > LARGE_DROID_LINES)
        .collect();
    large.sort_by(|a, b| b.lines.cmp(&a.lines));
    let large_droids = large.into_iter().map(|d| d.name.clone()).collect();

    Ok(DoctorReport {
        droids,
        total_lines,
        total_chars,
        large_droids,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
