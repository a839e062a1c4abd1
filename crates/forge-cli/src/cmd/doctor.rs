use crate::output::{print_json, print_table};
use anyhow::Context;
use forge_core::{config::Destination, doctor};
use std::path::{Path, PathBuf};

/// Inspect droid definitions in an install location (or an explicit
/// directory) and report size/metadata advisories. Advisories never fail
/// the command.
pub fn run(root: &Path, source: Option<PathBuf>, user: bool, json: bool) -> anyhow::Result<()> {
    let dir = match source {
        Some(dir) => dir,
        None => {
            let destination = if user {
                Destination::User
            } else {
                Destination::Project
            };
            destination.droids_dir(root)?
        }
    };

    let report = doctor::examine(&dir)
        .with_context(|| format!("cannot inspect droids in {}", dir.display()))?;

    if json {
        print_json(&report)?;
        return Ok(());
    }

    let rows = report
        .droids
        .iter()
        .map(|d| {
            vec![
                d.name.clone(),
                if d.version_tag.is_empty() {
                    "-".to_string()
                } else {
                    d.version_tag.clone()
                },
                d.lines.to_string(),
                d.code_blocks.to_string(),
                d.headings.to_string(),
            ]
        })
        .collect();
    print_table(&["droid", "version", "lines", "code blocks", "headings"], rows);

    println!(
        "\n{} droid(s), {} lines, {} chars total",
        report.droids.len(),
        report.total_lines,
        report.total_chars
    );
    if !report.large_droids.is_empty() {
        println!("large droids: {}", report.large_droids.join(", "));
    }

    for d in &report.droids {
        for advisory in &d.advisories {
            println!("advisory [{}]: {advisory}", d.name);
        }
    }
    if report.advisory_count() == 0 {
        println!("No advisories.");
    }
    Ok(())
}
