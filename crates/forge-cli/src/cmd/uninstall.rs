use crate::output::print_json;
use crate::prompt;
use forge_core::{
    audit::AuditLogger,
    config::Destination,
    paths,
    template::{is_backup, is_droid_file},
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct LocationReport {
    destination: &'static str,
    path: String,
    installed: bool,
    removed: usize,
}

pub fn run(root: &Path, project: bool, user: bool, json: bool) -> anyhow::Result<()> {
    let locations: Vec<Destination> = match (project, user) {
        (false, false) => prompt::choose_uninstall_locations()?,
        (true, false) => vec![Destination::Project],
        (false, true) => vec![Destination::User],
        (true, true) => vec![Destination::Project, Destination::User],
    };

    let mut reports = Vec::new();
    for destination in locations {
        reports.push(remove_droids(root, destination)?);
    }

    if json {
        print_json(&reports)?;
    } else {
        for r in &reports {
            if r.installed {
                println!("{}: removed {} droid(s) from {}", r.destination, r.removed, r.path);
            } else {
                println!("{}: not installed ({})", r.destination, r.path);
            }
        }
    }
    Ok(())
}

/// Delete droid template files only. Config, logs, and the `.factory/`
/// directory itself stay behind.
fn remove_droids(root: &Path, destination: Destination) -> anyhow::Result<LocationReport> {
    let droids_dir = destination.droids_dir(root)?;
    let mut report = LocationReport {
        destination: destination.label(),
        path: droids_dir.display().to_string(),
        installed: droids_dir.is_dir(),
        removed: 0,
    };
    if !report.installed {
        return Ok(report);
    }

    let logger = AuditLogger::new(&destination.logs_dir(root)?)?;
    for entry in std::fs::read_dir(&droids_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_droid_file(&name) || is_backup(&name) {
            continue;
        }
        paths::validate_droid_filename(&name)?;
        std::fs::remove_file(entry.path())?;
        logger.log_droid_removed(&name);
        report.removed += 1;
    }
    logger.log_uninstall(destination.label(), report.removed);
    Ok(report)
}
