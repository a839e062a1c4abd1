use crate::output::{print_json, print_table};
use crate::FORGE_BINARY_VERSION;
use forge_core::{
    config::{Config, Destination},
    template, ForgeError,
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct LocationStatus {
    destination: &'static str,
    droids_dir: String,
    exists: bool,
    droid_count: usize,
    /// Project-local only; `None` where a config does not apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<ConfigStatus>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum ConfigStatus {
    Absent,
    Invalid,
    Warnings(usize),
    Ok,
}

/// Read-only status report over both install locations.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let statuses = vec![
        inspect(root, Destination::Project)?,
        inspect(root, Destination::User)?,
    ];

    if json {
        print_json(&statuses)?;
        return Ok(());
    }

    let rows = statuses
        .iter()
        .map(|s| {
            vec![
                s.destination.to_string(),
                s.droids_dir.clone(),
                if s.exists {
                    s.droid_count.to_string()
                } else {
                    "not installed".to_string()
                },
                match &s.config {
                    None => "-".to_string(),
                    Some(ConfigStatus::Absent) => "absent".to_string(),
                    Some(ConfigStatus::Invalid) => "invalid".to_string(),
                    Some(ConfigStatus::Warnings(n)) => format!("{n} warning(s)"),
                    Some(ConfigStatus::Ok) => "ok".to_string(),
                },
            ]
        })
        .collect();
    print_table(&["location", "droids dir", "templates", "config"], rows);
    Ok(())
}

fn inspect(root: &Path, destination: Destination) -> anyhow::Result<LocationStatus> {
    let droids_dir = destination.droids_dir(root)?;
    let exists = droids_dir.is_dir();
    let droid_count = if exists {
        template::discover(&droids_dir)?.len()
    } else {
        0
    };

    let config = match destination {
        Destination::User => None,
        Destination::Project => Some(match Config::load(root) {
            Err(ForgeError::NotInstalled) => ConfigStatus::Absent,
            Err(_) => ConfigStatus::Invalid,
            Ok(cfg) => {
                let warnings = cfg.validate(FORGE_BINARY_VERSION);
                if warnings.is_empty() {
                    ConfigStatus::Ok
                } else {
                    ConfigStatus::Warnings(warnings.len())
                }
            }
        }),
    };

    Ok(LocationStatus {
        destination: destination.label(),
        droids_dir: droids_dir.display().to_string(),
        exists,
        droid_count,
        config,
    })
}
