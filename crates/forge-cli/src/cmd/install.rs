use crate::output::print_json;
use crate::prompt;
use crate::FORGE_BINARY_VERSION;
use anyhow::Context;
use forge_core::{
    audit::AuditLogger,
    config::{self, Config, Destination},
    io, paths, prereq,
    sync::{self, SyncAction},
};
use std::path::{Path, PathBuf};

pub struct InstallArgs {
    pub source: Option<PathBuf>,
    /// `None` means ask.
    pub destination: Option<Destination>,
    pub assume_yes: bool,
}

pub fn run(root: &Path, args: InstallArgs, json: bool) -> anyhow::Result<()> {
    // 1. Prerequisite check, before any filesystem mutation.
    prereq::require(prereq::VCS_TOOL).context("droid-forge installs into a git checkout")?;

    // 2. The droid runner itself is optional at install time.
    if !prereq::available(prereq::COMPANION_TOOL) {
        eprintln!(
            "warning: the '{}' CLI was not found on PATH; droids can be installed but not run",
            prereq::COMPANION_TOOL
        );
        if !args.assume_yes && !json && !prompt::confirm("Continue without it?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 3. One destination choice, made exactly once.
    let destination = match args.destination {
        Some(d) => d,
        None => prompt::choose_destination("Install")?,
    };

    // 4. Source directory.
    let source_dir = args.source.unwrap_or_else(|| paths::source_dir(root));
    if !source_dir.is_dir() {
        anyhow::bail!(
            "droid source directory not found: {}",
            source_dir.display()
        );
    }

    let droids_dir = destination.droids_dir(root)?;
    let logs_dir = destination.logs_dir(root)?;

    if !json {
        println!("Installing droids to: {}", droids_dir.display());
    }

    // 5. Synchronize.
    let mut result = sync::synchronize(&source_dir, &droids_dir)
        .with_context(|| format!("failed to synchronize from {}", source_dir.display()))?;

    let logger = AuditLogger::new(&logs_dir)?;
    for outcome in &result.outcomes {
        logger.log_outcome(&outcome.name, outcome.action);
        if !json {
            let verb = match outcome.action {
                SyncAction::Install => "installed",
                SyncAction::Update | SyncAction::Refresh => "updated",
                SyncAction::Skip => "skipped",
            };
            println!("  {verb:9} {}", outcome.name);
        }
    }

    // 6. Project-local extras: config stamp and .gitignore entry.
    if destination == Destination::Project {
        finish_project_install(root, json)?;
    }

    // 7. Verification pass. Warning only, the run still succeeds.
    result.missing_required = sync::verify_required(&droids_dir, &sync::KEY_DROIDS);

    logger.log_sync_completed(destination.label(), &result);

    if json {
        print_json(&result)?;
    } else {
        println!(
            "\nDone: {} installed, {} updated, {} skipped ({} droids).",
            result.installed,
            result.updated,
            result.skipped,
            result.total()
        );
        for name in &result.missing_required {
            eprintln!("warning: key droid missing after sync: {name}");
        }
    }
    Ok(())
}

fn finish_project_install(root: &Path, json: bool) -> anyhow::Result<()> {
    let config_path = paths::config_path(root);
    if !config_path.exists() {
        let project_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        Config::new(&project_name)
            .save(root)
            .context("failed to write .factory/config.yaml")?;
        if !json {
            println!("  created   .factory/config.yaml");
        }
    }
    config::stamp_droids_version(root, FORGE_BINARY_VERSION)?;

    // Sanity check on whatever is in the config now.
    let cfg = Config::load(root).context("failed to load .factory/config.yaml")?;
    for w in cfg.validate(FORGE_BINARY_VERSION) {
        eprintln!("warning: {}", w.message);
    }

    // Installed copies don't belong in version control.
    io::ensure_gitignore_entry(root, ".factory/")
        .context("failed to update .gitignore")?;
    Ok(())
}
