//! NDJSON audit logging under `<factory>/logs/`.
//!
//! Every run gets a `r-YYYYMMDD-HHMM` id; events are one JSON object per
//! line. Per-droid events go to `events.ndjson`, run summaries to
//! `audit.ndjson`. Logging is best-effort: a failed write is traced as a
//! warning and never fails the surrounding command.

use crate::io::append_text;
use crate::sync::{SyncAction, SyncResult};
use chrono::Utc;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub const EVENTS_FILE: &str = "events.ndjson";
pub const AUDIT_FILE: &str = "audit.ndjson";

pub struct AuditLogger {
    logs_dir: PathBuf,
    run_id: String,
}

impl AuditLogger {
    /// Open a logger for `logs_dir`, creating the directory if needed.
    pub fn new(logs_dir: &Path) -> crate::Result<Self> {
        crate::io::ensure_dir(logs_dir)?;
        Ok(Self {
            logs_dir: logs_dir.to_path_buf(),
            run_id: format!("r-{}", Utc::now().format("%Y%m%d-%H%M")),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn write_event(&self, filename: &str, event_type: &str, data: Value) {
        let mut event = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event_type": event_type,
            "run_id": self.run_id,
        });
        if let (Some(obj), Some(extra)) = (event.as_object_mut(), data.as_object()) {
            for (k, v) in extra {
                obj.insert(k.clone(), v.clone());
            }
        }
        let line = format!("{event}\n");
        if let Err(e) = append_text(&self.logs_dir.join(filename), &line) {
            tracing::warn!(file = filename, error = %e, "audit write failed");
        }
    }

    /// One event per template touched by the synchronizer.
    pub fn log_outcome(&self, name: &str, action: SyncAction) {
        let event_type = match action {
            SyncAction::Install => "droid.installed",
            SyncAction::Update | SyncAction::Refresh => "droid.updated",
            SyncAction::Skip => "droid.skipped",
        };
        self.write_event(EVENTS_FILE, event_type, json!({ "droid_id": name }));
    }

    pub fn log_sync_completed(&self, destination: &str, result: &SyncResult) {
        self.write_event(
            EVENTS_FILE,
            "sync.completed",
            json!({
                "destination": destination,
                "installed": result.installed,
                "updated": result.updated,
                "skipped": result.skipped,
            }),
        );
        self.log_audit("droids_sync", json!({ "destination": destination }));
    }

    pub fn log_droid_removed(&self, name: &str) {
        self.write_event(EVENTS_FILE, "droid.removed", json!({ "droid_id": name }));
    }

    pub fn log_uninstall(&self, destination: &str, removed: usize) {
        self.log_audit(
            "droids_uninstall",
            json!({ "destination": destination, "removed": removed }),
        );
    }

    fn log_audit(&self, action: &str, details: Value) {
        self.write_event(
            AUDIT_FILE,
            "audit.recorded",
            json!({ "action": action, "details": details }),
        );
    }
}
