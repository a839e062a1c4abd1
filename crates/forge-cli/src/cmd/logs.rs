use crate::output::{print_json, print_table};
use forge_core::{audit, config::Destination};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Serialize, Default)]
struct LogSummary {
    total_events: usize,
    runs: usize,
    event_types: BTreeMap<String, usize>,
    recent: Vec<Value>,
}

/// Summarize `events.ndjson` for a location. Read-only; a missing log file
/// is an empty report, not an error.
pub fn run(root: &Path, user: bool, tail: usize, json: bool) -> anyhow::Result<()> {
    let destination = if user {
        Destination::User
    } else {
        Destination::Project
    };
    let events_path = destination.logs_dir(root)?.join(audit::EVENTS_FILE);

    let events = load_ndjson(&events_path)?;
    let mut summary = LogSummary {
        total_events: events.len(),
        ..Default::default()
    };

    let mut runs = BTreeSet::new();
    for event in &events {
        let event_type = event
            .get("event_type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        *summary.event_types.entry(event_type).or_insert(0) += 1;
        if let Some(run_id) = event.get("run_id").and_then(Value::as_str) {
            runs.insert(run_id.to_string());
        }
    }
    summary.runs = runs.len();
    summary.recent = events.iter().rev().take(tail).rev().cloned().collect();

    if json {
        print_json(&summary)?;
        return Ok(());
    }

    if summary.total_events == 0 {
        println!("No audit events recorded in {}", events_path.display());
        return Ok(());
    }

    println!(
        "{} event(s) across {} run(s) in {}\n",
        summary.total_events,
        summary.runs,
        events_path.display()
    );
    let rows = summary
        .event_types
        .iter()
        .map(|(t, n)| vec![t.clone(), n.to_string()])
        .collect();
    print_table(&["event type", "count"], rows);

    println!("\nmost recent:");
    for event in &summary.recent {
        let ts = event
            .get("timestamp")
            .and_then(Value::as_str)
            .unwrap_or("-");
        let ty = event
            .get("event_type")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let subject = event
            .get("droid_id")
            .or_else(|| event.get("destination"))
            .or_else(|| event.get("action"))
            .and_then(Value::as_str)
            .unwrap_or("");
        println!("  {ts}  {ty}  {subject}");
    }
    Ok(())
}

fn load_ndjson(path: &Path) -> anyhow::Result<Vec<Value>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    let mut events = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(v) => events.push(v),
            Err(e) => tracing::warn!(error = %e, "skipping malformed audit line"),
        }
    }
    Ok(events)
}
