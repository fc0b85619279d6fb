//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `syncups_core` linkage without the Flutter runtime.
//! - Print the persisted sync-ups document in a stable, line-based format.
//!
//! Usage: `syncups_cli [document-path]`. Without an argument the path comes
//! from `SYNCUPS_DOCUMENT_PATH` or the temp-dir default.

use std::path::PathBuf;
use std::process::ExitCode;
use syncups_core::{resolve_document_path, DocumentStore, JsonFileStore};

fn main() -> ExitCode {
    println!("syncups_core ping={}", syncups_core::ping());
    println!("syncups_core version={}", syncups_core::core_version());

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(resolve_document_path);
    println!("document={}", path.display());

    let store = JsonFileStore::new(path);
    let sync_ups = match store.load() {
        Ok(sync_ups) => sync_ups,
        Err(err) => {
            eprintln!("error={err}");
            return ExitCode::FAILURE;
        }
    };

    println!("sync_ups={}", sync_ups.len());
    for sync_up in &sync_ups {
        println!(
            "- id={} title={:?} theme={} duration_secs={} per_attendee_secs={} attendees={} meetings={}",
            sync_up.id,
            sync_up.title,
            sync_up.theme.key(),
            sync_up.duration_secs,
            sync_up.duration_per_attendee_secs(),
            sync_up.attendees.len(),
            sync_up.meetings.len()
        );
    }
    ExitCode::SUCCESS
}
