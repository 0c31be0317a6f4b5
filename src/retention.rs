//! Expired log directory sweep
//!
//! Day-named subdirectories of the log root older than the retention window
//! are deleted recursively. Intended to be driven by an external scheduler;
//! nothing here self-schedules.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::manager::DAY_DIR_FORMAT;
use crate::record::LogFields;

/// Default retention period in days
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Delete day directories older than `retention_days`, judged against `today`.
///
/// Returns the number of directories deleted. Entries whose names do not
/// parse as dates are skipped; individual deletion failures go to the error
/// channel and do not stop the sweep.
pub(crate) fn sweep_expired(log_root: &Path, retention_days: i64, today: NaiveDate) -> usize {
    if !log_root.exists() {
        return 0;
    }
    let entries = match fs::read_dir(log_root) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    let mut deleted = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        let date = match NaiveDate::parse_from_str(name, DAY_DIR_FORMAT) {
            Ok(date) => date,
            Err(_) => continue,
        };
        if (today - date).num_days() > retention_days {
            match fs::remove_dir_all(&path) {
                Ok(()) => deleted += 1,
                Err(err) => crate::facade::log_error(
                    format!("Failed to delete expired logs {}: {err}", path.display()),
                    LogFields::new(),
                ),
            }
        }
    }
    deleted
}
