//! Process-global logging facade
//!
//! Free functions over a singleton [`ChannelManager`], initialized once via
//! [`init`]. Every logging call is fire-and-forget: no error ever reaches
//! the caller, and calls made before initialization are silent no-ops.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{bail, Result};
use chrono::Local;

use crate::config::{RunMode, Settings};
use crate::manager::ChannelManager;
use crate::record::{CallSite, Level, LogFields};
use crate::retention;

static MANAGER: OnceLock<ChannelManager> = OnceLock::new();

/// Initialize the global facility with a log root and a "dev"/"pro" mode
/// string.
///
/// Must run once, before concurrent logging begins. In production mode the
/// log root directory is created; failure there is fatal and the returned
/// error should be treated as such by the caller.
pub fn init(log_root: impl Into<PathBuf>, mode: &str) -> Result<()> {
    init_with(log_root, RunMode::parse(mode))
}

/// [`init`] with an already-parsed run mode
pub fn init_with(log_root: impl Into<PathBuf>, mode: RunMode) -> Result<()> {
    let manager = ChannelManager::new(log_root, mode)?;
    if MANAGER.set(manager).is_err() {
        bail!("Logging facility already initialized");
    }
    Ok(())
}

/// Initialize the global facility from a settings carrier
pub fn init_from_settings(settings: &Settings) -> Result<()> {
    init_with(settings.log_root.clone(), settings.mode)
}

fn manager() -> Option<&'static ChannelManager> {
    MANAGER.get()
}

/// Run mode of the global facility; Development until [`init`] runs
pub fn run_mode() -> RunMode {
    manager().map(|m| m.mode()).unwrap_or(RunMode::Development)
}

/// Log at debug level.
///
/// Emitted only in development mode; in production this is a complete no-op
/// and no channel is ever created for it.
#[track_caller]
pub fn log_debug(message: impl AsRef<str>, fields: LogFields) {
    let site = CallSite::here();
    let manager = match manager() {
        Some(manager) => manager,
        None => return,
    };
    if manager.mode().is_production() {
        return;
    }
    manager.log(
        Level::Debug.as_str(),
        Level::Debug,
        message.as_ref(),
        fields,
        false,
        site,
    );
}

/// Log at info level, rotation-checked in production
#[track_caller]
pub fn log_info(message: impl AsRef<str>, fields: LogFields) {
    let site = CallSite::here();
    if let Some(manager) = manager() {
        manager.log(
            Level::Info.as_str(),
            Level::Info,
            message.as_ref(),
            fields,
            true,
            site,
        );
    }
}

/// Log at error level, rotation-checked in production
#[track_caller]
pub fn log_error(message: impl AsRef<str>, fields: LogFields) {
    let site = CallSite::here();
    if let Some(manager) = manager() {
        manager.log(
            Level::Error.as_str(),
            Level::Error,
            message.as_ref(),
            fields,
            true,
            site,
        );
    }
}

/// Log to an arbitrary named channel at info level.
///
/// `check_rotation` controls whether the day check runs before the write;
/// pass false on hot paths that tolerate a late swap.
#[track_caller]
pub fn log_custom(message: impl AsRef<str>, channel: &str, check_rotation: bool) {
    let site = CallSite::here();
    if let Some(manager) = manager() {
        manager.log(
            channel,
            Level::Info,
            message.as_ref(),
            LogFields::new(),
            check_rotation,
            site,
        );
    }
}

/// Delete day directories in the configured log root older than
/// `retention_days`.
///
/// Errors are logged internally; nothing is returned to the caller.
pub fn delete_expired_logs(retention_days: i64) {
    if let Some(manager) = manager() {
        retention::sweep_expired(
            manager.log_root(),
            retention_days,
            Local::now().date_naive(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global facility is exercised end to end in tests/facade_scenario.rs,
    // which gets its own process. These only cover pre-init behavior.

    #[test]
    fn test_run_mode_defaults_to_development() {
        assert_eq!(run_mode(), RunMode::Development);
    }

    #[test]
    fn test_logging_before_init_is_a_silent_noop() {
        log_debug("nobody home", LogFields::new());
        log_info("nobody home", LogFields::new());
        log_error("nobody home", LogFields::new());
        log_custom("nobody home", "audit", true);
        delete_expired_logs(30);
    }
}
