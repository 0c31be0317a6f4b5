//! Channel lifecycle management
//!
//! Lazily creates a channel's emitter and day file on first use, and decides
//! same-day reuse vs next-day rotation on every checked emission. Both first
//! use and the whole compare-reopen-swap sequence run under a per-channel
//! lock, so a day boundary cannot double-close or leak a handle even when
//! several threads log to the same channel at once.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local};
use thiserror::Error;

use crate::config::{RunMode, Settings};
use crate::console;
use crate::emitter::{Emitter, Sink};
use crate::record::{CallSite, Level, LogFields, LogRecord};
use crate::registry::ChannelRegistry;

/// Directory name format for one calendar day of logs
pub(crate) const DAY_DIR_FORMAT: &str = "%Y-%m-%d";

/// Failure to open or create a channel's day file
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Owns the channel registry and performs lazy creation and day rollover.
///
/// Normally used through the global facade, but can be constructed directly
/// when the caller wants to scope the facility to its own lifecycle.
#[derive(Debug)]
pub struct ChannelManager {
    log_root: PathBuf,
    mode: RunMode,
    registry: ChannelRegistry,
    /// Cached `YYYY-MM-DD` subdirectory, shared across all channels and
    /// recomputed at rotation time.
    day_dir: RwLock<String>,
    /// One creation/rotation lock per channel
    channel_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChannelManager {
    /// Build a manager rooted at `log_root`.
    ///
    /// Production mode creates the root directory; failure there is fatal to
    /// initialization and must be treated as such by the caller.
    pub fn new(log_root: impl Into<PathBuf>, mode: RunMode) -> Result<Self> {
        let log_root = log_root.into();
        if mode.is_production() {
            fs::create_dir_all(&log_root).with_context(|| {
                format!("Failed to create log root {}", log_root.display())
            })?;
        }
        Ok(Self {
            log_root,
            mode,
            registry: ChannelRegistry::new(),
            day_dir: RwLock::new(Local::now().format(DAY_DIR_FORMAT).to_string()),
            channel_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Build a manager from a settings carrier
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.log_root.clone(), settings.mode)
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn log_root(&self) -> &Path {
        &self.log_root
    }

    /// Route one record to `channel`.
    ///
    /// In production mode a rotation check runs first when requested. Debug
    /// suppression happens at the facade, not here.
    pub fn log(
        &self,
        channel: &str,
        level: Level,
        message: &str,
        fields: LogFields,
        check_rotation: bool,
        site: CallSite,
    ) {
        let emitter = self.ensure_channel(channel);
        if check_rotation && self.mode.is_production() {
            self.check_and_rotate(channel);
        }
        emitter.emit(&LogRecord::new(level, message, fields, Some(site)));
    }

    /// Return the channel's emitter, creating the channel on first use.
    ///
    /// Creation runs under the channel's lock and is double-checked, so two
    /// racing first calls produce exactly one emitter and one file handle.
    pub fn ensure_channel(&self, name: &str) -> Arc<Emitter> {
        if let Some(emitter) = self.registry.emitters.get(name) {
            return emitter;
        }

        let lock = self.channel_lock(name);
        let _guard = lock.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(emitter) = self.registry.emitters.get(name) {
            return emitter;
        }

        let sink = if self.mode.is_production() {
            let path = self.channel_path(name);
            // First-time creation failing means the environment is unusable
            // for logging; abort rather than drop records silently.
            let file = match open_day_file(&path) {
                Ok(file) => file,
                Err(err) => panic!("daylog: {err}"),
            };
            let handle = Arc::new(Mutex::new(file));
            self.registry.files.insert(name, Arc::clone(&handle));
            Sink::File(handle)
        } else {
            Sink::Stdout
        };

        let emitter = Arc::new(Emitter::new(name, sink));
        self.registry.emitters.insert(name, Arc::clone(&emitter));
        self.registry.days.insert(name, epoch_day(&Local::now()));
        emitter
    }

    /// Same-day fast path or next-day swap.
    ///
    /// Runs on every checked emission in production, so the unchanged case
    /// is a single store read.
    pub fn check_and_rotate(&self, name: &str) {
        self.rotate_channel(name, Local::now());
    }

    fn rotate_channel(&self, name: &str, now: DateTime<Local>) {
        let today = epoch_day(&now);
        match self.registry.days.get(name) {
            Some(day) if day == today => return,
            Some(_) => {}
            // Channel not created yet; ensure_channel records the day.
            None => return,
        }

        let lock = self.channel_lock(name);
        let _guard = lock.lock().unwrap_or_else(|err| err.into_inner());
        if self.registry.days.get(name) == Some(today) {
            // Another thread rotated while we waited for the lock
            return;
        }

        let day_dir = now.format(DAY_DIR_FORMAT).to_string();
        if let Ok(mut cached) = self.day_dir.write() {
            *cached = day_dir.clone();
        }

        let path = self.log_root.join(&day_dir).join(format!("{name}.log"));
        let file = match open_day_file(&path) {
            Ok(file) => file,
            Err(err) => {
                // Degraded but available: the previous handle stays open, so
                // writes keep landing in the old day's file and the swap is
                // retried on the next checked emission.
                console::report_failure("log rotation", &err);
                return;
            }
        };

        let handle = Arc::new(Mutex::new(file));
        self.registry.files.insert(name, Arc::clone(&handle));
        if let Some(emitter) = self.registry.emitters.get(name) {
            emitter.set_sink(Sink::File(handle));
        }
        // Replacing the registry entry and the sink dropped the last clones
        // of the previous handle, which closes its descriptor.
        self.registry.days.insert(name, today);
    }

    /// Full path of the channel's current day file, from the shared cache
    fn channel_path(&self, name: &str) -> PathBuf {
        let day_dir = self
            .day_dir
            .read()
            .map(|dir| dir.clone())
            .unwrap_or_else(|_| Local::now().format(DAY_DIR_FORMAT).to_string());
        self.log_root.join(day_dir).join(format!("{name}.log"))
    }

    fn channel_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .channel_locks
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Day number used for the rollover comparison (days since the common era)
fn epoch_day(now: &DateTime<Local>) -> i32 {
    now.date_naive().num_days_from_ce()
}

/// Open the channel's day file for append, creating the day directory and
/// the file as needed.
fn open_day_file(path: &Path) -> Result<File, SinkError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SinkError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(|source| SinkError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}
