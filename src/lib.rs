//! daylog - per-channel structured logging with daily file rotation
//!
//! Log records are JSON lines multiplexed into one file per channel per
//! calendar day (`{root}/{YYYY-MM-DD}/{channel}.log`). Channels are created
//! lazily on first use and swapped to a fresh file when the day changes. In
//! development mode everything goes to stdout and debug records are kept;
//! in production debug records are dropped entirely and files are the sink.
//!
//! ```no_run
//! use daylog::LogFields;
//!
//! daylog::init("/var/log/myapp", "pro").expect("log root must be writable");
//!
//! daylog::log_info("service started", LogFields::new());
//! daylog::log_custom("order accepted", "audit", true);
//!
//! // Invoked periodically by an external scheduler
//! daylog::delete_expired_logs(30);
//! ```

pub mod config;
pub mod console;
pub mod emitter;
pub mod facade;
pub mod manager;
pub mod record;
pub mod registry;
pub mod retention;

pub use config::{default_log_root, RunMode, Settings};
pub use facade::{
    delete_expired_logs, init, init_from_settings, init_with, log_custom, log_debug, log_error,
    log_info, run_mode,
};
pub use manager::ChannelManager;
pub use record::{CallSite, Level, LogFields, LogRecord};
pub use retention::DEFAULT_RETENTION_DAYS;
