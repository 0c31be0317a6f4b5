//! Per-channel record emission
//!
//! An emitter formats records into JSON lines and writes them to a swappable
//! sink: stdout in development mode, the channel's current day file in
//! production. Rotation swaps the sink in place; the emitter itself lives
//! for the process.

use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, RwLock};

use crate::record::LogRecord;

/// Where a channel's bytes go
#[derive(Debug, Clone)]
pub enum Sink {
    /// Console output, used in development mode
    Stdout,
    /// The channel's currently-open day file
    File(Arc<Mutex<File>>),
}

/// JSON-line emitter bound to one channel
#[derive(Debug)]
pub struct Emitter {
    channel: String,
    sink: RwLock<Sink>,
}

impl Emitter {
    pub fn new(channel: impl Into<String>, sink: Sink) -> Self {
        Self {
            channel: channel.into(),
            sink: RwLock::new(sink),
        }
    }

    /// Name of the channel this emitter serves
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Point the emitter at a new sink. Called by rotation.
    pub fn set_sink(&self, sink: Sink) {
        if let Ok(mut current) = self.sink.write() {
            *current = sink;
        }
    }

    /// Emit one record. Fire-and-forget: write errors are swallowed.
    pub fn emit(&self, record: &LogRecord) {
        let line = match record.to_json_line() {
            Some(line) => line,
            None => return,
        };
        let sink = match self.sink.read() {
            Ok(sink) => sink,
            Err(_) => return,
        };
        match &*sink {
            Sink::Stdout => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                let _ = out.write_all(line.as_bytes());
                let _ = out.write_all(b"\n");
            }
            Sink::File(file) => {
                if let Ok(mut file) = file.lock() {
                    let _ = file.write_all(line.as_bytes());
                    let _ = file.write_all(b"\n");
                    let _ = file.flush();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Level, LogFields};
    use std::fs;
    use std::fs::OpenOptions;
    use tempfile::TempDir;

    fn file_sink(path: &std::path::Path) -> Sink {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .unwrap();
        Sink::File(Arc::new(Mutex::new(file)))
    }

    #[test]
    fn test_emit_writes_one_json_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("info.log");
        let emitter = Emitter::new("info", file_sink(&path));

        let record = LogRecord::new(Level::Info, "hello", LogFields::new(), None);
        emitter.emit(&record);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let json: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(json["message"], "hello");
        assert_eq!(json["level"], "info");
    }

    #[test]
    fn test_set_sink_redirects_subsequent_writes() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.log");
        let second = temp_dir.path().join("second.log");
        let emitter = Emitter::new("info", file_sink(&first));

        emitter.emit(&LogRecord::new(Level::Info, "one", LogFields::new(), None));
        emitter.set_sink(file_sink(&second));
        emitter.emit(&LogRecord::new(Level::Info, "two", LogFields::new(), None));

        let first_content = fs::read_to_string(&first).unwrap();
        let second_content = fs::read_to_string(&second).unwrap();
        assert_eq!(first_content.lines().count(), 1);
        assert_eq!(second_content.lines().count(), 1);
        assert!(first_content.contains("one"));
        assert!(second_content.contains("two"));
    }

    #[test]
    fn test_stdout_sink_does_not_panic() {
        let emitter = Emitter::new("debug", Sink::Stdout);
        emitter.emit(&LogRecord::new(Level::Debug, "to console", LogFields::new(), None));
        assert_eq!(emitter.channel(), "debug");
    }
}
