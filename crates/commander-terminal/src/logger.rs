use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use serde_json::json;

use commander_types::SessionId;

/// Logger handle shared between the capture tasks, the monitor task and the
/// manager's terminate path.
pub type SharedSessionLogger = Arc<Mutex<SessionLogger>>;

/// Best-effort JSONL event log for one session: spawn, output chunks, exit,
/// kill. Logging failures never affect the session itself.
#[derive(Debug)]
pub struct SessionLogger {
    session_id: SessionId,
    log_file: File,
}

impl SessionLogger {
    /// Open a logger under `log_dir`, or None when logging is disabled or
    /// the file cannot be created (reported, not propagated).
    pub fn open(session_id: SessionId, log_dir: Option<&Path>) -> Option<SharedSessionLogger> {
        let log_dir = log_dir?;
        match Self::create(session_id, log_dir) {
            Ok(logger) => Some(Arc::new(Mutex::new(logger))),
            Err(e) => {
                eprintln!(
                    "{} failed to open session log for {}: {}",
                    "warning:".yellow(),
                    session_id,
                    e
                );
                None
            }
        }
    }

    fn create(session_id: SessionId, log_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;

        let log_path = log_dir.join(format!("session-{}.jsonl", session_id));
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .context("Failed to create session log file")?;

        Ok(Self {
            session_id,
            log_file,
        })
    }

    pub fn log_spawn(&mut self, command: &str, pid: Option<u32>) {
        self.log_event(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "session_id": self.session_id,
            "event": "spawn",
            "command": command,
            "pid": pid,
        }));
    }

    pub fn log_output(&mut self, stream: &str, data: &str) {
        self.log_event(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "session_id": self.session_id,
            "event": "output",
            "stream": stream,
            "data": data,
        }));
    }

    pub fn log_exit(&mut self, exit_code: Option<i32>) {
        self.log_event(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "session_id": self.session_id,
            "event": "exit",
            "exit_code": exit_code,
        }));
    }

    pub fn log_kill(&mut self) {
        self.log_event(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "session_id": self.session_id,
            "event": "kill",
        }));
    }

    fn log_event(&mut self, entry: serde_json::Value) {
        let _ = writeln!(self.log_file, "{}", entry);
        let _ = self.log_file.flush();
    }
}
