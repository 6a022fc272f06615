use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

use commander_types::SessionId;

use super::logger::SharedSessionLogger;

/// Append-only text accumulator shared by reference between the capture
/// tasks, the pending deadline timer, and the store entry. The deadline read
/// must go through this cell, never through a store lookup: the id may have
/// been archived before the timer fires.
#[derive(Clone, Debug, Default)]
pub struct OutputBuffer(Arc<Mutex<String>>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk in arrival order.
    pub fn append(&self, chunk: &str) {
        self.lock().push_str(chunk);
    }

    /// Copy of everything captured so far.
    pub fn snapshot(&self) -> String {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A session whose process is still running.
#[derive(Debug)]
pub struct ActiveSession {
    pub id: SessionId,
    pub pid: Option<u32>,
    pub command: String,
    pub buffer: OutputBuffer,
    pub start_time: DateTime<Utc>,
    pub logger: Option<SharedSessionLogger>,
}

/// The permanent record of a finished session. It keeps the same buffer cell
/// the capture tasks append to, so output observed strictly after archival
/// was triggered still lands in the record, once, in arrival order.
#[derive(Debug)]
pub struct ArchivedSession {
    pub id: SessionId,
    pub buffer: OutputBuffer,
    /// None when the session was force-terminated: the signal does not
    /// reliably yield an exit code.
    pub exit_code: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// An id exists in exactly one of these states; the transition is one-way.
#[derive(Debug)]
pub enum SessionState {
    Active(ActiveSession),
    Archived(ArchivedSession),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_appends_preserve_arrival_order() {
        let buffer = OutputBuffer::new();
        buffer.append("one ");
        buffer.append("two ");
        buffer.append("three");
        assert_eq!(buffer.snapshot(), "one two three");
    }

    #[test]
    fn buffer_clones_share_the_same_cell() {
        let buffer = OutputBuffer::new();
        let alias = buffer.clone();
        buffer.append("shared");
        assert_eq!(alias.snapshot(), "shared");
        alias.append(" text");
        assert_eq!(buffer.snapshot(), "shared text");
    }
}
