//! Core types and constants shared across the commander crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Sentinel session id returned when a command is rejected by the gate.
pub const BLOCKED_SESSION_ID: SessionId = -1;

/// Default bound on the initial wait of `execute` (milliseconds).
pub const DEFAULT_EXEC_TIMEOUT_MS: u64 = 1000;

// ============================================================================
// Session Types
// ============================================================================

/// Session identifier. Strictly increasing from 1, never reused.
pub type SessionId = i64;

/// Result of starting a command: the session id, whatever output accumulated
/// before the deadline, and whether the gate rejected the command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResult {
    pub id: SessionId,
    pub output: String,
    pub blocked: bool,
}

impl ExecuteResult {
    /// Synthetic result for a gate-rejected command. No session exists.
    pub fn blocked(command: &str) -> Self {
        Self {
            id: BLOCKED_SESSION_ID,
            output: format!("Command not allowed: {}", command),
            blocked: true,
        }
    }
}

/// One row of `list_sessions`: an active session and its wall-clock runtime
/// floored to whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSessionInfo {
    pub id: SessionId,
    pub blocked: bool,
    pub runtime_secs: u64,
}

// ============================================================================
// Error Taxonomy
// ============================================================================

/// Errors that reach callers as errors. Policy rejections and unknown ids are
/// modeled as data, never as variants here.
#[derive(Debug, Error)]
pub enum CommanderError {
    #[error("failed to spawn command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to signal process {pid}: {reason}")]
    Signal { pid: u32, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_result_uses_sentinel_id() {
        let result = ExecuteResult::blocked("sudo rm -rf /");
        assert_eq!(result.id, BLOCKED_SESSION_ID);
        assert!(result.blocked);
        assert!(result.output.contains("sudo rm -rf /"));
    }
}
