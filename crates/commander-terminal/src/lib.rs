// Shell session management
//
// This crate owns the mapping between session ids and live child processes:
// spawning through the platform shell, capturing stdout/stderr incrementally,
// answering within a bounded deadline, and archiving sessions when their
// process exits or is force-terminated.

mod logger;
mod manager;
mod session;
mod store;

// Re-export public API
pub use manager::TerminalManager;
pub use session::{ActiveSession, ArchivedSession, OutputBuffer, SessionState};
pub use store::SessionStore;
