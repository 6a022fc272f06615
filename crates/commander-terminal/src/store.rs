use chrono::Utc;
use std::collections::HashMap;

use commander_types::SessionId;

use super::session::{ActiveSession, ArchivedSession, SessionState};

/// Authoritative record of all sessions, one table keyed by id with a state
/// tag. Ids are allocated here, start at 1, and are never reused; entries are
/// never deleted, only moved from `Active` to `Archived`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, SessionState>,
    next_id: SessionId,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Hand out the next id. Monotonic within the process lifetime.
    pub fn allocate_id(&mut self) -> SessionId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn insert_active(&mut self, session: ActiveSession) {
        self.sessions.insert(session.id, SessionState::Active(session));
    }

    pub fn get(&self, id: SessionId) -> Option<&SessionState> {
        self.sessions.get(&id)
    }

    /// Move an active session to the archive. Idempotent: archiving an id
    /// that is already archived (or unknown) is a no-op returning false.
    pub fn archive(&mut self, id: SessionId, exit_code: Option<i32>) -> bool {
        match self.sessions.remove(&id) {
            Some(SessionState::Active(active)) => {
                let archived = ArchivedSession {
                    id,
                    buffer: active.buffer,
                    exit_code,
                    start_time: active.start_time,
                    end_time: Utc::now(),
                };
                self.sessions.insert(id, SessionState::Archived(archived));
                true
            }
            Some(state) => {
                self.sessions.insert(id, state);
                false
            }
            None => false,
        }
    }

    pub fn active_sessions(&self) -> impl Iterator<Item = &ActiveSession> {
        self.sessions.values().filter_map(|state| match state {
            SessionState::Active(active) => Some(active),
            SessionState::Archived(_) => None,
        })
    }
}
