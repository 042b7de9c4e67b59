use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::CombatSnapshot;
use crate::rng::RandomCursor;

/// What survives between requests: the turn-scoped snapshot plus the random
/// cursor needed to resume the stream. Keyed by an opaque identifier whose
/// ownership is checked upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub snapshot: CombatSnapshot,
    pub cursor: RandomCursor,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("session expired: {0}")]
    Expired(String),
}

/// Keyed persistence for in-flight encounters. The engine never touches a
/// process-wide map; whoever hosts the HTTP layer injects an implementation.
/// Callers serialize requests per key — a second in-flight action against the
/// same session is theirs to reject.
pub trait SessionStore {
    fn save(&mut self, key: &str, record: SessionRecord);
    fn load(&mut self, key: &str) -> Result<SessionRecord, SessionError>;
    /// Deleting a session abandons the combat; spent resources stay spent.
    fn delete(&mut self, key: &str) -> bool;
}

/// In-memory store with TTL-based eviction. Expiry is lazy (checked on load)
/// plus an explicit `sweep` for housekeeping.
pub struct MemorySessionStore {
    ttl: Duration,
    entries: HashMap<String, (Instant, SessionRecord)>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Drop every expired entry; returns how many were evicted.
    pub fn sweep(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, (stored, _)| stored.elapsed() < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&mut self, key: &str, record: SessionRecord) {
        self.entries.insert(key.to_string(), (Instant::now(), record));
    }

    fn load(&mut self, key: &str) -> Result<SessionRecord, SessionError> {
        match self.entries.get(key) {
            None => Err(SessionError::NotFound(key.to_string())),
            Some((stored, _)) if stored.elapsed() >= self.ttl => {
                self.entries.remove(key);
                tracing::debug!(key, "session expired on access");
                Err(SessionError::Expired(key.to_string()))
            }
            Some((_, record)) => Ok(record.clone()),
        }
    }

    fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }
}
