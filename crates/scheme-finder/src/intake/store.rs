use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::session::ConversationSession;

/// Storage abstraction for conversation sessions keyed by identity.
///
/// Backing stores are expected to be swapped for a persistent one without
/// touching the service.
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, or a fresh one when the identity is new.
    fn get_or_create(&self, identity: &str) -> Result<ConversationSession, StoreError>;
    fn save(&self, session: ConversationSession) -> Result<(), StoreError>;
    fn fetch(&self, identity: &str) -> Result<Option<ConversationSession>, StoreError>;
}

/// Error enumeration for session store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store. Sessions are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, ConversationSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, ConversationSession>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session mutex poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, identity: &str) -> Result<ConversationSession, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(identity)
            .cloned()
            .unwrap_or_else(|| ConversationSession::new(identity)))
    }

    fn save(&self, session: ConversationSession) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard.insert(session.identity.clone(), session);
        Ok(())
    }

    fn fetch(&self, identity: &str) -> Result<Option<ConversationSession>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.get(identity).cloned())
    }
}
