//! Session storage and the produced orchestration interface.
//!
//! The turn engine holds no global state: the API layer injects a
//! [`SessionStore`] (get/put/remove) into a [`SessionManager`], which
//! enforces per-session mutual exclusion by holding the session's lock for
//! the whole duration of a turn. Independent sessions run concurrently.

use std::sync::Arc;

use dashmap::DashMap;
use log::info;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::provider::ProviderRegistry;

use super::session::GameSession;
use super::types::{AgentConfig, TurnResult};

/// Shared handle to one session; the mutex is the per-session turn owner.
pub type SessionHandle = Arc<Mutex<GameSession>>;

/// Storage interface for active sessions.
pub trait SessionStore: Send + Sync {
    fn put(&self, id: Uuid, session: SessionHandle);
    fn get(&self, id: &Uuid) -> Option<SessionHandle>;
    fn remove(&self, id: &Uuid) -> Option<SessionHandle>;
}

/// In-memory session store backed by a concurrent map.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<Uuid, SessionHandle>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, id: Uuid, session: SessionHandle) {
        self.sessions.insert(id, session);
    }

    fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    fn remove(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.remove(id).map(|(_, session)| session)
    }
}

/// Front door for the API layer: create, resume, and drive sessions.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    registry: Arc<ProviderRegistry>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, registry: Arc<ProviderRegistry>) -> Self {
        Self { store, registry }
    }

    /// Create a fresh session from the starting position.
    pub fn create_session(&self, white: &AgentConfig, black: &AgentConfig) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let session = GameSession::new(id, white, black, &self.registry)?;
        self.store.put(id, Arc::new(Mutex::new(session)));
        info!(
            "session {} created: {} ({}) vs {} ({})",
            id, white.personality, white.model, black.personality, black.model
        );
        Ok(id)
    }

    /// Recreate a session from a stored move-token sequence by validated replay.
    pub fn resume_session(
        &self,
        id: Uuid,
        white: &AgentConfig,
        black: &AgentConfig,
        moves: &[String],
    ) -> Result<Uuid> {
        let session = GameSession::resume(id, white, black, moves, &self.registry)?;
        self.store.put(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    /// Play the next turn of a session. The session lock is held across the
    /// whole turn, so at most one turn per session is ever in flight.
    pub async fn play_turn(&self, id: Uuid) -> Result<TurnResult> {
        let handle = self.store.get(&id).ok_or(Error::SessionNotFound(id))?;
        let mut session = handle.lock().await;
        Ok(session.play_turn().await)
    }

    /// FEN of a session's current position.
    pub async fn current_position(&self, id: Uuid) -> Result<String> {
        let handle = self.store.get(&id).ok_or(Error::SessionNotFound(id))?;
        let session = handle.lock().await;
        Ok(session.current_fen())
    }

    /// Drop a session from the store (archival is the caller's concern).
    pub fn remove_session(&self, id: Uuid) -> bool {
        self.store.remove(&id).is_some()
    }
}
