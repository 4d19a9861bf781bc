use std::collections::HashMap;
use std::sync::RwLock;

use rand::RngCore;

use civic_types::models::{Role, Session};

/// Length of the random part of a token, before hex encoding.
const TOKEN_BYTES: usize = 16;

/// Maps opaque bearer tokens to sessions.
///
/// Handlers only see this trait, so the in-process map can be swapped for a
/// shared store without touching them.
pub trait SessionStore: Send + Sync {
    /// Record a new session and return its token.
    fn create(&self, role: Role, user_id: i64) -> String;

    fn lookup(&self, token: &str) -> Option<Session>;

    /// Drop a session. Returns false if the token was unknown.
    fn invalidate(&self, token: &str) -> bool;
}

/// Process-local session map. Nothing expires and nothing survives a restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock can't leave the map half-updated,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, role: Role, user_id: i64) -> String {
        let token = generate_token();
        self.write().insert(token.clone(), Session { role, user_id });
        token
    }

    fn lookup(&self, token: &str) -> Option<Session> {
        self.read().get(token).copied()
    }

    fn invalidate(&self, token: &str) -> bool {
        self.write().remove(token).is_some()
    }
}

/// 128 bits from the thread-local CSPRNG, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
