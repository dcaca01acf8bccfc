//! Shared types for the API layer: the request context, bearer-token
//! session store, and the principal contexts injected by the auth
//! middleware.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::core_state::CoreState;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self {
            core,
            sessions: Arc::new(Mutex::new(SessionStore::new())),
        }
    }
}

/// Who a validated token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Doctor(Uuid),
    Patient(Uuid),
    Admin,
}

/// Authenticated doctor, injected into request extensions by the auth
/// middleware.
#[derive(Debug, Clone, Copy)]
pub struct DoctorContext {
    pub doctor_id: Uuid,
}

/// Authenticated patient.
#[derive(Debug, Clone, Copy)]
pub struct UserContext {
    pub patient_id: Uuid,
}

/// Authenticated admin.
#[derive(Debug, Clone, Copy)]
pub struct AdminContext;

/// In-memory session store: SHA-256 token hash → principal. Tokens live
/// until the process restarts; there is no refresh flow.
pub struct SessionStore {
    sessions: HashMap<[u8; 32], Principal>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Issue a fresh token for a principal. Only the hash is retained.
    pub fn issue(&mut self, principal: Principal) -> String {
        let token = generate_token();
        self.sessions.insert(hash_token(&token), principal);
        token
    }

    /// Resolve a presented token to its principal.
    pub fn resolve(&self, token: &str) -> Option<Principal> {
        self.sessions.get(&hash_token(token)).copied()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_to_its_principal() {
        let mut store = SessionStore::new();
        let doctor_id = Uuid::new_v4();
        let token = store.issue(Principal::Doctor(doctor_id));
        assert_eq!(store.resolve(&token), Some(Principal::Doctor(doctor_id)));
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let store = SessionStore::new();
        assert_eq!(store.resolve("made-up"), None);
    }

    #[test]
    fn tokens_are_unique() {
        let mut store = SessionStore::new();
        let a = store.issue(Principal::Admin);
        let b = store.issue(Principal::Admin);
        assert_ne!(a, b);
    }

    #[test]
    fn token_is_url_safe() {
        let token = generate_token();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
