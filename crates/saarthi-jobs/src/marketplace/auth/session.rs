use std::collections::HashMap;
use std::sync::Mutex;

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::marketplace::repository::RepositoryError;

#[derive(Debug, Clone)]
struct Session {
    email: String,
    expires_at: DateTime<Utc>,
}

/// Server-side sessions keyed by the opaque cookie token.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

pub(crate) fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Session>>, RepositoryError> {
        self.sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session mutex poisoned".to_string()))
    }

    pub fn open(&self, email: &str) -> Result<String, RepositoryError> {
        self.open_at(email, Utc::now())
    }

    pub(crate) fn open_at(&self, email: &str, now: DateTime<Utc>) -> Result<String, RepositoryError> {
        let token = random_token(32);
        let mut sessions = self.lock()?;
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            token.clone(),
            Session {
                email: email.to_string(),
                expires_at: now + self.ttl,
            },
        );
        Ok(token)
    }

    /// Email bound to a live session; expired sessions are dropped on sight.
    pub fn resolve(&self, token: &str) -> Result<Option<String>, RepositoryError> {
        self.resolve_at(token, Utc::now())
    }

    pub(crate) fn resolve_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, RepositoryError> {
        let mut sessions = self.lock()?;
        match sessions.get(token) {
            Some(session) if session.expires_at > now => Ok(Some(session.email.clone())),
            Some(_) => {
                sessions.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn revoke(&self, token: &str) -> Result<(), RepositoryError> {
        self.lock()?.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_expire_after_ttl() {
        let store = SessionStore::new(Duration::hours(1));
        let start = Utc::now();
        let token = store.open_at("asha@example.com", start).expect("opens");

        assert_eq!(
            store
                .resolve_at(&token, start + Duration::minutes(59))
                .expect("resolves")
                .as_deref(),
            Some("asha@example.com")
        );
        assert_eq!(
            store
                .resolve_at(&token, start + Duration::minutes(61))
                .expect("resolves"),
            None
        );
    }

    #[test]
    fn revoked_sessions_do_not_resolve() {
        let store = SessionStore::new(Duration::hours(1));
        let token = store.open("asha@example.com").expect("opens");
        store.revoke(&token).expect("revokes");
        assert_eq!(store.resolve(&token).expect("resolves"), None);
        assert_ne!(random_token(16), random_token(16));
    }
}
