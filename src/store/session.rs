//! # Session Store
//!
//! Process-wide authentication state with two states:
//!
//! - **Anonymous**: no credential.
//! - **Authenticated**: token, user id and display name, all present.
//!
//! The only transitions are [`SessionStore::login`] (any state to
//! Authenticated, last write wins) and [`SessionStore::logout`] (any state to
//! Anonymous). Both write through to [`SnapshotStorage`] immediately so the
//! next boot restores the same state.
//!
//! [`SessionInterceptor`] is how the request layer sees this store: it is
//! registered on the executor in the composition root and reads the token at
//! dispatch time.

use super::persistence::{load_snapshot, save_snapshot, SnapshotStorage};
use crate::framework::{RequestInterceptor, TransportRequest};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Storage key for the session snapshot.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Header carrying the session token on outbound calls.
pub const SESSION_HEADER: &str = "X-Session-ID";

/// A logged-in identity. Exists only as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: u64,
    pub display_name: String,
}

/// Jointly-present-or-absent credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential(Option<Session>);

impl Credential {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(session: Session) -> Self {
        Self(Some(session))
    }

    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.0.as_ref().map(|s| s.token.as_str())
    }

    pub fn user_id(&self) -> Option<u64> {
        self.0.as_ref().map(|s| s.user_id)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.0.as_ref().map(|s| s.display_name.as_str())
    }
}

/// On-disk shape. Fields are independently optional here only so a partial
/// snapshot can be detected and rejected on restore.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialSnapshot {
    session_token: Option<String>,
    user_id: Option<u64>,
    display_name: Option<String>,
}

impl From<&Credential> for CredentialSnapshot {
    fn from(credential: &Credential) -> Self {
        match credential.session() {
            Some(session) => Self {
                session_token: Some(session.token.clone()),
                user_id: Some(session.user_id),
                display_name: Some(session.display_name.clone()),
            },
            None => Self::default(),
        }
    }
}

impl CredentialSnapshot {
    fn into_credential(self) -> Option<Credential> {
        match (self.session_token, self.user_id, self.display_name) {
            (Some(token), Some(user_id), Some(display_name)) => {
                Some(Credential::authenticated(Session {
                    token,
                    user_id,
                    display_name,
                }))
            }
            (None, None, None) => Some(Credential::anonymous()),
            _ => None,
        }
    }
}

/// Persisted authentication state, shared via `Arc`.
pub struct SessionStore {
    credential: RwLock<Credential>,
    storage: Arc<dyn SnapshotStorage>,
}

impl SessionStore {
    /// Builds the store, restoring the last persisted state.
    ///
    /// An unreadable or partial snapshot restores as Anonymous.
    pub fn restore(storage: Arc<dyn SnapshotStorage>) -> Self {
        let snapshot = load_snapshot::<CredentialSnapshot>(storage.as_ref(), SESSION_STORAGE_KEY);
        let credential = match snapshot {
            Ok(Some(snapshot)) => snapshot.into_credential().unwrap_or_else(|| {
                warn!("Partial session snapshot, starting anonymous");
                Credential::anonymous()
            }),
            Ok(None) => Credential::anonymous(),
            Err(e) => {
                warn!(error = %e, "Session snapshot unreadable, starting anonymous");
                Credential::anonymous()
            }
        };
        let authenticated = credential.is_authenticated();
        info!(authenticated, "Session store ready");
        Self {
            credential: RwLock::new(credential),
            storage,
        }
    }

    /// Anonymous -> Authenticated, or Authenticated -> Authenticated (replaced).
    pub fn login(&self, token: impl Into<String>, user_id: u64, display_name: impl Into<String>) {
        let credential = Credential::authenticated(Session {
            token: token.into(),
            user_id,
            display_name: display_name.into(),
        });
        info!(user_id, "Logged in");
        self.transition(credential);
    }

    /// Any state -> Anonymous. Unconditional.
    pub fn logout(&self) {
        info!("Logged out");
        self.transition(Credential::anonymous());
    }

    fn transition(&self, next: Credential) {
        let mut current = self.credential.write();
        *current = next;
        // Persist under the write lock so snapshots land in transition order.
        let snapshot = CredentialSnapshot::from(&*current);
        if let Err(e) = save_snapshot(self.storage.as_ref(), SESSION_STORAGE_KEY, &snapshot) {
            warn!(error = %e, "Failed to persist session");
        }
    }

    pub fn credential(&self) -> Credential {
        self.credential.read().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.credential.read().session().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.read().is_authenticated()
    }

    pub fn session_token(&self) -> Option<String> {
        self.credential.read().session_token().map(str::to_string)
    }

    pub fn user_id(&self) -> Option<u64> {
        self.credential.read().user_id()
    }

    pub fn display_name(&self) -> Option<String> {
        self.credential.read().display_name().map(str::to_string)
    }
}

/// Attaches the current session token to every outbound request. An empty
/// token sends no header.
pub struct SessionInterceptor {
    session: Arc<SessionStore>,
}

impl SessionInterceptor {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

impl RequestInterceptor for SessionInterceptor {
    fn before_request(&self, request: &mut TransportRequest) {
        let token = self.session.session_token().filter(|t| !t.is_empty());
        if let Some(token) = token {
            request.set_header(SESSION_HEADER, token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Method;
    use crate::store::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, SessionStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::restore(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_login_then_logout_restores_anonymous() {
        let (_, store) = store();
        let before = store.credential();

        store.login("session1", 1, "u1");
        assert!(store.is_authenticated());
        assert_eq!(store.session_token().as_deref(), Some("session1"));
        assert_eq!(store.user_id(), Some(1));
        assert_eq!(store.display_name().as_deref(), Some("u1"));

        store.logout();
        assert_eq!(store.credential(), before);
        store.logout();
        assert_eq!(store.credential(), Credential::anonymous());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_login_is_last_write_wins() {
        let (_, store) = store();
        store.login("session1", 1, "user1");
        store.login("session2", 2, "user2");
        let session = store.session().unwrap();
        assert_eq!(session.token, "session2");
        assert_eq!(session.user_id, 2);
        assert_eq!(session.display_name, "user2");
    }

    #[test]
    fn test_state_survives_restore() {
        let (storage, store) = store();
        store.login("session1", 1, "u1");
        drop(store);

        let restored = SessionStore::restore(storage.clone());
        assert_eq!(restored.session_token().as_deref(), Some("session1"));

        restored.logout();
        let restored_again = SessionStore::restore(storage);
        assert!(!restored_again.is_authenticated());
    }

    #[test]
    fn test_partial_snapshot_restores_anonymous() {
        let storage = Arc::new(MemoryStorage::new());
        let partial = r#"{"sessionToken":"session1","userId":null,"displayName":"u1"}"#;
        storage.save(SESSION_STORAGE_KEY, partial).unwrap();
        let store = SessionStore::restore(storage);
        assert_eq!(store.credential(), Credential::anonymous());
    }

    #[test]
    fn test_interceptor_reads_latest_state() {
        let (_, store) = store();
        let store = Arc::new(store);
        let interceptor = SessionInterceptor::new(store.clone());

        let mut anonymous = TransportRequest::new(Method::Get, "forums");
        interceptor.before_request(&mut anonymous);
        assert_eq!(anonymous.header(SESSION_HEADER), None);

        store.login("session1", 1, "u1");
        let mut authed = TransportRequest::new(Method::Get, "forums");
        interceptor.before_request(&mut authed);
        assert_eq!(authed.header(SESSION_HEADER), Some("session1"));

        store.logout();
        let mut after = TransportRequest::new(Method::Get, "forums");
        interceptor.before_request(&mut after);
        assert_eq!(after.header(SESSION_HEADER), None);
    }

    #[test]
    fn test_empty_token_sends_no_header() {
        let (_, store) = store();
        let store = Arc::new(store);
        let interceptor = SessionInterceptor::new(store.clone());

        store.login("", 1, "u1");
        let mut request = TransportRequest::new(Method::Get, "forums");
        interceptor.before_request(&mut request);
        assert_eq!(request.header(SESSION_HEADER), None);
    }
}
