//! Login and logout, tying the auth endpoints to the session store.

use crate::clients::AuthClient;
use crate::framework::ApiResult;
use crate::model::LoginRequest;
use crate::store::{write_blocking, Session, SessionStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct AuthService {
    client: AuthClient,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(client: AuthClient, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }

    /// On success the store becomes Authenticated with the username as the
    /// display name. On failure the store is left as it was.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Session> {
        let request = LoginRequest::new(username, password);
        let response = self.client.login(&request).await?;
        let session = Session {
            token: response.session_id,
            user_id: response.user_id,
            display_name: username.to_string(),
        };

        let stored = session.clone();
        write_blocking(&self.session, move |s| {
            s.login(stored.token, stored.user_id, stored.display_name)
        })
        .await;
        info!(user_id = session.user_id, "Login succeeded");
        Ok(session)
    }

    /// Clears the local session even when the server call fails; that
    /// failure is still returned.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self.client.logout().await;
        write_blocking(&self.session, |s| s.logout()).await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Server logout failed, local session cleared anyway");
                Err(e)
            }
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::{ApiErrorKind, RequestExecutor, TransportFailure};
    use crate::store::{MemoryStorage, SessionInterceptor, SnapshotStorage, StorageError};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::thread::ThreadId;

    /// Records which thread performed each write.
    #[derive(Default)]
    struct ThreadRecordingStorage {
        inner: MemoryStorage,
        writers: Mutex<Vec<ThreadId>>,
    }

    impl SnapshotStorage for ThreadRecordingStorage {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.load(key)
        }

        fn save(&self, key: &str, contents: &str) -> Result<(), StorageError> {
            self.writers.lock().push(std::thread::current().id());
            self.inner.save(key, contents)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.writers.lock().push(std::thread::current().id());
            self.inner.remove(key)
        }
    }

    fn service(mock: &MockTransport) -> AuthService {
        service_with_storage(mock, Arc::new(MemoryStorage::new()))
    }

    fn service_with_storage(
        mock: &MockTransport,
        storage: Arc<dyn SnapshotStorage>,
    ) -> AuthService {
        let session = Arc::new(SessionStore::restore(storage));
        let executor = RequestExecutor::builder(mock.transport())
            .with_interceptor(SessionInterceptor::new(session.clone()))
            .build();
        AuthService::new(AuthClient::new(executor), session)
    }

    #[tokio::test]
    async fn test_login_populates_store() {
        let mut mock = MockTransport::new();
        mock.expect_post("auth/login")
            .return_json(200, json!({"sessionId": "session1", "userId": 1}));
        let auth = service(&mock);

        let session = auth.login("u1", "p1").await.unwrap();
        assert_eq!(
            session,
            Session {
                token: "session1".into(),
                user_id: 1,
                display_name: "u1".into(),
            }
        );
        assert_eq!(auth.session().session(), Some(session));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_store_untouched() {
        let mut mock = MockTransport::new();
        mock.expect_post("auth/login")
            .return_json(401, json!({"error": "Invalid credentials"}));
        let auth = service(&mock);

        let err = auth.login("user1", "nope").await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::HttpFailure { status: 401 });
        assert_eq!(err.message(), "Invalid credentials");
        assert!(!auth.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_even_on_network_failure() {
        let mut mock = MockTransport::new();
        mock.expect_post("auth/logout")
            .return_failure(TransportFailure::Unreachable("connection refused".into()));
        let auth = service(&mock);
        auth.session().login("session1", 1, "user1");

        let err = auth.logout().await.unwrap_err();
        assert!(err.is_network());
        assert!(!auth.session().is_authenticated());

        // The logout request itself still carried the credential.
        assert_eq!(mock.requests()[0].header("X-Session-ID"), Some("session1"));
    }

    #[tokio::test]
    async fn test_session_writes_stay_off_the_calling_thread() {
        let mut mock = MockTransport::new();
        mock.expect_post("auth/login")
            .return_json(200, json!({"sessionId": "session1", "userId": 1}));
        mock.expect_post("auth/logout")
            .return_json(200, json!({"message": "Logged out successfully"}));
        let storage = Arc::new(ThreadRecordingStorage::default());
        let auth = service_with_storage(&mock, storage.clone());

        auth.login("user1", "password1").await.unwrap();
        auth.logout().await.unwrap();

        let caller = std::thread::current().id();
        let writers = storage.writers.lock().clone();
        assert_eq!(writers.len(), 2);
        assert!(writers.iter().all(|id| *id != caller));
    }
}
