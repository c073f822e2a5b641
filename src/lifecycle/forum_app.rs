use crate::clients::{AuthClient, ForumClient};
use crate::framework::{HttpTransport, RequestExecutor, Transport};
use crate::guard::AuthGuard;
use crate::lifecycle::config::ClientConfig;
use crate::model::Forum;
use crate::services::{AuthService, ForumService};
use crate::store::{
    EntityCacheStore, FileStorage, SessionInterceptor, SessionStore, SnapshotStorage,
    FORUM_STORAGE_KEY,
};
use std::sync::Arc;
use tracing::info;

/// The composition root for the forum client.
///
/// `ForumApp` is responsible for:
/// - **Store Construction**: Restoring the session and forum directory from storage
/// - **Dependency Wiring**: Registering the session interceptor on the shared executor
/// - **Service Assembly**: Handing each service the clients and stores it needs
///
/// Every component is built once here and shared; nothing reaches for a
/// global.
///
/// # Example
///
/// ```ignore
/// let app = ForumApp::new(&ClientConfig::from_env()?)?;
///
/// app.auth.login("user1", "password1").await?;
/// let forums = app.forums.ensure_forums().await?;
/// ```
pub struct ForumApp {
    pub session: Arc<SessionStore>,
    pub auth: AuthService,
    pub forums: ForumService,
    pub guard: AuthGuard,
}

impl ForumApp {
    /// Wires the app against the configured HTTP API, persisting under the
    /// configured state directory.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let transport = Arc::new(HttpTransport::new(config.base_url().clone())?);
        let storage = Arc::new(FileStorage::new(config.state_dir()));
        let base_url = config.base_url();
        let state_dir = config.state_dir().display();
        info!(%base_url, %state_dir, "Starting forum client");
        Ok(Self::with_transport(transport, storage))
    }

    /// Wires the app against any transport and storage.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Self {
        // 1. Stores, restored from their snapshots
        let session = Arc::new(SessionStore::restore(storage.clone()));
        let forum_cache = EntityCacheStore::<Forum>::persisted(storage, FORUM_STORAGE_KEY);

        // 2. One executor, with the credential attached at dispatch time
        let executor = RequestExecutor::builder(transport)
            .with_interceptor(SessionInterceptor::new(session.clone()))
            .build();

        // 3. Services
        let auth = AuthService::new(AuthClient::new(executor.clone()), session.clone());
        let forums = ForumService::new(ForumClient::new(executor), Arc::new(forum_cache));
        let guard = AuthGuard::new(session.clone());

        Self {
            session,
            auth,
            forums,
            guard,
        }
    }
}
