use tokio::task::JoinHandle;

use oldgold_common::config::BackendConfig;
use oldgold_common::gateway::ListingGateway;
use oldgold_common::memory::{MemoryAuth, MemoryBlobStore, MemoryStore};
use oldgold_common::session::SessionProvider;

use crate::BUCKET;

/// The app's collaborators wired together in memory.
pub struct Market {
    pub store: MemoryStore,
    pub blobs: MemoryBlobStore,
    pub auth: MemoryAuth,
    pub session: SessionProvider,
    pub gateway: ListingGateway<MemoryStore, MemoryBlobStore>,
}

impl Market {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let blobs = MemoryBlobStore::new();
        let config = BackendConfig {
            project_id: Some("oldgold-test".into()),
            storage_bucket: Some(BUCKET.into()),
            ..Default::default()
        };
        Self {
            gateway: ListingGateway::new(store.clone(), blobs.clone(), config),
            store,
            blobs,
            auth: MemoryAuth::new(),
            session: SessionProvider::new(),
        }
    }

    /// Drive the session from the auth collaborator in the background.
    pub fn follow_auth(&self) -> JoinHandle<()> {
        let auth = self.auth.clone();
        let session = self.session.clone();
        tokio::spawn(async move {
            tracing::debug!("following auth collaborator");
            session.follow(&auth).await
        })
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new()
    }
}
