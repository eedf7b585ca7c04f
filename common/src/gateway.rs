//! Listing store gateway: the only path by which pages touch listings.
//! Drafts are validated before the store is called, and edits made on
//! behalf of a session are checked against the listing's owner first.

use futures::future::join_all;

use crate::backend::{BlobStore, DocumentStore, StoreQuery};
use crate::config::BackendConfig;
use crate::draft::ListingDraft;
use crate::error::{MarketError, Result};
use crate::listing::{Listing, ListingId, ListingPatch};
use crate::session::{Identity, Owner};
use crate::subscription::Subscription;

#[derive(Debug, Clone)]
pub struct ListingGateway<S, B> {
    store: S,
    blobs: B,
    config: BackendConfig,
}

impl<S: DocumentStore, B: BlobStore> ListingGateway<S, B> {
    pub fn new(store: S, blobs: B, config: BackendConfig) -> Self {
        Self {
            store,
            blobs,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Validate `draft` and insert it on behalf of `owner`.
    pub async fn create(&self, owner: &Owner, draft: &ListingDraft) -> Result<ListingId> {
        let listing = draft.into_new_listing(owner)?;
        let id = self.store.insert(listing).await?;
        tracing::debug!(%id, owner = %owner.uid, "listing created");
        Ok(id)
    }

    pub async fn get(&self, id: &ListingId) -> Result<Option<Listing>> {
        Ok(self.store.get(id).await?)
    }

    /// Like [`get`](Self::get), but a missing listing is an error.
    pub async fn fetch(&self, id: &ListingId) -> Result<Listing> {
        self.get(id)
            .await?
            .ok_or_else(|| MarketError::NotFound(id.clone()))
    }

    /// Unchecked partial update.
    pub async fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.store.update(id, patch).await?;
        tracing::debug!(%id, "listing updated");
        Ok(())
    }

    /// Update only if `who` owns the listing.
    pub async fn update_as(&self, who: &Identity, id: &ListingId, patch: ListingPatch) -> Result<()> {
        self.owned_by(who, id).await?;
        self.update(id, patch).await
    }

    /// Validate an edit form and save it on behalf of `who`.
    pub async fn save_draft(&self, who: &Identity, id: &ListingId, draft: &ListingDraft) -> Result<()> {
        let patch = draft.into_patch()?;
        self.update_as(who, id, patch).await
    }

    /// Remove the listing's store-hosted images, then the listing itself.
    /// Image cleanup is best effort: a failed blob delete is logged and the
    /// document is deleted regardless.
    pub async fn delete(&self, listing: &Listing) -> Result<()> {
        let paths: Vec<String> = listing
            .images
            .iter()
            .filter_map(|url| self.config.blob_path(url))
            .collect();

        let results = join_all(paths.iter().map(|path| self.blobs.delete(path))).await;
        for (path, result) in paths.iter().zip(results) {
            if let Err(err) = result {
                tracing::warn!(%path, %err, "image cleanup failed");
            }
        }

        self.store.delete(&listing.id).await?;
        tracing::debug!(id = %listing.id, blobs = paths.len(), "listing deleted");
        Ok(())
    }

    /// Delete only if `who` owns the listing.
    pub async fn delete_as(&self, who: &Identity, id: &ListingId) -> Result<()> {
        let listing = self.owned_by(who, id).await?;
        self.delete(&listing).await
    }

    /// Every listing, newest first, pushed on every change.
    pub fn subscribe_all(&self) -> Subscription<Vec<Listing>> {
        self.store.subscribe(StoreQuery::Latest)
    }

    /// Listings owned by `uid`, newest first.
    pub fn subscribe_by_owner(&self, uid: &str) -> Subscription<Vec<Listing>> {
        self.store.subscribe(StoreQuery::ByOwner(uid.to_string()))
    }

    async fn owned_by(&self, who: &Identity, id: &ListingId) -> Result<Listing> {
        let listing = self.fetch(id).await?;
        if !listing.is_owned_by(&who.uid) {
            tracing::warn!(%id, uid = %who.uid, "rejected change by non-owner");
            return Err(MarketError::NotAuthorized(id.clone()));
        }
        Ok(listing)
    }
}
