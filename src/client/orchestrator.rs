use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::client::api::{ClientError, CreateSecretBody, UpdateSecretBody, VaultClient};
use crate::client::store::SecretsStore;
use crate::database::models::Secret;
use crate::query::types::PaginationMeta;

/// Monotonic ticket dispenser for in-flight fetches. Claiming a new ticket
/// makes every earlier one stale.
#[derive(Debug, Default)]
struct FetchSequence(AtomicU64);

impl FetchSequence {
    fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

/// What a completed fetch did to the store.
enum SyncStep {
    /// Page applied; the cursor was valid.
    Applied,
    /// Page applied but the cursor was past the end; it was stepped back and
    /// the caller should fetch again.
    SteppedBack,
    /// A newer fetch started in the meantime; nothing was applied.
    Superseded,
}

/// Drives fetches for a `SecretsStore` against the API.
///
/// Every fetch takes a ticket from a monotonic sequence; a response may only
/// be applied while its ticket is still the newest one issued. Out-of-order
/// completions are discarded instead of overwriting fresher results.
pub struct FetchOrchestrator {
    client: VaultClient,
    store: Arc<SecretsStore>,
    sequence: FetchSequence,
}

impl FetchOrchestrator {
    pub fn new(client: VaultClient, store: Arc<SecretsStore>) -> Self {
        Self {
            client,
            store,
            sequence: FetchSequence::default(),
        }
    }

    pub fn store(&self) -> &Arc<SecretsStore> {
        &self.store
    }

    /// Fetch the page described by the current store state and apply it,
    /// unless a newer fetch has started in the meantime.
    ///
    /// When the fetched metadata shows the cursor is past the last page
    /// (rows deleted elsewhere, filters narrowed), steps back to the final
    /// page and refetches.
    pub async fn sync(&self) -> Result<(), ClientError> {
        loop {
            let snapshot = self.store.snapshot();
            let ticket = self.sequence.begin();
            self.store.set_loading(true);

            let result = self
                .client
                .list_secrets(&snapshot.filters, snapshot.page, snapshot.per_page)
                .await;

            match self.finish(ticket, snapshot.page, result)? {
                SyncStep::SteppedBack => continue,
                SyncStep::Applied | SyncStep::Superseded => return Ok(()),
            }
        }
    }

    /// Apply one completed fetch to the store, unless a newer ticket exists.
    /// A stale completion is dropped whether it succeeded or failed.
    fn finish(
        &self,
        ticket: u64,
        requested_page: i64,
        result: Result<(Vec<Secret>, PaginationMeta), ClientError>,
    ) -> Result<SyncStep, ClientError> {
        if !self.sequence.is_current(ticket) {
            return Ok(SyncStep::Superseded);
        }

        match result {
            Ok((secrets, meta)) => {
                self.store.apply_page(secrets, meta);
                if meta.total_pages > 0 && requested_page > meta.total_pages {
                    self.store.set_page(meta.total_pages);
                    return Ok(SyncStep::SteppedBack);
                }
                Ok(SyncStep::Applied)
            }
            Err(e) => {
                self.store.apply_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Clamp a requested page into the currently known valid range.
    pub fn clamped_page(&self, requested: i64) -> i64 {
        let total_pages = self.store.snapshot().total_pages;
        requested.clamp(1, total_pages.max(1))
    }

    /// Move to a page (clamped) and refetch.
    pub async fn go_to_page(&self, requested: i64) -> Result<(), ClientError> {
        self.store.set_page(self.clamped_page(requested));
        self.sync().await
    }

    /// Create a secret, then refresh the listing.
    pub async fn create(&self, body: CreateSecretBody) -> Result<Secret, ClientError> {
        let secret = self.client.create_secret(&body).await?;
        self.sync().await?;
        Ok(secret)
    }

    /// Patch a secret, then refresh the listing.
    pub async fn update(&self, id: Uuid, body: UpdateSecretBody) -> Result<Secret, ClientError> {
        let secret = self.client.update_secret(id, &body).await?;
        self.sync().await?;
        Ok(secret)
    }

    /// Delete a secret, then refresh the listing.
    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.client.delete_secret(id).await?;
        self.sync().await
    }

    /// Flip the favorite flag of an in-hand secret with a minimal patch.
    pub async fn toggle_favorite(&self, secret: &Secret) -> Result<Secret, ClientError> {
        let body = UpdateSecretBody {
            favorite: Some(!secret.favorite),
            ..Default::default()
        };
        self.update(secret.id, body).await
    }
}
