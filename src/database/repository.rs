use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewSecret, Secret, SecretPatch};
use crate::query::ListQuery;

/// One page of a listing: the rows for the requested page plus the total
/// number of rows matching the filters.
#[derive(Debug, Clone)]
pub struct SecretPage {
    pub rows: Vec<Secret>,
    pub total: i64,
}

/// Storage operations for secrets. Every operation takes the owning user and
/// is scoped to it; a row belonging to someone else behaves exactly like a
/// row that does not exist.
#[async_trait]
pub trait SecretRepository: Send + Sync {
    /// Fetch one page of the owner's secrets along with the unpaged total.
    async fn list(&self, query: &ListQuery) -> Result<SecretPage, DatabaseError>;

    /// Insert a new secret owned by `user_id`.
    async fn insert(&self, user_id: Uuid, new: NewSecret) -> Result<Secret, DatabaseError>;

    /// Apply a partial update, bumping `updated_at` even for an empty patch.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: SecretPatch,
    ) -> Result<Secret, DatabaseError>;

    /// Delete a secret by id, scoped to its owner.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError>;
}
