use async_trait::async_trait;

use crate::domain::{ListOptions, Post, PostFilter, PostId, PostPatch};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity and return it as stored.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, returning how many records were removed.
    async fn delete(&self, id: ID) -> Result<u64, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// All posts matching `filter`, ordered by `options`.
    async fn list(
        &self,
        filter: &PostFilter,
        options: ListOptions,
    ) -> Result<Vec<Post>, RepoError>;

    /// Write only the fields present in `patch` and refresh `updated_at`, as one
    /// atomic step. `Ok(None)` when no post has this id.
    ///
    /// The patch must already be validated.
    async fn apply_patch(
        &self,
        id: PostId,
        patch: PostPatch,
    ) -> Result<Option<Post>, RepoError>;
}
