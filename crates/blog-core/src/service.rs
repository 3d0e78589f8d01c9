//! Query service over post records.

use std::sync::Arc;

use crate::domain::{ListOptions, NewPost, Post, PostFilter, PostId, PostPatch};
use crate::error::DomainError;
use crate::ports::PostRepository;

/// List/get/create/update/delete over posts, backed by an explicitly supplied store.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// Every post matching `filter`, ordered by `options`. No pagination.
    pub async fn list(
        &self,
        filter: &PostFilter,
        options: ListOptions,
    ) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.list(filter, options).await?)
    }

    /// `Ok(None)` when no post has this id.
    pub async fn get_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn create(&self, fields: NewPost) -> Result<Post, DomainError> {
        let post = Post::new(fields)?;
        Ok(self.repo.insert(post).await?)
    }

    /// Apply only the supplied fields and refresh `updated_at`.
    /// Unsupplied fields are never written.
    pub async fn update(&self, id: PostId, patch: PostPatch) -> Result<Post, DomainError> {
        patch.validate()?;

        self.repo
            .apply_patch(id, patch)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Hard delete. Returns 1 when a post was removed, 0 when none matched.
    pub async fn delete(&self, id: PostId) -> Result<u64, DomainError> {
        Ok(self.repo.delete(id).await?)
    }
}

fn not_found(id: PostId) -> DomainError {
    DomainError::NotFound {
        entity_type: "Post",
        id: id.as_uuid(),
    }
}
