//! In-memory post repository - used when no database is configured.
//!
//! Posts live in insertion order, which also breaks ties when sorting.
//! Data is lost on process restart.

use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{ListOptions, Post, PostFilter, PostId, PostPatch, SortField, SortOrder};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    fn matches(filter: &PostFilter, post: &Post) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Author(author) => post.author.as_deref() == Some(author.as_str()),
            PostFilter::Tag(tag) => post.tags.iter().any(|t| t == tag),
        }
    }

    fn compare(field: SortField, a: &Post, b: &Post) -> Ordering {
        match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Query(format!("duplicate post id {}", post.id)));
        }

        tracing::debug!(post_id = %post.id, "Inserting post");
        posts.push(post.clone());
        Ok(post)
    }

    async fn delete(&self, id: PostId) -> Result<u64, RepoError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);

        Ok((before - posts.len()) as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(
        &self,
        filter: &PostFilter,
        options: ListOptions,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut matching: Vec<Post> = posts
            .iter()
            .filter(|p| Self::matches(filter, p))
            .cloned()
            .collect();

        // Stable sort keeps insertion order among equal keys.
        matching.sort_by(|a, b| {
            let ordering = Self::compare(options.sort_by, a, b);
            match options.sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        Ok(matching)
    }

    async fn apply_patch(
        &self,
        id: PostId,
        patch: PostPatch,
    ) -> Result<Option<Post>, RepoError> {
        // Held across read and write so concurrent patches serialize.
        let mut posts = self.posts.write().await;
        let Some(slot) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        let mut updated = slot.clone();
        updated
            .apply(patch)
            .map_err(|e| RepoError::Query(e.to_string()))?;

        tracing::debug!(post_id = %id, "Updating post");
        *slot = updated.clone();
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use blog_core::domain::NewPost;

    fn post(title: &str, tags: &[&str]) -> Post {
        Post::new(NewPost {
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..NewPost::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryPostRepository::new();
        let saved = repo.insert(post("Stored", &[])).await.unwrap();

        let found = repo.find_by_id(saved.id).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_patch_missing_post() {
        let repo = InMemoryPostRepository::new();
        let patch = PostPatch {
            title: Some("Ghost".to_string()),
            ..PostPatch::default()
        };

        assert_eq!(repo.apply_patch(PostId::new(), patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_patches_keep_both_fields() {
        let repo = Arc::new(InMemoryPostRepository::new());
        let mut original = post("Original", &[]);
        original.author = Some("A".to_string());
        let id = repo.insert(original).await.unwrap().id;

        let title_patch = PostPatch {
            title: Some("New title".to_string()),
            ..PostPatch::default()
        };
        let author_patch = PostPatch {
            author: Some("B".to_string()),
            ..PostPatch::default()
        };
        let (first, second) = tokio::join!(
            tokio::spawn({
                let repo = Arc::clone(&repo);
                async move { repo.apply_patch(id, title_patch).await }
            }),
            tokio::spawn({
                let repo = Arc::clone(&repo);
                async move { repo.apply_patch(id, author_patch).await }
            }),
        );
        first.unwrap().unwrap().unwrap();
        second.unwrap().unwrap().unwrap();

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "New title");
        assert_eq!(stored.author.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_tag_filter_is_exact() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post("React", &["react"])).await.unwrap();
        repo.insert(post("Preact", &["preact"])).await.unwrap();

        let posts = repo
            .list(&PostFilter::Tag("react".to_string()), ListOptions::default())
            .await
            .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "React");
    }

    #[tokio::test]
    async fn test_sort_by_title_ascending() {
        let repo = InMemoryPostRepository::new();
        for title in ["b", "c", "a"] {
            repo.insert(post(title, &[])).await.unwrap();
        }

        let options = ListOptions {
            sort_by: SortField::Title,
            sort_order: SortOrder::Ascending,
        };
        let titles: Vec<String> = repo
            .list(&PostFilter::All, options)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();

        assert_eq!(titles, ["a", "b", "c"]);
    }
}
