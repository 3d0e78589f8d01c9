//! # Blog Client
//!
//! Typed wrapper over the posts REST API, for frontends and tooling.
//!
//! ```ignore
//! let client = PostsClient::new("http://localhost:3000");
//! let posts = client
//!     .list_posts(&ListPostsQuery {
//!         sort_by: Some("updatedAt".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

use reqwest::{RequestBuilder, Response, StatusCode};
use thiserror::Error;
use uuid::Uuid;

use blog_shared::ErrorResponse;
use blog_shared::dto::{CreatePostRequest, ListPostsQuery, PostResponse, UpdatePostRequest};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server replied {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Client for the `/api/v1/posts` endpoints.
#[derive(Debug, Clone)]
pub struct PostsClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn posts_url(&self) -> String {
        format!("{}/api/v1/posts", self.base_url)
    }

    fn post_url(&self, id: Uuid) -> String {
        format!("{}/api/v1/posts/{id}", self.base_url)
    }

    fn list_request(&self, query: &ListPostsQuery) -> RequestBuilder {
        self.http.get(self.posts_url()).query(query)
    }

    /// List posts. Unset query fields are not sent.
    pub async fn list_posts(&self, query: &ListPostsQuery) -> ClientResult<Vec<PostResponse>> {
        let response = self.list_request(query).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Fetch one post; `None` when the server has no post with this id.
    pub async fn get_post(&self, id: Uuid) -> ClientResult<Option<PostResponse>> {
        let response = self.http.get(self.post_url(id)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(status_error(response).await),
        }
    }

    pub async fn create_post(&self, post: &CreatePostRequest) -> ClientResult<PostResponse> {
        tracing::debug!(title = ?post.title, "Creating post");

        let response = self.http.post(self.posts_url()).json(post).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        patch: &UpdatePostRequest,
    ) -> ClientResult<PostResponse> {
        let response = self.http.patch(self.post_url(id)).json(patch).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Delete a post. Returns `false` when there was nothing to delete.
    pub async fn delete_post(&self, id: Uuid) -> ClientResult<bool> {
        let response = self.http.delete(self.post_url(id)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(status_error(response).await),
        }
    }
}

async fn status_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let detail = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.detail);

    ClientError::Status { status, detail }
}
