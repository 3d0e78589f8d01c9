//! Post handlers.

use actix_web::{HttpResponse, web};

use blog_core::domain::{ListOptions, NewPost, Post, PostFilter, PostId, PostPatch};
use blog_shared::dto::{CreatePostRequest, ListPostsQuery, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let (filter, options) = list_params(query.into_inner())?;
    tracing::debug!(
        ?filter,
        sort_by = %options.sort_by,
        sort_order = %options.sort_order,
        "Listing posts"
    );

    let posts = state.posts.list(&filter, options).await?;

    Ok(HttpResponse::Ok().json(
        posts
            .into_iter()
            .map(post_response)
            .collect::<Vec<_>>(),
    ))
}

/// GET /api/v1/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id: PostId = path.parse()?;

    match state.posts.get_by_id(id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post_response(post))),
        None => Err(AppError::NotFound(format!("Post with id {} not found", id))),
    }
}

/// POST /api/v1/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .create(NewPost {
            title: req.title.unwrap_or_default(),
            author: req.author,
            contents: req.contents,
            tags: req.tags,
        })
        .await?;
    tracing::info!(id = %post.id, "Post created");

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PATCH /api/v1/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id: PostId = path.parse()?;
    let req = body.into_inner();

    let post = state
        .posts
        .update(
            id,
            PostPatch {
                title: req.title,
                author: req.author,
                contents: req.contents,
                tags: req.tags,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id: PostId = path.parse()?;

    match state.posts.delete(id).await? {
        0 => Err(AppError::NotFound(format!("Post with id {} not found", id))),
        _ => {
            tracing::info!(%id, "Post deleted");
            Ok(HttpResponse::NoContent().finish())
        }
    }
}

/// Any method on /api/v1/posts/ without an id.
pub async fn missing_id() -> AppResult<HttpResponse> {
    Err(AppError::BadRequest("A post id is required".to_string()))
}

fn list_params(query: ListPostsQuery) -> AppResult<(PostFilter, ListOptions)> {
    let author = query.author.filter(|a| !a.is_empty());
    let tag = query.tag.filter(|t| !t.is_empty());

    let filter = match (author, tag) {
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Please specify either author or tag, not both.".to_string(),
            ));
        }
        (Some(author), None) => PostFilter::Author(author),
        (None, Some(tag)) => PostFilter::Tag(tag),
        (None, None) => PostFilter::All,
    };

    let mut options = ListOptions::default();
    if let Some(sort_by) = query.sort_by {
        options.sort_by = sort_by.parse()?;
    }
    if let Some(sort_order) = query.sort_order {
        options.sort_order = sort_order.parse()?;
    }

    Ok((filter, options))
}

pub fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.into(),
        title: post.title,
        author: post.author,
        contents: post.contents,
        tags: post.tags,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use blog_shared::ErrorResponse;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::handlers::{configure_routes, not_found};

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(configure_routes)
                    .default_service(web::to(not_found)),
            )
            .await
        };
    }

    async fn seeded_state() -> (AppState, Vec<Post>) {
        let state = AppState::in_memory();
        let samples = [
            ("Learning Redux", Some("Daniel Bugl"), vec!["redux"]),
            ("Learn React Hooks", Some("Daniel Bugl"), vec!["react"]),
            ("Full-Stack React Projects", Some("Daniel Bugl"), vec!["react", "nodejs"]),
            ("Guide to TypeScript", None, vec![]),
        ];

        let mut created = Vec::new();
        for (title, author, tags) in samples {
            let post = state
                .posts
                .create(NewPost {
                    title: title.to_string(),
                    author: author.map(str::to_string),
                    contents: None,
                    tags: tags.into_iter().map(str::to_string).collect(),
                })
                .await
                .unwrap();
            created.push(post);
        }
        (state, created)
    }

    #[actix_rt::test]
    async fn list_returns_all_posts_newest_first() {
        let (state, created) = seeded_state().await;
        let app = init_app!(state);

        let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
        let posts: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(posts.len(), created.len());
        assert!(posts.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[actix_rt::test]
    async fn list_filters_by_tag() {
        let (state, _) = seeded_state().await;
        let app = init_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?tag=react&sortBy=title&sortOrder=ascending")
            .to_request();
        let posts: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;

        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Full-Stack React Projects", "Learn React Hooks"]);
    }

    #[actix_rt::test]
    async fn list_treats_empty_author_as_absent() {
        let (state, created) = seeded_state().await;
        let app = init_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?author=")
            .to_request();
        let posts: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(posts.len(), created.len());
    }

    #[actix_rt::test]
    async fn list_rejects_author_and_tag_together() {
        let (state, _) = seeded_state().await;
        let app = init_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?author=Daniel%20Bugl&tag=react")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(
            error.detail.as_deref(),
            Some("Please specify either author or tag, not both.")
        );
    }

    #[actix_rt::test]
    async fn list_rejects_unknown_sort_field() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::get()
            .uri("/api/v1/posts?sortBy=password")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn get_post_by_id() {
        let (state, created) = seeded_state().await;
        let app = init_app!(state);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{}", created[0].id))
            .to_request();
        let post: PostResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(post, post_response(created[0].clone()));
    }

    #[actix_rt::test]
    async fn get_unknown_and_malformed_ids() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{}", Uuid::new_v4()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/v1/posts/not-an-id")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/v1/posts/").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn create_returns_created_post() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({
                "title": "Hello Actix!",
                "author": "Daniel Bugl",
                "tags": ["rust"]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let post: PostResponse = test::read_body_json(resp).await;
        assert_eq!(post.title, "Hello Actix!");
        assert_eq!(post.tags, ["rust"]);
        assert!(post.contents.is_none());
        assert_eq!(post.created_at, post.updated_at);
    }

    #[actix_rt::test]
    async fn create_without_title_is_bad_request() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({ "author": "Daniel Bugl" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = test::read_body_json(resp).await;
        assert!(error.detail.unwrap().contains("`title` is required"));
    }

    #[actix_rt::test]
    async fn create_with_invalid_json_is_bad_request() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn update_changes_supplied_fields() {
        let (state, created) = seeded_state().await;
        let app = init_app!(state);
        let original = &created[1];

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{}", original.id))
            .set_json(json!({ "title": "Minimal Update" }))
            .to_request();
        let post: PostResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(post.title, "Minimal Update");
        assert_eq!(post.author, original.author);
        assert_eq!(post.tags, original.tags);
        assert!(post.updated_at > original.updated_at);
    }

    #[actix_rt::test]
    async fn update_errors() {
        let (state, created) = seeded_state().await;
        let app = init_app!(state);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{}", created[0].id))
            .set_json(json!({ "title": "" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{}", created[0].id))
            .set_json(json!({}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/posts/{}", Uuid::new_v4()))
            .set_json(json!({ "title": "Non-existing Post" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn delete_then_delete_again() {
        let (state, created) = seeded_state().await;
        let app = init_app!(state);
        let uri = format!("/api/v1/posts/{}", created[0].id);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn health_and_unknown_routes() {
        let app = init_app!(AppState::in_memory());

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let health: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["storage"], "memory");

        let req = test::TestRequest::get().uri("/api/v2/nothing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(error.status, 404);
    }
}
