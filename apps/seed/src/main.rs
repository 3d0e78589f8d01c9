//! Seeder - inserts a fixed set of sample posts.

use std::sync::Arc;

use anyhow::Context;
use blog_core::PostService;
use blog_core::domain::NewPost;
use blog_infra::{DatabaseConfig, DatabasePool, PostgresPostRepository};

const SAMPLES: &[(&str, Option<&str>, Option<&str>, &[&str])] = &[
    (
        "Hello Postgres!",
        Some("Daniel Bugl"),
        Some("This post is stored in a PostgreSQL database."),
        &["sea-orm", "postgres"],
    ),
    ("Learning Redux", Some("Daniel Bugl"), None, &["redux"]),
    ("Learn React Hooks", Some("Daniel Bugl"), None, &["react"]),
    (
        "Full-Stack React Projects",
        Some("Daniel Bugl"),
        Some("This Full-Stack React Projects book is awesome!"),
        &["react", "nodejs"],
    ),
    (
        "Hello React!",
        Some("Roland Klahitar"),
        Some("This is my first post in this book."),
        &["JavaScript", "React"],
    ),
    (
        "Hello again, Postgres!",
        Some("Andrew Pete"),
        None,
        &["TypeScript", "Postgres"],
    ),
    ("Web Framework!", Some("Roland Klahitar"), None, &["Actix"]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = DatabasePool::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .context("failed to connect to the post store")?;
    pool.ensure_schema().await?;

    let service = PostService::new(Arc::new(PostgresPostRepository::new(pool.connection())));

    for (title, author, contents, tags) in SAMPLES {
        let post = service
            .create(NewPost {
                title: title.to_string(),
                author: author.map(str::to_string),
                contents: contents.map(str::to_string),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            })
            .await?;
        tracing::info!(id = %post.id, title = %post.title, "Seeded post");
    }

    tracing::info!(count = SAMPLES.len(), "Seeding complete");
    pool.close().await?;
    Ok(())
}
