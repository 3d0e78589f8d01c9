//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use blog_core::PostService;
use blog_infra::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
use blog_infra::{DatabasePool, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    /// Name of the backing store, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// State over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            posts: PostService::new(Arc::new(InMemoryPostRepository::new())),
            storage: "memory",
        }
    }
}

/// Owns the store connection for the lifetime of the server.
pub struct StoreHandle {
    #[cfg(feature = "postgres")]
    pool: Option<DatabasePool>,
}

impl StoreHandle {
    /// Release the store once the server has stopped.
    pub async fn close(self) {
        #[cfg(feature = "postgres")]
        if let Some(pool) = self.pool {
            if let Err(e) = pool.close().await {
                tracing::error!("Failed to close post store: {}", e);
            }
        }
    }
}

/// Build the application state. A configured database that cannot be reached is fatal.
pub async fn build(db_config: Option<&DatabaseConfig>) -> io::Result<(AppState, StoreHandle)> {
    #[cfg(feature = "postgres")]
    {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok((AppState::in_memory(), StoreHandle { pool: None }));
        };

        let pool = DatabasePool::connect(config).await.map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            io::Error::other(e)
        })?;
        pool.ensure_schema().await.map_err(io::Error::other)?;

        let repo = PostgresPostRepository::new(pool.connection());
        let state = AppState {
            posts: PostService::new(Arc::new(repo)),
            storage: "postgres",
        };

        tracing::info!("Application state initialized");
        Ok((state, StoreHandle { pool: Some(pool) }))
    }

    #[cfg(not(feature = "postgres"))]
    {
        if db_config.is_some() {
            tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
        }
        tracing::info!("Running with in-memory post store");
        Ok((AppState::in_memory(), StoreHandle {}))
    }
}
