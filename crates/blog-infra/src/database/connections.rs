#[cfg(feature = "postgres")]
use std::sync::Arc;
#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr, Schema};

/// Configuration for the post store database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Connection pool for the post store.
///
/// Opened once at startup; repositories share the connection through
/// [`DatabasePool::connection`]. Call [`DatabasePool::close`] when the server
/// has stopped.
#[cfg(feature = "postgres")]
pub struct DatabasePool {
    conn: Arc<DbConn>,
}

#[cfg(feature = "postgres")]
impl DatabasePool {
    /// Open the pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Connecting to post store...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            max_connections = config.max_connections,
            "Post store connected"
        );

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Create the `posts` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let mut stmt = schema.create_table_from_entity(super::entity::post::Entity);
        stmt.if_not_exists();

        self.conn.execute(backend.build(&stmt)).await?;
        tracing::debug!("Post store schema ready");
        Ok(())
    }

    pub fn connection(&self) -> Arc<DbConn> {
        Arc::clone(&self.conn)
    }

    /// Close every pooled connection, including those still shared with repositories.
    pub async fn close(self) -> Result<(), DbErr> {
        self.conn.close_by_ref().await?;
        tracing::info!("Post store connection closed");
        Ok(())
    }
}
