//! # Blog Infrastructure
//!
//! Concrete implementations of the store ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//! - without `postgres`, only the in-memory store is built

pub mod database;

pub use database::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
pub use database::{DatabasePool, PostgresPostRepository};
