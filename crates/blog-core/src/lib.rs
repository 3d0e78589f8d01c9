//! # Blog Core
//!
//! The domain layer of the blog posts service.
//! Holds the post record model, the store ports and the query service.
//! No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::PostService;
