//! Domain entities - the core business objects.

mod post;
mod query;

pub use post::{NewPost, Post, PostId, PostPatch};
pub use query::{ListOptions, PostFilter, SortField, SortOrder};
