/// Post storage
///
/// The services only see [`PostStore`]. `PgPostStore` is the production
/// backend; `InMemoryPostStore` backs tests and local runs.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{AuthorId, Post};

mod memory;
mod postgres;

pub use memory::InMemoryPostStore;
pub use postgres::PgPostStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Most recent posts first; posts created at the same instant come
    /// newest-inserted first.
    async fn query_recent_posts(&self, limit: u32) -> Result<Vec<Post>, StoreError>;

    /// Persist a post and return it with its generated id.
    async fn insert_post(
        &self,
        author_id: &AuthorId,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Post, StoreError>;
}
