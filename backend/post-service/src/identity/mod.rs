/// Identity provider access
///
/// Authors are resolved in one batch per feed request to avoid N+1 lookups.
/// Ids the provider does not know are simply absent from the result.
use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AuthorId, AuthorSummary};

mod http;
mod memory;

pub use http::HttpIdentityClient;
pub use memory::InMemoryIdentityProvider;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Identity provider returned status {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the given users, returning at most `limit` summaries.
    async fn batch_get_users(
        &self,
        ids: &[AuthorId],
        limit: u32,
    ) -> Result<Vec<AuthorSummary>, IdentityError>;
}
