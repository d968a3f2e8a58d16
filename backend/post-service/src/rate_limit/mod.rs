//! Per-key sliding-window rate limiting.
//!
//! An action at time `t` is admitted when fewer than `max_actions` earlier
//! admitted actions for the same key fall inside `(t - window, t]`. Rejected
//! attempts are not recorded, so a caller hammering the endpoint does not
//! extend its own lockout.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

mod memory;
mod redis;

pub use self::memory::InMemoryRateLimiter;
pub use self::redis::RedisRateLimiter;

/// Post creation quota: 3 posts per rolling minute per author.
pub const POST_CREATE_POLICY: RateLimitPolicy =
    RateLimitPolicy::sliding_window(3, Duration::from_secs(60));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_actions: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const fn sliding_window(max_actions: u32, window: Duration) -> Self {
        Self {
            max_actions,
            window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
}

impl RateLimitDecision {
    pub const fn allowed() -> Self {
        Self { allowed: true }
    }

    pub const fn denied() -> Self {
        Self { allowed: false }
    }
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Invalid rate limit policy: {0}")]
    InvalidPolicy(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record an action for `key` if the policy allows it.
    async fn check_and_consume(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitDecision, RateLimitError>;
}
