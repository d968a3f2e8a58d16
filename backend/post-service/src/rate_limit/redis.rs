use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use uuid::Uuid;

use super::{RateLimitDecision, RateLimitError, RateLimitPolicy, RateLimiter};
use crate::clock::Clock;

/// Prune, count and record in one round trip so concurrent callers cannot
/// both observe the last free slot.
///
/// KEYS[1] = window key, ARGV = now_ms, window_ms, max_actions, member
const SLIDING_WINDOW_LUA: &str = r#"
    local key = KEYS[1]
    local now = tonumber(ARGV[1])
    local window = tonumber(ARGV[2])
    local limit = tonumber(ARGV[3])
    redis.call('ZREMRANGEBYSCORE', key, '-inf', now - window)
    if redis.call('ZCARD', key) >= limit then
        return 0
    end
    redis.call('ZADD', key, now, ARGV[4])
    redis.call('PEXPIRE', key, window)
    return 1
"#;

/// Redis sorted-set sliding-window log, shared by every service replica.
pub struct RedisRateLimiter {
    redis: ConnectionManager,
    clock: Arc<dyn Clock>,
}

impl RedisRateLimiter {
    pub fn new(redis: ConnectionManager, clock: Arc<dyn Clock>) -> Self {
        Self { redis, clock }
    }

    fn window_key(key: &str) -> String {
        format!("rate_limit:{}", key)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check_and_consume(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let window_ms = i64::try_from(policy.window.as_millis())
            .map_err(|_| RateLimitError::InvalidPolicy("window too large".to_string()))?;
        let now_ms = self.clock.now().timestamp_millis();
        let member = format!("{}-{}", now_ms, Uuid::new_v4());
        let mut conn = self.redis.clone();

        let admitted: i64 = redis::cmd("EVAL")
            .arg(SLIDING_WINDOW_LUA)
            .arg(1)
            .arg(Self::window_key(key))
            .arg(now_ms)
            .arg(window_ms)
            .arg(policy.max_actions)
            .arg(member)
            .query_async(&mut conn)
            .await?;

        Ok(if admitted == 1 {
            RateLimitDecision::allowed()
        } else {
            RateLimitDecision::denied()
        })
    }
}
