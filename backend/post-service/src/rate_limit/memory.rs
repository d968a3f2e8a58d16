use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use super::{RateLimitDecision, RateLimitError, RateLimitPolicy, RateLimiter};
use crate::clock::Clock;

/// Single-process sliding-window log.
pub struct InMemoryRateLimiter {
    clock: Arc<dyn Clock>,
    windows: DashMap<String, VecDeque<DateTime<Utc>>>,
}

impl InMemoryRateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            windows: DashMap::new(),
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check_and_consume(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let window = chrono::Duration::from_std(policy.window)
            .map_err(|e| RateLimitError::InvalidPolicy(e.to_string()))?;
        let now = self.clock.now();
        let cutoff = now - window;

        let mut admitted = self.windows.entry(key.to_string()).or_default();
        while admitted.front().is_some_and(|at| *at <= cutoff) {
            admitted.pop_front();
        }

        if admitted.len() >= policy.max_actions as usize {
            return Ok(RateLimitDecision::denied());
        }

        admitted.push_back(now);
        Ok(RateLimitDecision::allowed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::rate_limit::POST_CREATE_POLICY;
    use chrono::Duration;

    fn limiter() -> (Arc<ManualClock>, InMemoryRateLimiter) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let limiter = InMemoryRateLimiter::new(clock.clone());
        (clock, limiter)
    }

    #[tokio::test]
    async fn fourth_action_in_window_is_denied() {
        let (clock, limiter) = limiter();

        for _ in 0..3 {
            let decision = limiter
                .check_and_consume("user_1", &POST_CREATE_POLICY)
                .await
                .unwrap();
            assert!(decision.allowed);
            clock.advance(Duration::seconds(10));
        }

        let decision = limiter
            .check_and_consume("user_1", &POST_CREATE_POLICY)
            .await
            .unwrap();
        assert!(!decision.allowed);
    }

    #[tokio::test]
    async fn window_slides_exactly_at_boundary() {
        let (clock, limiter) = limiter();
        for _ in 0..3 {
            limiter
                .check_and_consume("user_1", &POST_CREATE_POLICY)
                .await
                .unwrap();
        }

        clock.advance(Duration::seconds(59));
        let decision = limiter
            .check_and_consume("user_1", &POST_CREATE_POLICY)
            .await
            .unwrap();
        assert!(!decision.allowed);

        clock.advance(Duration::seconds(1));
        let decision = limiter
            .check_and_consume("user_1", &POST_CREATE_POLICY)
            .await
            .unwrap();
        assert!(decision.allowed);
    }

    #[tokio::test]
    async fn denied_attempts_do_not_extend_the_window() {
        let (clock, limiter) = limiter();
        for _ in 0..3 {
            limiter
                .check_and_consume("user_1", &POST_CREATE_POLICY)
                .await
                .unwrap();
        }
        for _ in 0..5 {
            clock.advance(Duration::seconds(5));
            let decision = limiter
                .check_and_consume("user_1", &POST_CREATE_POLICY)
                .await
                .unwrap();
            assert!(!decision.allowed);
        }

        clock.advance(Duration::seconds(35));
        let decision = limiter
            .check_and_consume("user_1", &POST_CREATE_POLICY)
            .await
            .unwrap();
        assert!(decision.allowed);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let (_clock, limiter) = limiter();
        for _ in 0..3 {
            limiter
                .check_and_consume("user_1", &POST_CREATE_POLICY)
                .await
                .unwrap();
        }

        let decision = limiter
            .check_and_consume("user_2", &POST_CREATE_POLICY)
            .await
            .unwrap();
        assert!(decision.allowed);
    }
}
