/// Post service - validated, rate-limited post creation
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::{Validate, ValidationErrors};

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::{AuthorId, NewPost, Post};
use crate::rate_limit::{RateLimitPolicy, RateLimiter, POST_CREATE_POLICY};
use crate::store::PostStore;

pub struct PostService {
    store: Arc<dyn PostStore>,
    limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
    policy: RateLimitPolicy,
}

impl PostService {
    pub fn new(
        store: Arc<dyn PostStore>,
        limiter: Arc<dyn RateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            limiter,
            clock,
            policy: POST_CREATE_POLICY,
        }
    }

    pub fn with_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create a post on behalf of an already-authenticated author.
    ///
    /// Validation runs before anything else, then the author's quota is
    /// consumed, then the post is written. Returns the stored post.
    #[instrument(skip(self, author_id, input), fields(author_id = %author_id))]
    pub async fn create_post(&self, author_id: &AuthorId, input: NewPost) -> Result<Post> {
        if let Err(errors) = input.validate() {
            let err = validation_error(&errors);
            debug!(error = %err, "post rejected by validation");
            return Err(err);
        }

        let key = rate_limit_key(author_id);
        match self.limiter.check_and_consume(&key, &self.policy).await {
            Ok(decision) if decision.allowed => {}
            Ok(_) => {
                info!("post creation rate limited");
                return Err(AppError::RateLimited);
            }
            Err(e) => {
                // fail open on limiter outage
                warn!(error = %e, "rate limiter unavailable, allowing post");
            }
        }

        let post = self
            .store
            .insert_post(author_id, &input.content, self.clock.now())
            .await
            .map_err(|e| {
                error!(error = %e, "failed to store post");
                AppError::from(e)
            })?;

        info!(post_id = %post.id, "post created");
        Ok(post)
    }
}

fn rate_limit_key(author_id: &AuthorId) -> String {
    format!("post:create:{}", author_id)
}

/// Collapse `validator` output into one field-scoped error, preferring a
/// length failure over a content-policy failure.
fn validation_error(errors: &ValidationErrors) -> AppError {
    let mut fields: Vec<(String, &validator::ValidationError)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| (field.clone(), err))
        })
        .collect();
    fields.sort_by_key(|(field, err)| (field.clone(), err.code != "length"));

    match fields.first() {
        Some((field, err)) => AppError::Validation {
            field: field.clone(),
            message: err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {}", field)),
        },
        None => AppError::Validation {
            field: "content".to_string(),
            message: "Invalid post".to_string(),
        },
    }
}
