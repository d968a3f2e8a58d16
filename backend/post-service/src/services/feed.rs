/// Feed aggregation - recent posts joined with their authors
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use crate::error::{AppError, Result};
use crate::identity::IdentityProvider;
use crate::models::{AuthorId, AuthorSummary, FeedEntry, Post};
use crate::store::PostStore;

/// Hard cap on posts per feed page, and on authors per identity lookup.
pub const MAX_FEED_SIZE: u32 = 100;

pub struct FeedService {
    store: Arc<dyn PostStore>,
    identity: Arc<dyn IdentityProvider>,
    default_limit: u32,
}

impl FeedService {
    pub fn new(store: Arc<dyn PostStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            identity,
            default_limit: MAX_FEED_SIZE,
        }
    }

    /// Page size used when the caller does not ask for one (still capped).
    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit.clamp(1, MAX_FEED_SIZE);
        self
    }

    /// List the most recent posts with their authors, newest first.
    ///
    /// Fails as a whole with `DataIntegrity` if any post's author cannot be
    /// resolved to a user with a username; no partial feed is returned.
    #[instrument(skip(self))]
    pub async fn list_feed(&self, limit: Option<u32>) -> Result<Vec<FeedEntry>> {
        let limit = limit.unwrap_or(self.default_limit).clamp(1, MAX_FEED_SIZE);

        let mut posts = self.store.query_recent_posts(limit).await.map_err(|e| {
            error!(error = %e, "failed to load recent posts");
            AppError::from(e)
        })?;
        posts.truncate(limit as usize);

        if posts.is_empty() {
            debug!("no posts, skipping author lookup");
            return Ok(Vec::new());
        }

        let author_ids = distinct_author_ids(&posts);
        let authors = self
            .identity
            .batch_get_users(&author_ids, limit)
            .await
            .map_err(|e| {
                error!(error = %e, authors = author_ids.len(), "author lookup failed");
                AppError::from(e)
            })?;

        let entries = join_authors(posts, authors)?;
        info!(
            entries = entries.len(),
            authors = author_ids.len(),
            "feed assembled"
        );
        Ok(entries)
    }
}

/// Author ids in first-seen order, without duplicates.
fn distinct_author_ids(posts: &[Post]) -> Vec<AuthorId> {
    let mut seen = HashSet::with_capacity(posts.len());
    let mut ids = Vec::new();
    for post in posts {
        if seen.insert(&post.author_id) {
            ids.push(post.author_id.clone());
        }
    }
    ids
}

fn join_authors(mut posts: Vec<Post>, authors: Vec<AuthorSummary>) -> Result<Vec<FeedEntry>> {
    let authors: HashMap<AuthorId, AuthorSummary> = authors
        .into_iter()
        .map(|author| (author.id.clone(), author))
        .collect();

    // stable, so storage order decides ties
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    posts
        .into_iter()
        .map(|post| match authors.get(&post.author_id) {
            Some(author) if author.resolved_username().is_some() => Ok(FeedEntry {
                post,
                author: author.clone(),
            }),
            _ => {
                error!(
                    post_id = %post.id,
                    author_id = %post.author_id,
                    "post with unresolved author"
                );
                Err(AppError::DataIntegrity(format!(
                    "post {} has unresolved author {}",
                    post.id, post.author_id
                )))
            }
        })
        .collect()
}
