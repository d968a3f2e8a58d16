use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{PostStore, StoreError};
use crate::models::{AuthorId, Post};

/// Process-local post store. Posts are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an already-built post, keeping its id and timestamp.
    pub async fn push(&self, post: Post) {
        self.posts.write().await.push(post);
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn query_recent_posts(&self, limit: u32) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        let mut recent: Vec<Post> = posts.iter().rev().cloned().collect();
        // stable: equal timestamps stay newest-inserted first
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit as usize);
        Ok(recent)
    }

    async fn insert_post(
        &self,
        author_id: &AuthorId,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Post, StoreError> {
        let post = Post {
            id: Uuid::new_v4(),
            author_id: author_id.clone(),
            content: content.to_string(),
            created_at,
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn recent_posts_newest_first_with_insertion_tiebreak() {
        let store = InMemoryPostStore::new();
        let t0 = Utc::now();
        let author = AuthorId::new("user_1");

        let first = store.insert_post(&author, "🍎", t0).await.unwrap();
        let second = store.insert_post(&author, "🍐", t0).await.unwrap();
        let newest = store
            .insert_post(&author, "🍊", t0 + Duration::seconds(1))
            .await
            .unwrap();

        let posts = store.query_recent_posts(10).await.unwrap();
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newest.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn query_respects_limit() {
        let store = InMemoryPostStore::new();
        let author = AuthorId::new("user_1");
        let t0 = Utc::now();
        for i in 0..5 {
            store
                .insert_post(&author, "🍎", t0 + Duration::seconds(i))
                .await
                .unwrap();
        }

        let posts = store.query_recent_posts(3).await.unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].created_at, t0 + Duration::seconds(4));
        assert_eq!(store.len().await, 5);
    }
}
