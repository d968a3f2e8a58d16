use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{PostStore, StoreError};
use crate::models::{AuthorId, Post};

/// Postgres-backed post store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct PostRow {
    id: Uuid,
    author_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            author_id: AuthorId::from(row.author_id),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn query_recent_posts(&self, limit: u32) -> Result<Vec<Post>, StoreError> {
        // seq breaks created_at ties in insertion order
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, content, created_at
            FROM posts
            ORDER BY created_at DESC, seq DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn insert_post(
        &self,
        author_id: &AuthorId,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Post, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id.as_str())
        .bind(content)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
