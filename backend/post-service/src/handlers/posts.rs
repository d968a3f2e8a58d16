/// Post handlers - HTTP endpoints for the feed and post creation
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::NewPost;
use crate::services::{FeedService, PostService};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<u32>,
}

/// List the most recent posts with their authors
pub async fn list_feed(
    feed: web::Data<FeedService>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let entries = feed.list_feed(query.limit).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Create a new post as the calling user
pub async fn create_post(
    posts: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<NewPost>,
) -> Result<HttpResponse> {
    let post = posts.create_post(&user_id.0, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}
