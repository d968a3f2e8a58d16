/// Business logic layer for post-service
///
/// - Feed service: recent posts joined with author identities
/// - Post service: validated, rate-limited post creation
pub mod feed;
pub mod posts;

pub use feed::{FeedService, MAX_FEED_SIZE};
pub use posts::PostService;
