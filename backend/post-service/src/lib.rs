/// Post Service Library
///
/// Emoji-only posts and the public feed for the Chirp platform.
///
/// # Modules
///
/// - `services`: Feed aggregation and post creation (the business logic)
/// - `store`: Post storage contract plus Postgres and in-memory backends
/// - `identity`: Identity provider contract plus HTTP and in-memory backends
/// - `rate_limit`: Sliding-window rate limiting (Redis and in-memory)
/// - `handlers`: Thin HTTP endpoints over the services
/// - `middleware`: Caller identity extraction
/// - `models`: Posts, author summaries and feed entries
/// - `validators`: Content policy checks
/// - `clock`: Time source used for timestamps and rate limiting
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod services;
pub mod store;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
