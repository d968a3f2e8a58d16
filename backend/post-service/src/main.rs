use actix_web::{web, App, HttpServer};
use anyhow::Context;
use post_service::clock::{Clock, SystemClock};
use post_service::config::StorageBackend;
use post_service::handlers;
use post_service::identity::{HttpIdentityClient, IdentityProvider, InMemoryIdentityProvider};
use post_service::rate_limit::{InMemoryRateLimiter, RateLimiter, RedisRateLimiter};
use post_service::services::{FeedService, PostService};
use post_service::store::{InMemoryPostStore, PgPostStore, PostStore};
use post_service::Config;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Collaborators {
    store: Arc<dyn PostStore>,
    identity: Arc<dyn IdentityProvider>,
    limiter: Arc<dyn RateLimiter>,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_external(config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<Collaborators> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let redis_client =
        redis::Client::open(config.cache.url.as_str()).context("invalid REDIS_URL")?;
    let redis = redis::aio::ConnectionManager::new(redis_client)
        .await
        .context("failed to connect to Redis")?;

    let identity =
        HttpIdentityClient::new(&config.identity).context("failed to build identity client")?;

    Ok(Collaborators {
        store: Arc::new(PgPostStore::new(pool)),
        identity: Arc::new(identity),
        limiter: Arc::new(RedisRateLimiter::new(redis, clock)),
    })
}

fn in_memory(clock: Arc<dyn Clock>) -> Collaborators {
    Collaborators {
        store: Arc::new(InMemoryPostStore::new()),
        identity: Arc::new(InMemoryIdentityProvider::default()),
        limiter: Arc::new(InMemoryRateLimiter::new(clock)),
    }
}

/// Post Service
///
/// Serves the public emoji feed and accepts new posts.
///
/// # Routes
///
/// - `GET /api/v1/posts` - Recent posts with authors
/// - `POST /api/v1/posts` - Create a post (caller id from `X-User-Id`)
/// - `GET /api/v1/health` - Liveness
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.app.json_logs);

    tracing::info!("Starting post-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let collaborators = match config.storage {
        StorageBackend::External => connect_external(&config, clock.clone()).await?,
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            in_memory(clock.clone())
        }
    };

    let feed = web::Data::new(
        FeedService::new(collaborators.store.clone(), collaborators.identity)
            .with_default_limit(config.feed.default_page_size),
    );
    let posts = web::Data::new(PostService::new(
        collaborators.store,
        collaborators.limiter,
        clock,
    ));

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(feed.clone())
            .app_data(posts.clone())
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
