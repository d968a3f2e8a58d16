/// HTTP handlers for post-service
///
/// Thin wrappers: decode the request, call the service, encode the result.
pub mod posts;

use actix_web::{web, HttpResponse};

/// Register all routes under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health))
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_feed))
                    .route(web::post().to(posts::create_post)),
            ),
    );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "post-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
