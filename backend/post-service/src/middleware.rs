/// Caller identity extraction
///
/// Authentication happens upstream; the gateway forwards the verified user
/// id in `X-User-Id`. Handlers that need an author take a [`UserId`].
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::AuthorId;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct UserId(pub AuthorId);

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.headers()
                .get(USER_ID_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| UserId(AuthorId::new(id)))
                .ok_or_else(|| AppError::Unauthorized("Missing user context".to_string())),
        )
    }
}
