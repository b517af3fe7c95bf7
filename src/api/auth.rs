use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::api::routes::AppState;
use crate::error::AppError;

/// Shared-secret check applied to every protected route.
///
/// Accepts either the bare secret or `Bearer <secret>`; the prefix is
/// stripped before exact comparison.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::ApiKeyMissing)?;

    let value = header_value.to_str().map_err(|_| AppError::ApiKeyInvalid)?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value);

    if token != state.config.api_key {
        tracing::warn!("Rejected request with invalid API key");
        return Err(AppError::ApiKeyInvalid);
    }

    Ok(next.run(request).await)
}
