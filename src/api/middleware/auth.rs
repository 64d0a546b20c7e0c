//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Principal, UserRole};
use crate::errors::AppError;

/// JWT authentication middleware.
///
/// Extracts and validates the access token from the Authorization header,
/// then injects the [`Principal`] into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let principal = Principal {
        id: claims.sub,
        username: claims.username,
        role: UserRole::from(claims.role.as_str()),
    };

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
