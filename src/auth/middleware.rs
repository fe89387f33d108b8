use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{auth::jwt::JwtKeys, error::ApiError, state::AppState};

const PUBLIC_API_PATHS: [&str; 2] = ["/api/auth/login", "/api/auth/register"];

fn requires_token(path: &str) -> bool {
    path.starts_with("/api") && !PUBLIC_API_PATHS.contains(&path)
}

/// Bearer gate for the API surface. Everything under /api except login
/// and register must carry a valid token.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !requires_token(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized("missing token"))?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .ok_or(ApiError::Unauthorized("invalid authorization header"))?;

    if JwtKeys::from_ref(&state).verify(token).is_err() {
        warn!("invalid or expired token");
        return Err(ApiError::Unauthorized("invalid token"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_register_are_public() {
        assert!(!requires_token("/api/auth/login"));
        assert!(!requires_token("/api/auth/register"));
    }

    #[test]
    fn other_api_paths_require_a_token() {
        assert!(requires_token("/api/users"));
        assert!(requires_token("/api/users/7b2d"));
        assert!(requires_token("/api/auth/google-url"));
        assert!(requires_token("/api/auth/google-callback"));
    }

    #[test]
    fn non_api_paths_pass_through() {
        assert!(!requires_token("/health"));
        assert!(!requires_token("/"));
    }
}
