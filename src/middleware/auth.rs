use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{validate_jwt, Claims};
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = authenticate(&headers, &state.config.security).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Resolves the caller from the Authorization header, if it carries a valid token.
pub fn optional_user(headers: &HeaderMap, security: &SecurityConfig) -> Option<AuthUser> {
    if !headers.contains_key("authorization") {
        return None;
    }
    match authenticate(headers, security) {
        Ok(user) => Some(user),
        Err(msg) => {
            tracing::debug!("Ignoring credentials on public route: {}", msg);
            None
        }
    }
}

fn authenticate(headers: &HeaderMap, security: &SecurityConfig) -> Result<AuthUser, String> {
    let token = extract_jwt_from_headers(headers)?;
    let claims = validate_jwt(token, security).map_err(|e| e.to_string())?;
    Ok(AuthUser::from(claims))
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
