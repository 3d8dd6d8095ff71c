// handlers/public/auth/login.rs - POST /api/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
}

/// POST /api/login - Authenticate and receive a JWT
///
/// Expected Input:
/// ```json
/// { "email": "string", "password": "string" }
/// ```
///
/// Expected Output:
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "expires_in": 3600 }
/// ```
///
/// Unknown email and wrong password both answer 401 with the same message.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) = payload?;

    let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password required"));
    }

    let Some(user) = state.users().select_by_email(email).await? else {
        tracing::warn!("Login failed: unknown email");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(password, user.hashed_password.clone()).await? {
        tracing::warn!("Login failed: bad password for user {}", user.id);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let security = &state.config.security;
    let token = generate_jwt(&Claims::new(user.id, user.email, security), security)?;

    tracing::info!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        token,
        expires_in: security.jwt_expiry_seconds,
    }))
}
