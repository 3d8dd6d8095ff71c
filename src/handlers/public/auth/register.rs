// handlers/public/auth/register.rs - POST /api/register handler

use std::collections::HashMap;

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::auth::{hash_password, MIN_PASSWORD_LENGTH};
use crate::database::models::PublicUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// POST /api/register - Create a new account
///
/// Expected Input:
/// ```json
/// { "email": "string", "password": "string", "name": "string (optional)" }
/// ```
///
/// Returns 201 with the public user record. 400 on invalid input, 409 when
/// the email is already registered.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    let Json(payload) = payload?;
    let (email, password) = validate(&payload)?;
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let hashed = hash_password(password.to_string(), state.config.security.bcrypt_cost).await?;
    let user = state.users().insert(email, name, &hashed).await?;

    tracing::info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

fn validate(payload: &RegisterRequest) -> Result<(&str, &str), ApiError> {
    let mut field_errors = HashMap::new();

    let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() {
        field_errors.insert("email".to_string(), "This field is required".to_string());
    } else if !email.contains('@') {
        field_errors.insert("email".to_string(), "Must be a valid email address".to_string());
    }

    let password = payload.password.as_deref().unwrap_or_default();
    if password.is_empty() {
        field_errors.insert("password".to_string(), "This field is required".to_string());
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("Must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Invalid registration", Some(field_errors)));
    }
    Ok((email, password))
}
