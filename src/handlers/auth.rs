// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::LoginRequest,
    store::user_directory::UserDirectory,
    utils::jwt::sign_jwt,
};

/// Authenticates a user and returns a session token.
///
/// Username, password and role must all match. Any mismatch yields the same
/// generic message so nothing about the failing field is leaked.
pub async fn login(
    State(users): State<UserDirectory>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = users
        .authenticate(&payload.username, &payload.password, &payload.role)
        .await?
        .ok_or(AppError::AuthError(
            "Invalid credentials. Please try again.".to_string(),
        ))?;

    tracing::info!("Login successful: {} as {}", user.username, user.role);

    let token = sign_jwt(
        &user.username,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "username": user.username,
        "role": user.role,
    })))
}

/// Sessions are stateless tokens, so logout is a client-side discard. The
/// endpoint exists so the frontend has one call for both variants.
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "success": true }))
}
