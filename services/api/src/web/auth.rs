//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for login, registration, logout, password reset
//! and preference updates. Handlers own no business rules; they translate
//! HTTP to service calls and back.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Duration;
use draftdesk_core::domain::{PreferencesPatch, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: String,
    pub email: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Start a session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .auth
        .login(&req.email, &req.password)
        .await
        .map_err(|e| {
            error!("Login failed: {:?}", e);
            (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
        })?;

    Ok(session_response(StatusCode::OK, user))
}

/// POST /auth/register - Create an account and start a session
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .auth
        .register(&req.email, &req.password)
        .await
        .map_err(|e| {
            error!("Registration failed: {:?}", e);
            (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
        })?;

    Ok(session_response(StatusCode::CREATED, user))
}

/// POST /auth/logout - End the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.auth.logout().await.map_err(|e| {
        error!("Logout failed: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout".to_string())
    })?;

    let cookie = "session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0";
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]))
}

/// POST /auth/reset-password - Mock password reset
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent"),
        (status = 400, description = "Invalid email")
    )
)]
pub async fn reset_password_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.auth.reset_password(&req.email).await.map_err(|e| {
        error!("Password reset failed: {:?}", e);
        (StatusCode::BAD_REQUEST, "Invalid email address".to_string())
    })?;
    Ok(StatusCode::OK)
}

/// GET /me - The current session's user record, preferences included
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "The current user"),
        (status = 401, description = "No active session")
    )
)]
pub async fn me_handler(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

/// PUT /preferences - Merge a partial update over the session's preferences
#[utoipa::path(
    put,
    path = "/preferences",
    responses(
        (status = 200, description = "Updated user record"),
        (status = 401, description = "No active session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_preferences_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<PreferencesPatch>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let updated = state.auth.update_preferences(patch).await.map_err(|e| {
        error!("Failed to update preferences: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update preferences".to_string(),
        )
    })?;

    match updated {
        Some(user) => Ok(Json(user)),
        None => Err((StatusCode::UNAUTHORIZED, "No active session".to_string())),
    }
}

/// Builds the login/register response: session cookie plus user summary.
fn session_response(status: StatusCode, user: User) -> impl IntoResponse {
    let cookie = format!(
        "session={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        user.id,
        Duration::days(30).num_seconds()
    );

    let response = AuthResponse {
        user_id: user.id,
        email: user.email,
    };

    (status, [(header::SET_COOKIE, cookie)], Json(response))
}
