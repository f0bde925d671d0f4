//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use crate::web::state::AppState;

/// Middleware that resolves the session cookie against the persisted session
/// record.
///
/// If valid, inserts the current `User` into request extensions for handlers
/// to use. If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract cookie header
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Parse session ID from cookie
    let session_id = cookie_header
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 3. The session cookie must match the persisted current user
    let user = state
        .auth
        .current()
        .await
        .map_err(|e| {
            error!("Failed to load session: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?
        .filter(|user| user.id == session_id)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 4. Insert the user into request extensions
    req.extensions_mut().insert(user);

    // 5. Continue to the handler
    Ok(next.run(req).await)
}
