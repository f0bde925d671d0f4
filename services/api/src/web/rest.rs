//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the draft and generation endpoints and the
//! master definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use draftdesk_core::domain::{AiPrompt, AiResponse, Draft, DraftPatch, User};
use draftdesk_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_drafts_handler,
        create_draft_handler,
        get_draft_handler,
        update_draft_handler,
        delete_draft_handler,
        generate_handler,
        last_response_handler,
        crate::web::auth::login_handler,
        crate::web::auth::register_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::reset_password_handler,
        crate::web::auth::me_handler,
        crate::web::auth::update_preferences_handler,
    ),
    components(
        schemas(
            GenerateRequest,
            crate::web::auth::CredentialsRequest,
            crate::web::auth::ResetPasswordRequest,
            crate::web::auth::AuthResponse,
        )
    ),
    tags(
        (name = "DraftDesk API", description = "API endpoints for social media content drafting.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// The generation request. Empty fields are filled from the current user's
/// preferences before the prompt reaches the generator.
#[derive(Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub industry: String,
    pub tone: String,
    pub audience: String,
}

//=========================================================================================
// Draft Handlers
//=========================================================================================

/// GET /drafts - The current user's drafts, newest first
#[utoipa::path(
    get,
    path = "/drafts",
    responses(
        (status = 200, description = "Draft collection"),
        (status = 401, description = "No active session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_drafts_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Draft>>, (StatusCode, String)> {
    let drafts = state
        .drafts
        .list(&user.id)
        .await
        .map_err(internal_error("Failed to list drafts"))?;
    Ok(Json(drafts))
}

/// POST /drafts - Save a new draft from partial fields
#[utoipa::path(
    post,
    path = "/drafts",
    responses(
        (status = 201, description = "Draft created"),
        (status = 401, description = "No active session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_draft_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(patch): Json<DraftPatch>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let draft = state
        .drafts
        .save(&user.id, patch)
        .await
        .map_err(internal_error("Failed to save draft"))?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// GET /drafts/{id} - Look a draft up by id
#[utoipa::path(
    get,
    path = "/drafts/{id}",
    params(("id" = String, Path, description = "The draft id")),
    responses(
        (status = 200, description = "The draft"),
        (status = 404, description = "No draft with that id"),
        (status = 401, description = "No active session")
    )
)]
pub async fn get_draft_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Draft>, (StatusCode, String)> {
    let draft = state
        .drafts
        .get(&user.id, &id)
        .await
        .map_err(internal_error("Failed to load draft"))?;

    match draft {
        Some(draft) => Ok(Json(draft)),
        None => Err((StatusCode::NOT_FOUND, format!("No draft with id '{}'", id))),
    }
}

/// PUT /drafts/{id} - Merge partial fields over an existing draft
#[utoipa::path(
    put,
    path = "/drafts/{id}",
    params(("id" = String, Path, description = "The draft id")),
    responses(
        (status = 200, description = "The updated draft"),
        (status = 404, description = "No draft with that id"),
        (status = 401, description = "No active session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_draft_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<Draft>, (StatusCode, String)> {
    match state.drafts.update(&user.id, &id, patch).await {
        Ok(draft) => Ok(Json(draft)),
        Err(PortError::NotFound(_)) => {
            Err((StatusCode::NOT_FOUND, format!("No draft with id '{}'", id)))
        }
        Err(e) => {
            error!("Failed to update draft: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update draft".to_string(),
            ))
        }
    }
}

/// DELETE /drafts/{id} - Remove a draft; absent ids are a no-op
#[utoipa::path(
    delete,
    path = "/drafts/{id}",
    params(("id" = String, Path, description = "The draft id")),
    responses(
        (status = 204, description = "Draft removed (or was already absent)"),
        (status = 401, description = "No active session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_draft_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .drafts
        .delete(&user.id, &id)
        .await
        .map_err(internal_error("Failed to delete draft"))?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Generation Handlers
//=========================================================================================

/// POST /generate - Produce post ideas, captions and hashtags for a prompt
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated content"),
        (status = 401, description = "No active session"),
        (status = 502, description = "The generation collaborator failed")
    )
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<AiResponse>, (StatusCode, String)> {
    let prompt = resolve_prompt(req, &user);

    let response = state.generator.generate(&prompt).await.map_err(|e| {
        error!("Content generation failed: {:?}", e);
        (
            StatusCode::BAD_GATEWAY,
            "Unable to generate content. Please try again.".to_string(),
        )
    })?;

    info!(user_id = %user.id, industry = %prompt.industry, "content generated");
    *state.last_response.write().await = Some(response.clone());
    Ok(Json(response))
}

/// GET /generate/last - The most recent generation result, if any
#[utoipa::path(
    get,
    path = "/generate/last",
    responses(
        (status = 200, description = "The last generated response, or null"),
        (status = 401, description = "No active session")
    )
)]
pub async fn last_response_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Option<AiResponse>> {
    Json(state.last_response.read().await.clone())
}

/// Fills empty prompt fields from the user's saved preferences.
fn resolve_prompt(req: GenerateRequest, user: &User) -> AiPrompt {
    let prefs = &user.preferences;
    AiPrompt {
        industry: or_default(req.industry, &prefs.default_industry),
        tone: or_default(req.tone, &prefs.default_tone),
        audience: or_default(req.audience, &prefs.default_audience),
    }
}

fn or_default(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Shorthand for the log-then-500 error mapping used by most handlers.
fn internal_error(message: &'static str) -> impl Fn(PortError) -> (StatusCode, String) {
    move |e| {
        error!("{}: {:?}", message, e);
        (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftdesk_core::domain::UserPreferences;

    #[test]
    fn empty_prompt_fields_fall_back_to_preferences() {
        let user = User {
            id: "user-1".to_string(),
            email: "dana@example.com".to_string(),
            preferences: UserPreferences::default(),
        };
        let prompt = resolve_prompt(
            GenerateRequest {
                industry: "Finance".to_string(),
                tone: String::new(),
                audience: "  ".to_string(),
            },
            &user,
        );
        assert_eq!(prompt.industry, "Finance");
        assert_eq!(prompt.tone, "Professional");
        assert_eq!(prompt.audience, "Tech professionals aged 25-45");
    }
}
