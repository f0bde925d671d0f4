//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FileStore, OpenAiContentAdapter, TemplateContentAdapter},
    config::Config,
    error::ApiError,
    services::{AuthService, DraftService},
    web::{
        auth::{
            login_handler, logout_handler, me_handler, register_handler,
            reset_password_handler, update_preferences_handler,
        },
        create_draft_handler, delete_draft_handler, generate_handler, get_draft_handler,
        last_response_handler, list_drafts_handler, require_auth, update_draft_handler,
        rest::ApiDoc, state::AppState,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use draftdesk_core::ports::ContentGenerator;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Durable Storage ---
    let store = Arc::new(FileStore::new(&config.data_dir));
    store.init().await?;
    info!("Storage initialized at {}", config.data_dir.display());

    // --- 3. Select the Content Generator ---
    // With an API key the OpenAI collaborator serves generation; without one
    // the template engine does, behind the same trait.
    let generator: Arc<dyn ContentGenerator> = match &config.openai_api_key {
        Some(api_key) => {
            info!("Using OpenAI content generation (model: {})", config.content_model);
            let openai_config = OpenAIConfig::new().with_api_key(api_key);
            Arc::new(OpenAiContentAdapter::new(
                Client::with_config(openai_config),
                config.content_model.clone(),
            ))
        }
        None => {
            info!("No OpenAI API key configured; using the template engine");
            Arc::new(TemplateContentAdapter::new())
        }
    };

    // --- 4. Build the Shared AppState ---
    let auth = AuthService::new(store.clone());
    let drafts = DraftService::new(store);
    let app_state = Arc::new(AppState::new(auth, drafts, generator, config.clone()));

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/reset-password", post(reset_password_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/me", get(me_handler))
        .route("/preferences", put(update_preferences_handler))
        .route("/drafts", get(list_drafts_handler).post(create_draft_handler))
        .route(
            "/drafts/{id}",
            get(get_draft_handler)
                .put(update_draft_handler)
                .delete(delete_draft_handler),
        )
        .route("/generate", post(generate_handler))
        .route("/generate/last", get(last_response_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
