//! services/api/src/web/state.rs
//!
//! Defines the application's shared state, created once at startup and
//! injected into every handler. This replaces any ambient global lookup:
//! whatever a handler needs, it gets from here.

use crate::config::Config;
use crate::services::{AuthService, DraftService};
use draftdesk_core::domain::AiResponse;
use draftdesk_core::ports::ContentGenerator;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The shared application state.
pub struct AppState {
    pub auth: AuthService,
    pub drafts: DraftService,
    /// Either the template engine or the OpenAI adapter; callers cannot tell
    /// which one is behind the trait.
    pub generator: Arc<dyn ContentGenerator>,
    pub config: Arc<Config>,
    /// The most recent generation result. Overwritten by each new request,
    /// never persisted.
    pub last_response: RwLock<Option<AiResponse>>,
}

impl AppState {
    pub fn new(
        auth: AuthService,
        drafts: DraftService,
        generator: Arc<dyn ContentGenerator>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            auth,
            drafts,
            generator,
            config,
            last_response: RwLock::new(None),
        }
    }
}
