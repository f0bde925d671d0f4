//! crates/draftdesk_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the
//! durable store or a remote generation API.

use async_trait::async_trait;

use crate::domain::{AiPrompt, AiResponse};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external collaborators
/// (filesystem, network) behind the handful of kinds the UI layer renders.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Content generation failed: {0}")]
    Generation(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable key-value persistence. Values are UTF-8 text encodings of the
/// domain structures; an absent key is a valid "empty" state, never an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// Produces a structured response for a structured prompt. Implemented by
/// both the deterministic template engine and the OpenAI-backed adapter, so
/// callers cannot tell which path served them.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &AiPrompt) -> PortResult<AiResponse>;
}
