pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

pub use middleware::require_auth;
pub use rest::{
    create_draft_handler, delete_draft_handler, generate_handler, get_draft_handler,
    last_response_handler, list_drafts_handler, update_draft_handler,
};
