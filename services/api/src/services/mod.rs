pub mod auth;
pub mod drafts;

pub use auth::AuthService;
pub use drafts::DraftService;
