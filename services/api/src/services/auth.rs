//! services/api/src/services/auth.rs
//!
//! The session/preferences service. Authentication here is an explicit mock:
//! any well-formed credentials produce a fresh user with default preferences,
//! persisted as the single "current session" record. There is no credential
//! store and no password verification.

use draftdesk_core::domain::{PreferencesPatch, User, UserPreferences};
use draftdesk_core::ports::{KeyValueStore, PortError, PortResult};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Storage key holding the current session's user record.
const SESSION_KEY: &str = "user";

/// Owns the current user identity and content-generation defaults.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Logs a user in. Mock semantics: succeeds for any plausible
    /// credentials and mints a fresh opaque user id.
    pub async fn login(&self, email: &str, password: &str) -> PortResult<User> {
        validate_credentials(email, password)?;
        let user = self.create_session(email).await?;
        info!(user_id = %user.id, "login successful");
        Ok(user)
    }

    /// Registers a new account. With no backing server this has the same
    /// contract as login; no cross-registration uniqueness is enforced.
    pub async fn register(&self, email: &str, password: &str) -> PortResult<User> {
        validate_credentials(email, password)?;
        let user = self.create_session(email).await?;
        info!(user_id = %user.id, "registration successful");
        Ok(user)
    }

    /// Mock password reset: validates the email shape and reports success.
    pub async fn reset_password(&self, email: &str) -> PortResult<()> {
        if !looks_like_email(email) {
            return Err(PortError::Auth("invalid email address".to_string()));
        }
        info!("password reset email sent");
        Ok(())
    }

    /// Clears the current session from durable storage.
    pub async fn logout(&self) -> PortResult<()> {
        self.store.remove(SESSION_KEY).await
    }

    /// Returns the active session's user, if any.
    pub async fn current(&self) -> PortResult<Option<User>> {
        match self.store.get(SESSION_KEY).await? {
            Some(text) => {
                let user = serde_json::from_str(&text)
                    .map_err(|e| PortError::Storage(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Merges the patch over the active session's preferences and persists
    /// the result. A no-op returning `None` when no session is active.
    pub async fn update_preferences(
        &self,
        patch: PreferencesPatch,
    ) -> PortResult<Option<User>> {
        let Some(mut user) = self.current().await? else {
            return Ok(None);
        };

        if let Some(industry) = patch.default_industry {
            user.preferences.default_industry = industry;
        }
        if let Some(tone) = patch.default_tone {
            user.preferences.default_tone = tone;
        }
        if let Some(audience) = patch.default_audience {
            user.preferences.default_audience = audience;
        }

        self.persist(&user).await?;
        Ok(Some(user))
    }

    async fn create_session(&self, email: &str) -> PortResult<User> {
        let user = User {
            id: format!("user-{}", Uuid::new_v4().simple()),
            email: email.to_string(),
            preferences: UserPreferences::default(),
        };
        self.persist(&user).await?;
        Ok(user)
    }

    async fn persist(&self, user: &User) -> PortResult<()> {
        let text =
            serde_json::to_string(user).map_err(|e| PortError::Storage(e.to_string()))?;
        self.store.set(SESSION_KEY, &text).await
    }
}

fn validate_credentials(email: &str, password: &str) -> PortResult<()> {
    if !looks_like_email(email) || password.is_empty() {
        return Err(PortError::Auth("invalid email or password".to_string()));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    let trimmed = email.trim();
    !trimmed.is_empty() && trimmed.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn login_creates_a_session_with_default_preferences() {
        let auth = service();
        let user = auth.login("dana@example.com", "hunter2").await.unwrap();

        assert!(user.id.starts_with("user-"));
        assert_eq!(user.email, "dana@example.com");
        assert_eq!(user.preferences, UserPreferences::default());

        let current = auth.current().await.unwrap().unwrap();
        assert_eq!(current, user);
    }

    #[tokio::test]
    async fn login_rejects_malformed_credentials() {
        let auth = service();
        assert!(matches!(
            auth.login("not-an-email", "pw").await,
            Err(PortError::Auth(_))
        ));
        assert!(matches!(
            auth.login("a@b.com", "").await,
            Err(PortError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let auth = service();
        auth.login("dana@example.com", "pw").await.unwrap();
        auth.logout().await.unwrap();
        assert!(auth.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn preferences_merge_field_wise() {
        let auth = service();
        auth.login("dana@example.com", "pw").await.unwrap();

        let updated = auth
            .update_preferences(PreferencesPatch {
                default_tone: Some("Casual".to_string()),
                ..Default::default()
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.preferences.default_tone, "Casual");
        // Untouched fields keep their values.
        assert_eq!(updated.preferences.default_industry, "Technology");

        let reloaded = auth.current().await.unwrap().unwrap();
        assert_eq!(reloaded.preferences.default_tone, "Casual");
    }

    #[tokio::test]
    async fn preference_update_without_a_session_is_a_noop() {
        let auth = service();
        let result = auth
            .update_preferences(PreferencesPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn each_login_mints_a_fresh_id() {
        let auth = service();
        let first = auth.login("dana@example.com", "pw").await.unwrap();
        let second = auth.login("dana@example.com", "pw").await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
