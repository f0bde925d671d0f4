//! crates/draftdesk_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage backend; they carry serde
//! derives because the durable store holds them as UTF-8 JSON text, in
//! camelCase to stay compatible with collections written by the original
//! browser client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The currently authenticated user. One exists per session; the id is an
/// opaque token generated at login and never reused across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub preferences: UserPreferences,
}

/// Content-generation defaults, embedded in and owned by `User`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub default_industry: String,
    pub default_tone: String,
    pub default_audience: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_industry: "Technology".to_string(),
            default_tone: "Professional".to_string(),
            default_audience: "Tech professionals aged 25-45".to_string(),
        }
    }
}

/// A partial update to `UserPreferences`; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub default_industry: Option<String>,
    pub default_tone: Option<String>,
    pub default_audience: Option<String>,
}

/// The structured input driving one content-generation request. Ephemeral;
/// only persisted when a draft records the prompt that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiPrompt {
    pub industry: String,
    pub tone: String,
    pub audience: String,
}

/// Per-platform captions. The built-in generators fill linkedin, facebook
/// and twitter; instagram is a legal key left empty by both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// The structured output of one generation request. Held as a "last
/// generated response" singleton, overwritten by each new request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    pub post_ideas: Vec<String>,
    pub captions: Captions,
    pub hashtags: Vec<String>,
}

/// A saved, user-owned unit of generated social content. `id` is assigned at
/// creation and immutable; `updated_at` is refreshed on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<AiPrompt>,
}

/// Partial draft fields, the input to both save and update. On save, absent
/// fields take defaults; on update, absent fields keep the stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub ai_prompt: Option<AiPrompt>,
}

/// Normalizes a hashtag: internal whitespace is stripped and a single
/// leading `#` is guaranteed.
pub fn normalize_hashtag(tag: &str) -> String {
    let stripped: String = tag.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(rest) = stripped.strip_prefix('#') {
        format!("#{}", rest)
    } else {
        format!("#{}", stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_prefix_and_strips_whitespace() {
        assert_eq!(normalize_hashtag("Social Media"), "#SocialMedia");
        assert_eq!(normalize_hashtag("#AlreadyTagged"), "#AlreadyTagged");
        assert_eq!(normalize_hashtag("# spaced tag "), "#spacedtag");
    }

    #[test]
    fn draft_serializes_in_camel_case() {
        let draft = Draft {
            id: "draft-1".to_string(),
            title: "Untitled Draft".to_string(),
            caption: String::new(),
            hashtags: vec!["#Tech".to_string()],
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ai_prompt: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        // Absent optional fields are omitted entirely.
        assert!(!json.contains("imageUrl"));
        assert!(!json.contains("aiPrompt"));
    }

    #[test]
    fn preferences_default_matches_signup_defaults() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.default_industry, "Technology");
        assert_eq!(prefs.default_tone, "Professional");
    }
}
