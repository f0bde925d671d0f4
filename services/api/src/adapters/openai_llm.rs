//! services/api/src/adapters/openai_llm.rs
//!
//! This module contains the adapter for OpenAI-backed content generation.
//! It implements the `ContentGenerator` port from the `core` crate by sending
//! an instructional prompt and mining the free-form reply for post ideas,
//! captions and hashtags. Extraction is best-effort: any section that cannot
//! be located is replaced by a fixed fallback, never an error.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use draftdesk_core::domain::{normalize_hashtag, AiPrompt, AiResponse, Captions};
use draftdesk_core::ports::{ContentGenerator, PortError, PortResult};
use regex::Regex;

const SYSTEM_INSTRUCTIONS: &str = "You are a social media content assistant. \
Respond in plain text with three labelled sections: \"Post ideas\" (a numbered \
list), \"Captions\" (one per platform, prefixed with the platform name and a \
colon), and \"Hashtags\" (a comma or newline separated list).";

const FALLBACK_POST_IDEAS: [&str; 5] = [
    "Industry trends and insights",
    "Behind-the-scenes look at our processes",
    "Customer success story spotlight",
    "Tips and best practices for professionals",
    "Upcoming events and announcements",
];

const DEFAULT_LINKEDIN_CAPTION: &str =
    "We're excited to share our latest insights on industry trends. #ProfessionalDevelopment";
const DEFAULT_FACEBOOK_CAPTION: &str =
    "Check out our newest update! We'd love to hear your thoughts. 💬";
const DEFAULT_TWITTER_CAPTION: &str =
    "New post alert! Click the link to learn more about how we're innovating in our industry.";

const FALLBACK_HASHTAGS: [&str; 5] = [
    "#IndustryInsights",
    "#ProfessionalTips",
    "#BestPractices",
    "#Innovation",
    "#BusinessGrowth",
];

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentGenerator` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiContentAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiContentAdapter {
    /// Creates a new `OpenAiContentAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Embeds the three prompt fields into the fixed instructional template.
    fn build_user_prompt(prompt: &AiPrompt) -> String {
        let audience = if prompt.audience.trim().is_empty() {
            "general audience"
        } else {
            prompt.audience.as_str()
        };
        format!(
            "Generate social media content for the {industry} industry.\n\
             Use a {tone} tone of voice.\n\
             Target audience: {audience}.\n\n\
             Please provide:\n\
             1. Five post ideas related to {industry} with a {tone_lower} approach\n\
             2. Three social media captions (for LinkedIn, Facebook, and Twitter)\n\
             3. Five relevant hashtags for {industry} and {tone} content",
            industry = prompt.industry,
            tone = prompt.tone,
            tone_lower = prompt.tone.to_lowercase(),
            audience = audience,
        )
    }
}

#[async_trait]
impl ContentGenerator for OpenAiContentAdapter {
    async fn generate(&self, prompt: &AiPrompt) -> PortResult<AiResponse> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_INSTRUCTIONS)
                    .build()
                    .map_err(|e| PortError::Generation(e.to_string()))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(Self::build_user_prompt(prompt))
                    .build()
                    .map_err(|e| PortError::Generation(e.to_string()))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(750u32)
            .temperature(0.7)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PortError::Generation(e.to_string()))?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| PortError::Generation("completion returned no content".to_string()))?;

        Ok(parse_response(text.trim()))
    }
}

//=========================================================================================
// Best-Effort Response Mining
//=========================================================================================

/// Extracts a structured response from unstructured generated text. Never
/// fails: each section falls back to a fixed default on an extraction miss.
pub fn parse_response(text: &str) -> AiResponse {
    AiResponse {
        post_ideas: extract_post_ideas(text),
        captions: extract_captions(text),
        hashtags: extract_hashtags(text),
    }
}

/// Returns the byte range of `marker` within `text`, case-insensitively,
/// searching from `from`. ASCII lowercasing keeps byte offsets stable.
fn find_marker(text: &str, marker: &str, from: usize) -> Option<usize> {
    text[from..]
        .to_ascii_lowercase()
        .find(marker)
        .map(|pos| from + pos)
}

/// Slices the text between the end of `marker` and the earliest of `stops`
/// (or the end of the text).
fn section_after(text: &str, marker: &str, stops: &[&str]) -> Option<String> {
    let start = find_marker(text, marker, 0)? + marker.len();
    let end = stops
        .iter()
        .filter_map(|stop| find_marker(text, stop, start))
        .min()
        .unwrap_or(text.len());
    Some(text[start..end].to_string())
}

fn extract_post_ideas(text: &str) -> Vec<String> {
    let numbered = Regex::new(r"\d+\.").unwrap();

    let ideas: Vec<String> = section_after(text, "post ideas", &["captions", "hashtags"])
        .map(|section| {
            numbered
                .split(&section)
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| line.trim_start_matches(':').trim().to_string())
                .filter(|line| !line.is_empty())
                .take(5)
                .collect()
        })
        .unwrap_or_default();

    if ideas.is_empty() {
        return FALLBACK_POST_IDEAS.iter().map(|s| s.to_string()).collect();
    }
    ideas
}

fn extract_captions(text: &str) -> Captions {
    Captions {
        linkedin: Some(extract_caption(
            text,
            "linkedin",
            &["facebook", "twitter", "hashtags"],
            DEFAULT_LINKEDIN_CAPTION,
        )),
        facebook: Some(extract_caption(
            text,
            "facebook",
            &["linkedin", "twitter", "hashtags"],
            DEFAULT_FACEBOOK_CAPTION,
        )),
        twitter: Some(extract_caption(
            text,
            "twitter",
            &["linkedin", "facebook", "hashtags"],
            DEFAULT_TWITTER_CAPTION,
        )),
        instagram: None,
    }
}

/// Captures the text between "<platform> ... :" and the next platform or
/// section marker; the fixed default covers any miss.
fn extract_caption(text: &str, platform: &str, stops: &[&str], default: &str) -> String {
    let captured = find_marker(text, platform, 0)
        .and_then(|pos| text[pos..].find(':').map(|colon| pos + colon + 1))
        .map(|start| {
            let end = stops
                .iter()
                .filter_map(|stop| find_marker(text, stop, start))
                .min()
                .unwrap_or(text.len());
            text[start..end].trim().to_string()
        })
        .unwrap_or_default();

    if captured.is_empty() {
        default.to_string()
    } else {
        captured
    }
}

fn extract_hashtags(text: &str) -> Vec<String> {
    let tags: Vec<String> = section_after(text, "hashtags", &[])
        .map(|section| {
            section
                .split(['\n', ','])
                .map(|tag| tag.trim().trim_start_matches(':').trim())
                .filter(|tag| !tag.is_empty())
                .map(|tag| {
                    if tag.starts_with('#') {
                        tag.to_string()
                    } else {
                        normalize_hashtag(tag)
                    }
                })
                .take(5)
                .collect()
        })
        .unwrap_or_default();

    if tags.is_empty() {
        return FALLBACK_HASHTAGS.iter().map(|s| s.to_string()).collect();
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPLY: &str = "\
Post Ideas:
1. How Technology is reshaping remote work
2. The rise of edge computing
3. Developer productivity myths
4. Open source sustainability
5. AI pair programming in practice

Captions:
LinkedIn: Technology never sleeps, and neither does our roadmap.
Facebook: Big things are coming for our developer community!
Twitter: Shipping faster than ever. Here's how.

Hashtags: #Technology, #DevLife, cloud computing, #OpenSource, #Innovation";

    #[test]
    fn extracts_all_sections_from_well_formed_text() {
        let response = parse_response(SAMPLE_REPLY);

        assert_eq!(response.post_ideas.len(), 5);
        assert_eq!(
            response.post_ideas[0],
            "How Technology is reshaping remote work"
        );
        assert_eq!(
            response.captions.linkedin.as_deref(),
            Some("Technology never sleeps, and neither does our roadmap.")
        );
        assert_eq!(
            response.captions.facebook.as_deref(),
            Some("Big things are coming for our developer community!")
        );
        assert_eq!(response.hashtags.len(), 5);
    }

    #[test]
    fn bare_hashtag_entries_are_normalized() {
        let response = parse_response(SAMPLE_REPLY);
        assert!(response.hashtags.contains(&"#cloudcomputing".to_string()));
        assert!(response.hashtags.iter().all(|t| t.starts_with('#')));
    }

    #[test]
    fn unrecognizable_text_yields_the_fixed_fallbacks() {
        let response = parse_response("no recognizable sections");

        assert_eq!(response.post_ideas.len(), 5);
        assert_eq!(response.post_ideas[0], "Industry trends and insights");
        assert_eq!(
            response.captions.linkedin.as_deref(),
            Some(DEFAULT_LINKEDIN_CAPTION)
        );
        assert_eq!(
            response.captions.facebook.as_deref(),
            Some(DEFAULT_FACEBOOK_CAPTION)
        );
        assert_eq!(
            response.captions.twitter.as_deref(),
            Some(DEFAULT_TWITTER_CAPTION)
        );
        assert_eq!(response.hashtags.len(), 5);
        assert_eq!(response.hashtags[0], "#IndustryInsights");
    }

    #[test]
    fn section_markers_match_case_insensitively() {
        let response = parse_response(
            "POST IDEAS: 1. One idea\nHASHTAGS: #Only",
        );
        assert_eq!(response.post_ideas, vec!["One idea".to_string()]);
        assert_eq!(response.hashtags, vec!["#Only".to_string()]);
    }

    #[test]
    fn missing_caption_platform_falls_back_individually() {
        let text = "Captions:\nLinkedIn: A real caption.\nHashtags: #A";
        let response = parse_response(text);
        assert_eq!(response.captions.linkedin.as_deref(), Some("A real caption."));
        assert_eq!(
            response.captions.twitter.as_deref(),
            Some(DEFAULT_TWITTER_CAPTION)
        );
    }

    #[test]
    fn ideas_are_capped_at_five() {
        let text = "Post ideas: 1. a 2. b 3. c 4. d 5. e 6. f 7. g";
        let response = parse_response(text);
        assert_eq!(response.post_ideas.len(), 5);
        assert_eq!(response.post_ideas[4], "e");
    }

    #[test]
    fn prompt_template_embeds_all_three_fields() {
        let prompt = AiPrompt {
            industry: "Finance".to_string(),
            tone: "Casual".to_string(),
            audience: String::new(),
        };
        let rendered = OpenAiContentAdapter::build_user_prompt(&prompt);
        assert!(rendered.contains("Finance industry"));
        assert!(rendered.contains("casual approach"));
        assert!(rendered.contains("general audience"));
    }
}
