//! services/api/src/adapters/template_llm.rs
//!
//! The built-in content generator: deterministic string templating over the
//! three prompt fields. This is the default implementation of the
//! `ContentGenerator` port, used whenever no OpenAI API key is configured.

use async_trait::async_trait;
use draftdesk_core::domain::{AiPrompt, AiResponse, Captions};
use draftdesk_core::ports::{ContentGenerator, PortResult};

/// A generator that fills fixed natural-language templates from the prompt.
/// Pure and infallible: empty prompt fields degrade to empty substitutions.
#[derive(Clone, Default)]
pub struct TemplateContentAdapter;

impl TemplateContentAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentGenerator for TemplateContentAdapter {
    async fn generate(&self, prompt: &AiPrompt) -> PortResult<AiResponse> {
        Ok(render(prompt))
    }
}

/// Builds exactly 5 post ideas, 3 platform captions and 5 hashtags from the
/// prompt fields.
fn render(prompt: &AiPrompt) -> AiResponse {
    let industry = prompt.industry.as_str();
    let tone = prompt.tone.to_lowercase();
    let audience = prompt.audience.trim();

    // The third idea uses only the first word of the audience description.
    let audience_word = audience.split_whitespace().next().unwrap_or("your");
    let audience_phrase = if audience.is_empty() {
        "our audience"
    } else {
        audience
    };

    let post_ideas = vec![
        format!("How {industry} is transforming with the latest {tone} approaches"),
        format!("5 ways {industry} professionals can leverage {tone} communication"),
        format!(
            "The future of {industry}: Connecting with {audience_word} audience through {tone} content"
        ),
        format!("Behind the scenes: How our {industry} team creates {tone} content that resonates"),
        format!("Case study: How a {tone} approach in {industry} increased engagement by 45%"),
    ];

    let industry_tag = strip_whitespace(industry);
    let tone_tag = strip_whitespace(&prompt.tone);

    let captions = Captions {
        linkedin: Some(format!(
            "{industry} isn't standing still—it's evolving rapidly. Here's how our team has \
             transformed our workflow with {tone} messaging that {audience_phrase} truly values. \
             #{industry_tag}Trends #SocialMediaStrategy"
        )),
        facebook: Some(format!(
            "Working smarter in {industry}! 💪 Our team has been using {tone} messaging to \
             connect with {audience_phrase}, and we've seen some incredible results! Have you \
             tried this approach? #{industry_tag}Tips"
        )),
        twitter: Some(format!(
            "{industry} + {tone} content = engagement magic ✨ We've boosted our connection \
             with {audience_phrase}. Here's our approach:"
        )),
        instagram: None,
    };

    let hashtags = vec![
        format!("#{industry_tag}"),
        format!("#{tone_tag}Content"),
        "#SocialMediaTips".to_string(),
        format!("#{industry_tag}Marketing"),
        "#ContentStrategy".to_string(),
    ];

    AiResponse {
        post_ideas,
        captions,
        hashtags,
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
