//! Generator trait and prompt shaping.

use async_trait::async_trait;

use replymesh_protocols::Tone;
use replymesh_protocols::error::ProviderError;

/// One generation call: sanitized source text plus the knobs that shape
/// the reply.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub text: String,
    pub tone: Tone,
    pub max_length: u32,
    pub author_name: Option<String>,
    pub post_date: Option<String>,
}

/// A generative-text backend.
///
/// The credential is passed per call, not held by the client — preferences
/// are reloaded on every request and the key may have changed since the
/// last one.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        credential: &str,
        request: &GenerateRequest,
    ) -> Result<String, ProviderError>;
}

fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "Write in a professional, credible voice.",
        Tone::Polite => "Write in a courteous, respectful voice.",
        Tone::Friendly => "Write in a warm, approachable voice.",
        Tone::Concise => "Keep it brief and to the point.",
    }
}

/// Compose the provider prompt for a reply request.
pub fn build_prompt(request: &GenerateRequest) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are replying to a social feed post. Write a single reply comment. ",
    );
    prompt.push_str(tone_instruction(request.tone));
    prompt.push_str(&format!(
        " Keep the reply under {} characters. Do not add hashtags or sign-offs.\n\n",
        request.max_length
    ));

    if let Some(author) = request.author_name.as_deref() {
        prompt.push_str(&format!("Post author: {}\n", author));
    }
    if let Some(date) = request.post_date.as_deref() {
        prompt.push_str(&format!("Posted: {}\n", date));
    }
    prompt.push_str(&format!("Post:\n{}", request.text));
    prompt
}
