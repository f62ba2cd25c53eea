use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lingo_core::{Language, QuizItem, QuizKind};

use crate::error::ContentError;

use super::ContentProvider;

#[derive(Clone, Debug)]
pub struct GenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GenAiConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LINGO_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("LINGO_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("LINGO_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Generative lesson provider speaking the chat-completions wire shape.
///
/// Without an API key the provider is disabled and every fetch returns
/// `ContentError::Disabled`; the content service above turns that into the
/// fallback lesson.
#[derive(Clone)]
pub struct GenAiProvider {
    client: Client,
    config: Option<GenAiConfig>,
}

impl GenAiProvider {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GenAiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GenAiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl ContentProvider for GenAiProvider {
    async fn fetch_lesson(
        &self,
        topic: &str,
        target: Language,
        native: Language,
    ) -> Result<Vec<QuizItem>, ContentError> {
        let config = self.config.as_ref().ok_or(ContentError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: lesson_prompt(topic, target, native),
            }],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ContentError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ContentError::EmptyResponse)?;

        let items = parse_lesson(&content)?;
        debug!(topic, count = items.len(), "generated lesson items");
        Ok(items)
    }
}

fn lesson_prompt(topic: &str, target: Language, native: Language) -> String {
    format!(
        "Create a language lesson for a beginner learning {target} from {native}.\n\
         Topic: {topic}.\n\
         Generate 5 varied questions.\n\
         Ensure the difficulty is appropriate for a beginner app.\n\
         Respond with only a JSON array; each element has the fields\n\
         id, type (one of translate_to_target, translate_to_native,\n\
         multiple_choice, listening), prompt, correctAnswer, and optionally\n\
         options (multiple_choice only: 3 incorrect and 1 correct answer)\n\
         and audioText (listening only: text to be spoken).\n\
         For translate_to_target, the prompt is in {native}, answer in {target}.\n\
         For translate_to_native, the prompt is in {target}, answer in {native}.",
        target = target.name(),
        native = native.name(),
        topic = topic,
    )
}

/// Turn a provider response body into validated quiz items.
///
/// Models often wrap JSON in markdown fences; strip them before parsing.
fn parse_lesson(content: &str) -> Result<Vec<QuizItem>, ContentError> {
    let raw = strip_code_fence(content);
    let dtos: Vec<QuizItemDto> = serde_json::from_str(raw)?;

    let mut items = Vec::with_capacity(dtos.len());
    for dto in dtos {
        items.push(QuizItem::from_parts(
            dto.id,
            dto.kind,
            dto.prompt,
            dto.correct_answer,
            dto.options,
            dto.audio_text,
        )?);
    }
    Ok(items)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

//
// ─── WIRE TYPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Item shape as emitted by the provider; field names match the original
/// generation schema.
#[derive(Debug, Deserialize)]
struct QuizItemDto {
    id: String,
    #[serde(rename = "type")]
    kind: QuizKind,
    prompt: String,
    #[serde(rename = "correctAnswer")]
    correct_answer: String,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default, rename = "audioText")]
    audio_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_items() {
        let body = r#"[
            {"id":"1","type":"multiple_choice","prompt":"Pick one",
             "correctAnswer":"Bonjour","options":["Bonjour","Merci"]},
            {"id":"2","type":"listening","prompt":"Type what you hear",
             "correctAnswer":"Merci","audioText":"Merci"}
        ]"#;

        let items = parse_lesson(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind(), QuizKind::MultipleChoice);
        assert_eq!(items[1].audio_text(), Some("Merci"));
    }

    #[test]
    fn parses_fenced_payload() {
        let body = "```json\n[{\"id\":\"1\",\"type\":\"translate_to_target\",\
                    \"prompt\":\"The cat\",\"correctAnswer\":\"Le chat\"}]\n```";
        let items = parse_lesson(body).unwrap();
        assert_eq!(items[0].correct_answer(), "Le chat");
    }

    #[test]
    fn rejects_items_with_wrong_shape() {
        // listening without audioText
        let body = r#"[{"id":"1","type":"listening","prompt":"p","correctAnswer":"a"}]"#;
        assert!(matches!(
            parse_lesson(body),
            Err(ContentError::InvalidItem(_))
        ));
    }

    #[test]
    fn rejects_non_json_payload() {
        assert!(matches!(
            parse_lesson("sorry, I cannot do that"),
            Err(ContentError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn disabled_provider_reports_typed_error() {
        let provider = GenAiProvider::new(None);
        assert!(!provider.enabled());
        let err = provider
            .fetch_lesson("Greetings", Language::Fr, Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Disabled));
    }

    #[test]
    fn prompt_names_both_languages_and_topic() {
        let prompt = lesson_prompt("Food", Language::Fr, Language::En);
        assert!(prompt.contains("French"));
        assert!(prompt.contains("English"));
        assert!(prompt.contains("Food"));
    }
}
