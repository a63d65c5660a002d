//! Client for the remote generative-language API.
//!
//! Everything the app "knows" about grammar comes through
//! [`GenerationService`]. The production implementation talks to the Gemini
//! `generateContent` REST endpoint and asks for JSON shaped by a response
//! schema; tests substitute their own implementation.

use crate::config::GeminiConfig;
use crate::errors::GenerationError;
use crate::theme::DailyTheme;
use crate::theory::TenseDetail;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

/// One mistake as reported by the remote analysis, before it gets an id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorAnnotation {
    pub original_text: String,
    pub corrected_text: String,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A generated exercise, before it gets an id and category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeDraft {
    pub title: String,
    pub story_with_blanks: String,
    pub solution: Vec<String>,
    pub level: String,
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Vec<ErrorAnnotation>, GenerationError>;

    async fn generate_challenges(&self, theme: &DailyTheme) -> Result<Vec<ChallengeDraft>, GenerationError>;

    async fn generate_prompt(&self, theme: &DailyTheme) -> Result<String, GenerationError>;

    async fn generate_examples(&self, tense: &TenseDetail) -> Result<Vec<String>, GenerationError>;
}

pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("grammar-story/0.1")
            .build()
            .unwrap_or_default();
        Self { config, http }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Sends one prompt and returns the concatenated text of the first candidate.
    async fn generate_text(&self, prompt: &str, schema: Option<Value>) -> Result<String, GenerationError> {
        let api_key = self.config.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        debug!(model = %self.config.model, "sending generateContent request");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        payload.text()
    }

    async fn generate_json<T: DeserializeOwned>(&self, prompt: &str, schema: Value) -> Result<T, GenerationError> {
        let text = self.generate_text(prompt, Some(schema)).await?;
        serde_json::from_str(&text).map_err(|err| GenerationError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn analyze(&self, text: &str) -> Result<Vec<ErrorAnnotation>, GenerationError> {
        let prompt = format!(
            "Analyze the following text for grammar, spelling, and style errors. \
             Please identify each error and provide a correction and a brief, simple explanation.\n\n\
             Text to analyze: \"{text}\""
        );
        let schema = object_schema(
            "errors",
            json!({
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "originalText": {
                            "type": "STRING",
                            "description": "The original phrase or word with the error."
                        },
                        "correctedText": {
                            "type": "STRING",
                            "description": "The corrected version of the phrase or word."
                        },
                        "explanation": {
                            "type": "STRING",
                            "description": "A simple, one-sentence explanation of the error."
                        },
                        "type": {
                            "type": "STRING",
                            "description": "The category of the error (e.g., Tense, Preposition, Spelling, Punctuation)."
                        }
                    }
                }
            }),
        );
        let payload: AnalysisPayload = self.generate_json(&prompt, schema).await?;
        Ok(payload.errors)
    }

    async fn generate_challenges(&self, theme: &DailyTheme) -> Result<Vec<ChallengeDraft>, GenerationError> {
        let prompt = format!(
            "Generate a list of 30 'fill-in-the-blank' grammar challenges about '{}'. \
             Provide a mix of 'Easy', 'Medium', and 'Hard' difficulties. For each challenge, provide a title, \
             the story with '___' for blanks, a JSON array of the correct answers, and the difficulty level. \
             The number of blanks must match the number of answers.",
            theme.title
        );
        let schema = object_schema(
            "challenges",
            json!({
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "storyWithBlanks": { "type": "STRING" },
                        "solution": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "level": { "type": "STRING" }
                    }
                }
            }),
        );
        let payload: ChallengesPayload = self.generate_json(&prompt, schema).await?;
        Ok(payload.challenges)
    }

    async fn generate_prompt(&self, theme: &DailyTheme) -> Result<String, GenerationError> {
        let prompt = format!(
            "Create a short, simple, and creative story prompt for a user to practice the grammar rule: '{}'. \
             The prompt should be one or two sentences long and easy for anyone to understand. \
             For example, if the theme is 'Simple Past', a good prompt would be 'Imagine you found a \
             mysterious old map yesterday. Write a short story about where it led you.'",
            theme.title
        );
        let text = self.generate_text(&prompt, None).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text.to_string())
    }

    async fn generate_examples(&self, tense: &TenseDetail) -> Result<Vec<String>, GenerationError> {
        let prompt = format!(
            "Generate exactly 3 diverse and simple example sentences for the English tense: '{}'. \
             The tense is defined as: '{}'. The examples must be easy for a beginner to understand.",
            tense.name, tense.definition
        );
        let schema = object_schema("examples", json!({ "type": "ARRAY", "items": { "type": "STRING" } }));
        let payload: ExamplesPayload = self.generate_json(&prompt, schema).await?;
        if payload.examples.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(payload.examples)
    }
}

fn object_schema(field: &str, items: Value) -> Value {
    json!({
        "type": "OBJECT",
        "properties": { field: items }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(self) -> Result<String, GenerationError> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or(GenerationError::Empty)?;
        let text: String = content.parts.into_iter().filter_map(|part| part.text).collect();
        if text.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalysisPayload {
    errors: Vec<ErrorAnnotation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChallengesPayload {
    challenges: Vec<ChallengeDraft>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExamplesPayload {
    examples: Vec<String>,
}
