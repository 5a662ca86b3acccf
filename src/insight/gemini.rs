// Gemini `generateContent` client.
// Wire types and response decoding live here; the HTTP hop is behind `HttpTransport`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_prompt, InsightSource};
use crate::error::InsightError;
use crate::types::{InsightRequest, InsightSettings};

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A way to POST a JSON body.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: String,
    ) -> Result<HttpResponse, InsightError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Insight source backed by the Gemini REST API.
pub struct GeminiClient<T> {
    transport: T,
    settings: InsightSettings,
}

impl<T: HttpTransport> GeminiClient<T> {
    pub fn new(transport: T, settings: InsightSettings) -> Self {
        GeminiClient {
            transport,
            settings,
        }
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn request_body(&self, prompt: &str) -> Result<String, InsightError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &self.settings.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
            },
        };
        Ok(serde_json::to_string(&body)?)
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> InsightSource for GeminiClient<T> {
    async fn fetch(&self, request: &InsightRequest) -> Result<String, InsightError> {
        let api_key = match self.settings.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(InsightError::MissingApiKey),
        };

        let prompt = build_prompt(request);
        let body = self.request_body(&prompt)?;
        let url = self.url();
        debug!(%url, model = %self.settings.model, "requesting insight");

        let response = self
            .transport
            .post_json(
                &url,
                &[
                    ("Content-Type", "application/json"),
                    ("x-goog-api-key", api_key),
                ],
                body,
            )
            .await?;

        if !response.is_success() {
            return Err(InsightError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        let decoded: GenerateContentResponse = serde_json::from_str(&response.body)?;
        Ok(decoded.text())
    }
}
