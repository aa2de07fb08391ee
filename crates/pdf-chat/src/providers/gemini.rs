//! Gemini client for embeddings and answer generation
//!
//! Talks to the Generative Language API with an API key. One client serves
//! both the embedding and the LLM provider traits.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Maximum texts per `batchEmbedContents` request
const MAX_EMBED_BATCH: usize = 100;

/// Upper bound on the wait between retries
const MAX_BACKOFF_SECS: u64 = 60;

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    embed_model: String,
    generate_model: String,
    temperature: f32,
    max_retries: u32,
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    #[serde(rename = "taskType")]
    task_type: TaskType,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> Result<String> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let candidate = self.candidates.into_iter().next().ok_or_else(|| match block_reason {
            Some(reason) => Error::Llm(format!("Prompt blocked by Gemini: {}", reason)),
            None => Error::Llm("No candidates in Gemini response".to_string()),
        })?;

        let finish_reason = candidate.finish_reason;
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Llm(format!(
                "No text in Gemini response (finish reason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embed_model: qualified_model(&config.embed_model),
            generate_model: qualified_model(&config.generate_model),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Endpoint URL for a model method, e.g. `models/gemini-pro:generateContent`
    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/{}:{}", self.base_url, model, method)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "No Gemini API key configured; set {}",
                crate::config::API_KEY_ENV
            ))
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < self.max_retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}, retrying in {:?}",
                        attempt + 1,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// POST a JSON body and decode the JSON reply, mapping failures with `wrap`
    async fn post_json<B, R>(&self, url: &str, body: &B, wrap: fn(String) -> Error) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let key = self.api_key()?;

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await
            .map_err(|e| wrap(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(wrap(format!("Gemini request failed ({}): {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| wrap(format!("Failed to parse Gemini response: {}", e)))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = self.endpoint(&self.embed_model, "batchEmbedContents");
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: &self.embed_model,
                    content: Content {
                        role: None,
                        parts: vec![Part { text }],
                    },
                    task_type: TaskType::RetrievalDocument,
                })
                .collect(),
        };

        let response: BatchEmbedResponse = self
            .retry_request(|| self.post_json(&url, &request, Error::Embedding))
            .await?;

        if response.embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Gemini returned {} embeddings for {} texts",
                response.embeddings.len(),
                texts.len()
            )));
        }

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

/// 1s, 2s, 4s, ... capped at [`MAX_BACKOFF_SECS`]
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt).min(MAX_BACKOFF_SECS))
}

/// Prefix bare model names with `models/`
fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_EMBED_BATCH) {
            tracing::debug!("Embedding batch of {} chunks", batch.len());
            all.extend(self.embed_batch(batch).await?);
        }
        Ok(all)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.endpoint(&self.embed_model, "embedContent");
        let request = EmbedContentRequest {
            model: &self.embed_model,
            content: Content {
                role: None,
                parts: vec![Part { text }],
            },
            task_type: TaskType::RetrievalQuery,
        };

        let response: EmbedContentResponse = self
            .retry_request(|| self.post_json(&url, &request, Error::Embedding))
            .await?;

        Ok(response.embedding.values)
    }

    fn model(&self) -> &str {
        &self.embed_model
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint(&self.generate_model, "generateContent");
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        tracing::info!("Generating answer with model: {}", self.generate_model);

        let response: GenerateResponse = self
            .retry_request(|| self.post_json(&url, &request, Error::Llm))
            .await?;

        response.into_text()
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.generate_model
    }
}
