//! Chat-completions client for Groq's OpenAI-compatible API.
//!
//! Every model call in the pipeline goes through [`GroqClient::chat`], which
//! owns authentication, retries and response decoding.

use crate::adapters::prompts;
use crate::config::toml_config::LlmConfig;
use crate::domain::ports::SkillModel;
use crate::utils::error::{RadarError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

const DISCOVERY_CHUNK_SIZE: usize = 15;
const DISCOVERY_CHUNK_CHARS: usize = 8000;
const DISCOVERY_KNOWN_LIMIT: usize = 100;
const DESCRIPTION_CHARS: usize = 6000;

const FALLBACK_KEYWORDS: &[&str] = &[
    "AI Engineer",
    "AI Developer",
    "AI Research Scientist",
    "AI Solutions Architect",
    "AI Product Manager",
    "Senior AI Engineer",
    "AI/ML Engineer",
    "AI Specialist",
    "AI Consultant",
    "AI Team Lead",
];

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl GroqClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Sends one user message and returns the trimmed reply text.
    /// Retries on 429, 5xx and transport failures with exponential backoff.
    pub async fn chat(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let mut last_error: Option<RadarError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay = self.retry_delay * (1u32 << (attempt - 1).min(16));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.send_once(&request_body).await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_retryable() => {
                    warn!("LLM call failed: {}", e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(RadarError::LlmApiError {
            status: 429,
            message: format!("gave up after {} attempts", self.max_retries),
        }))
    }

    /// One round trip. Rate limits and 5xx come back as retryable `LlmApiError`s.
    async fn send_once(&self, request_body: &ChatRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(RadarError::LlmApiError {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(RadarError::LlmEmptyResponse)
    }
}

#[async_trait]
impl SkillModel for GroqClient {
    async fn generate_search_keywords(&self, num_keywords: usize) -> Result<Vec<String>> {
        let content = self
            .chat(&prompts::search_keywords_prompt(num_keywords), 0.7, 500)
            .await?;

        let keywords: Vec<String> = parse_string_array(&content)
            .unwrap_or_default()
            .into_iter()
            .take(num_keywords)
            .collect();

        if keywords.is_empty() {
            warn!("Using fallback keywords...");
            return Ok(fallback_keywords(num_keywords));
        }

        Ok(keywords)
    }

    async fn extract_skills(&self, description: &str) -> Result<Vec<String>> {
        let description = truncate_chars(description, DESCRIPTION_CHARS);
        let content = self
            .chat(&prompts::extract_skills_prompt(description), 0.2, 500)
            .await?;

        match parse_string_array(&content) {
            Some(skills) => Ok(skills),
            None => {
                debug!("No skill array in model reply: {}", truncate_chars(&content, 200));
                Ok(Vec::new())
            }
        }
    }

    async fn discover_new_skills(
        &self,
        descriptions: &[String],
        known_skills: &HashSet<String>,
    ) -> Result<Vec<String>> {
        if descriptions.is_empty() {
            return Ok(Vec::new());
        }

        let mut sorted_known: Vec<&String> = known_skills.iter().collect();
        sorted_known.sort();
        let known_list = sorted_known
            .into_iter()
            .take(DISCOVERY_KNOWN_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let mut known_lower: HashSet<String> =
            known_skills.iter().map(|s| s.to_lowercase()).collect();

        let mut discovered = Vec::new();
        let total_chunks = descriptions.len().div_ceil(DISCOVERY_CHUNK_SIZE);

        for (index, chunk) in descriptions.chunks(DISCOVERY_CHUNK_SIZE).enumerate() {
            let joined = chunk.join("\n---\n");
            let combined = truncate_chars(&joined, DISCOVERY_CHUNK_CHARS);
            debug!("Discovering new skills in chunk {}/{}", index + 1, total_chunks);

            let content = match self
                .chat(&prompts::discover_skills_prompt(&known_list, combined), 0.3, 500)
                .await
            {
                Ok(content) => content,
                Err(e) => {
                    warn!("Error in chunk {}: {}", index + 1, e);
                    continue;
                }
            };

            for skill in parse_string_array(&content).unwrap_or_default() {
                // 跨 chunk 去重
                if skill.chars().count() > 1 && known_lower.insert(skill.to_lowercase()) {
                    discovered.push(skill);
                }
            }
        }

        Ok(discovered)
    }
}

pub fn fallback_keywords(num_keywords: usize) -> Vec<String> {
    FALLBACK_KEYWORDS
        .iter()
        .take(num_keywords)
        .map(|s| s.to_string())
        .collect()
}

/// Finds the first JSON array in a model reply and keeps its non-blank strings.
/// Returns `None` when the reply holds no parseable array.
pub fn parse_string_array(content: &str) -> Option<Vec<String>> {
    let content = strip_json_fences(content);
    let re = Regex::new(r"(?s)\[.*\]").ok()?;
    let span = re.find(content)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(span.as_str()).ok()?;

    Some(
        values
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
