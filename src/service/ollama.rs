//! Ollama-backed plan service adapter
//!
//! Implements the boundary against a local Ollama server:
//! - plan generation via POST /api/generate with `format: "json"`
//! - chat turns via POST /api/chat, non-streaming
//!
//! The plan prompt asks for a structured 7-day plan; the response JSON is
//! passed through opaquely. Malformed output and HTTP failures both map to
//! service errors the controller surfaces as retryable notices.

use crate::errors::{CompanionError, Result};
use crate::service::PlanService;
use crate::types::{ChatMessage, Plan, Profile};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "qwen2.5:7b-instruct";

/// Request timeout; plan generation on small local models can be slow
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// System prompt framing the chat companion
const COMPANION_PROMPT: &str = "You are a friendly learning companion. The user \
is following a personalized multi-day learning plan. Answer questions about \
their plan and explain concepts clearly and concisely.";

/// HTTP client for the Ollama API
#[derive(Debug, Clone)]
pub struct OllamaService {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaService {
    /// Create a service with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL)
    }

    /// Create a service with custom endpoint and model
    pub fn with_config(base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CompanionError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Check if the Ollama server is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the plan generation prompt from a profile
    fn plan_prompt(profile: &Profile) -> String {
        let mut prompt = format!(
            "Create a personalized 7-day learning plan for the topic \"{}\".\n\
             The learner is at {} level and can spend {} per day.\n",
            profile.topic(),
            profile.level(),
            profile.time_commitment(),
        );

        if let Some(motivation) = profile.motivation() {
            prompt.push_str(&format!("Their motivation: {}.\n", motivation));
        }

        prompt.push_str(
            "\nRespond with a single JSON object of the form:\n\
             {\"topic\": string, \"days\": [{\"day\": number, \"title\": string, \
             \"goals\": [string], \"resources\": [string]}]}\n\
             Output only the JSON object, nothing else.",
        );

        prompt
    }
}

#[async_trait]
impl PlanService for OllamaService {
    async fn generate_plan(&self, profile: &Profile) -> Result<Plan> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: Self::plan_prompt(profile),
            stream: false,
            format: Some("json".to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompanionError::Service(format!("Failed to reach Ollama: {}", e)))?;

        if !response.status().is_success() {
            return Err(CompanionError::Service(format!(
                "Ollama API error: {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CompanionError::Service(format!("Failed to parse response: {}", e)))?;

        let value: serde_json::Value = serde_json::from_str(&body.response)
            .map_err(|e| CompanionError::Service(format!("Malformed plan JSON: {}", e)))?;

        Ok(Plan::from_value(value))
    }

    async fn send_turn(&self, history: &[ChatMessage], new_text: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ApiMessage {
            role: "system".to_string(),
            content: COMPANION_PROMPT.to_string(),
        });
        messages.extend(history.iter().map(ApiMessage::from));
        messages.push(ApiMessage {
            role: "user".to_string(),
            content: new_text.to_string(),
        });

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompanionError::Service(format!("Failed to reach Ollama: {}", e)))?;

        if !response.status().is_success() {
            return Err(CompanionError::Service(format!(
                "Ollama API error: {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompanionError::Service(format!("Failed to parse response: {}", e)))?;

        Ok(body.message.content)
    }
}

/// Ollama generate request
#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

/// Ollama generate response (non-streaming)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama chat request
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    stream: bool,
}

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ApiMessage,
}

/// Wire-format chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for ApiMessage {
    fn from(msg: &ChatMessage) -> Self {
        ApiMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SkillLevel, TimeCommitment};

    fn rust_profile() -> Profile {
        Profile::new(
            "Rust",
            TimeCommitment::Minutes30,
            SkillLevel::Beginner,
            Some("to get a job".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_service_creation() {
        let service = OllamaService::new().unwrap();
        assert_eq!(service.model(), DEFAULT_MODEL);
        assert_eq!(service.base_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_service_with_config_trims_slash() {
        let service = OllamaService::with_config("http://localhost:8080/", "llama3.1:8b").unwrap();
        assert_eq!(service.base_url(), "http://localhost:8080");
        assert_eq!(service.model(), "llama3.1:8b");
    }

    #[test]
    fn test_plan_prompt_contains_profile() {
        let prompt = OllamaService::plan_prompt(&rust_profile());
        assert!(prompt.contains("Rust"));
        assert!(prompt.contains("beginner"));
        assert!(prompt.contains("30min"));
        assert!(prompt.contains("to get a job"));
        assert!(prompt.contains("7-day"));
    }

    #[test]
    fn test_plan_prompt_without_motivation() {
        let profile =
            Profile::new("Pottery", TimeCommitment::Hour1, SkillLevel::Advanced, None).unwrap();
        let prompt = OllamaService::plan_prompt(&profile);
        assert!(!prompt.contains("motivation"));
    }

    #[test]
    fn test_api_message_conversion() {
        let msg = ChatMessage::assistant("hello");
        let api: ApiMessage = (&msg).into();
        assert_eq!(api.role, "assistant");
        assert_eq!(api.content, "hello");
    }

    #[tokio::test]
    #[ignore] // Requires Ollama running
    async fn test_health_check_integration() {
        let service = OllamaService::new().unwrap();
        assert!(service.health_check().await);
    }
}
