//! Client for the external response-generation service (OpenAI-style chat
//! completions). The orchestrator treats any error here as a signal to use
//! the deterministic fallback reply instead.

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{header, Client};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;

use crate::models::{ChatMessage, MessageRole};
use crate::prompts::SYSTEM_PROMPT;

const MAX_REPLY_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.7;

pub struct GenerationClient {
    base_url: String,
    api_key: String,
    model: String,
    http_client: Client,
    configured: bool,
}

impl GenerationClient {
    pub fn new(config: &AppConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.generation_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.generation_api_url.trim_end_matches('/').to_string(),
            api_key: config.generation_api_key.clone(),
            model: config.generation_model.clone(),
            http_client,
            configured: config.is_generation_configured(),
        }
    }

    /// Generate a patient-facing reply from the conversation history plus the
    /// structured context derived by the turn planner.
    pub async fn reply(
        &self,
        history: &[ChatMessage],
        message: &str,
        context: &str,
    ) -> Result<String> {
        if !self.configured {
            return Err(anyhow!("generation collaborator not configured"));
        }

        let mut messages = vec![json!({
            "role": "system",
            "content": SYSTEM_PROMPT,
        })];
        for msg in history {
            let role = match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            };
            messages.push(json!({ "role": role, "content": msg.content }));
        }
        messages.push(json!({
            "role": "user",
            "content": format!("[CONTEXT: {}]\n\nUser message: {}", context, message),
        }));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_REPLY_TOKENS,
        });

        debug!("Requesting generated reply ({} history messages)", history.len());

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Generation API error: {}", error_text));
        }

        let payload: Value = response.json().await?;
        let reply = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("Invalid generation response format"))?
            .to_string();

        Ok(reply)
    }
}
