//! Client for the external FAQ retrieval service. Answers below the
//! confidence threshold, and any transport failure, degrade to a
//! call-the-office reply rather than surfacing an error mid-conversation.

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use shared_config::AppConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct FaqMatch {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub similarity: f64,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<FaqMatch>,
}

pub struct RetrievalClient {
    base_url: String,
    confidence_threshold: f64,
    clinic_phone: String,
    http_client: Client,
    configured: bool,
}

impl RetrievalClient {
    pub fn new(config: &AppConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.faq_service_url.trim_end_matches('/').to_string(),
            confidence_threshold: config.faq_confidence_threshold,
            clinic_phone: config.clinic_phone.clone(),
            http_client,
            configured: config.is_faq_configured(),
        }
    }

    async fn query(&self, question: &str) -> Result<Vec<FaqMatch>> {
        if !self.configured {
            return Err(anyhow!("retrieval collaborator not configured"));
        }

        let response = self
            .http_client
            .get(format!("{}/query", self.base_url))
            .query(&[("question", question)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Retrieval API error: {}", response.status()));
        }

        let payload: QueryResponse = response.json().await?;
        Ok(payload.results)
    }

    fn fallback_answer(&self) -> String {
        format!(
            "I'm not sure about that specific question, but I'd be happy to help! \
             You can reach our clinic at {} for more information. \
             Is there anything else I can help you with, or would you like to schedule an appointment?",
            self.clinic_phone
        )
    }

    /// Best available answer for an FAQ question. Results below the
    /// confidence threshold fall back to the office line.
    pub async fn answer(&self, question: &str) -> String {
        match self.query(question).await {
            Ok(results) => {
                let best = results.into_iter().next();
                match best {
                    Some(m) if m.similarity >= self.confidence_threshold => {
                        debug!(
                            "FAQ match '{}' (category {}, similarity {:.2})",
                            m.question, m.category, m.similarity
                        );
                        m.answer
                    }
                    Some(m) => {
                        debug!("FAQ match below threshold ({:.2})", m.similarity);
                        self.fallback_answer()
                    }
                    None => self.fallback_answer(),
                }
            }
            Err(e) => {
                warn!("FAQ retrieval failed: {}", e);
                self.fallback_answer()
            }
        }
    }
}
