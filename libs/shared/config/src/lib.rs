use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub generation_api_url: String,
    pub generation_api_key: String,
    pub generation_model: String,
    pub generation_timeout_secs: u64,
    pub faq_service_url: String,
    pub faq_confidence_threshold: f64,
    pub schedule_data_path: String,
    pub clinic_name: String,
    pub clinic_phone: String,
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            generation_api_url: env::var("GENERATION_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            generation_api_key: env::var("GENERATION_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("GENERATION_API_KEY not set, generation falls back to canned replies");
                    String::new()
                }),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            generation_timeout_secs: env::var("GENERATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            faq_service_url: env::var("FAQ_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("FAQ_SERVICE_URL not set, FAQ answers fall back to the office line");
                    String::new()
                }),
            faq_confidence_threshold: env::var("FAQ_CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.5),
            schedule_data_path: env::var("SCHEDULE_DATA_PATH")
                .unwrap_or_else(|_| "data/clinic_schedule.json".to_string()),
            clinic_name: env::var("CLINIC_NAME")
                .unwrap_or_else(|_| "HealthCare Plus Clinic".to_string()),
            clinic_phone: env::var("CLINIC_PHONE")
                .unwrap_or_else(|_| "+1-555-123-4567".to_string()),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        };

        if !config.is_generation_configured() {
            warn!("Generation collaborator not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_generation_configured(&self) -> bool {
        !self.generation_api_url.is_empty() && !self.generation_api_key.is_empty()
    }

    pub fn is_faq_configured(&self) -> bool {
        !self.faq_service_url.is_empty()
    }
}
