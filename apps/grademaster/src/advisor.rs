//! # Advisory Client
//!
//! Optional collaborator that turns a student's result into written feedback.
//!
//! The wire contract is deliberately small: `POST <url>` with
//! `{"prompt": "..."}` (and a Bearer key when configured), answered by
//! `{"text": "..."}`. Callers always get a string back; any failure becomes
//! [`ADVICE_UNAVAILABLE`] and an empty answer becomes [`NO_ADVICE_GENERATED`].
//! There are no retries.

use crate::config::AdvisorConfig;
use grademaster_core::{ADVICE_UNAVAILABLE, AdviceRequest, NO_ADVICE_GENERATED};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from the advisory collaborator. Never surfaced to API clients.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor is not configured")]
    Disabled,

    #[error("cannot reach advisor at {0}")]
    Connection(String),

    #[error("advisor returned status {0}")]
    Status(u16),

    #[error("cannot parse advisor response: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct PromptBody<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct AdviceReply {
    #[serde(default)]
    text: Option<String>,
}

// =============================================================================
// HTTP ADVISOR
// =============================================================================

/// Advisor reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAdvisor {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpAdvisor {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let url = url.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdvisorError::Connection(format!("{url}: {e}")))?;
        Ok(Self { http, url, api_key })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, prompt: &str) -> Result<String, AdvisorError> {
        let mut req = self.http.post(&self.url).json(&PromptBody { prompt });
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| AdvisorError::Connection(format!("{}: {e}", self.url)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status.as_u16()));
        }

        let reply = resp
            .json::<AdviceReply>()
            .await
            .map_err(|e| AdvisorError::Parse(e.to_string()))?;
        Ok(reply
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| NO_ADVICE_GENERATED.to_string()))
    }
}

// =============================================================================
// ADVISOR
// =============================================================================

/// The configured advisor, if any.
#[derive(Debug, Clone)]
pub enum Advisor {
    Disabled,
    Http(HttpAdvisor),
}

impl Advisor {
    /// Build from configuration. A bad configuration logs and disables.
    #[must_use]
    pub fn from_config(config: &AdvisorConfig) -> Self {
        let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            tracing::info!("Advisor disabled (no URL configured)");
            return Advisor::Disabled;
        };

        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        match HttpAdvisor::new(url, config.api_key.clone(), timeout) {
            Ok(http) => {
                tracing::info!("Advisor enabled: {}", http.url());
                Advisor::Http(http)
            }
            Err(e) => {
                tracing::warn!("Advisor disabled: {}", e);
                Advisor::Disabled
            }
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Advisor::Http(_))
    }

    /// Ask for advice. Always returns text to show the user.
    pub async fn advise(&self, request: &AdviceRequest) -> String {
        match self.try_advise(request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(event = "advice_failure", "Advice unavailable: {}", e);
                ADVICE_UNAVAILABLE.to_string()
            }
        }
    }

    /// Ask for advice, keeping the failure reason.
    pub async fn try_advise(&self, request: &AdviceRequest) -> Result<String, AdvisorError> {
        match self {
            Advisor::Disabled => Err(AdvisorError::Disabled),
            Advisor::Http(http) => http.request(&request.prompt()).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grademaster_core::{QualificationType, Subject, classify};

    fn request() -> AdviceRequest {
        AdviceRequest::new(
            Subject::Esports,
            QualificationType::Diploma,
            Vec::new(),
            classify(0, QualificationType::Diploma),
        )
    }

    #[test]
    fn missing_url_disables() {
        let advisor = Advisor::from_config(&AdvisorConfig::default());
        assert!(!advisor.is_enabled());
    }

    #[tokio::test]
    async fn disabled_advisor_returns_failure_text() {
        let advice = Advisor::Disabled.advise(&request()).await;
        assert_eq!(advice, ADVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unreachable_advisor_returns_failure_text() {
        let config = AdvisorConfig {
            url: Some("http://127.0.0.1:9/advice".to_string()),
            api_key: None,
            timeout_secs: 1,
        };
        let advisor = Advisor::from_config(&config);
        assert!(advisor.is_enabled());
        assert_eq!(advisor.advise(&request()).await, ADVICE_UNAVAILABLE);
    }
}
