use crate::config::Settings;
use crate::error::ServiceError;
use crate::feed::types::{NeoFeed, NeoFeedResponse};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Seam between the request pipeline and the external feed source.
#[async_trait::async_trait]
pub trait NeoFeedProvider: Send + Sync {
    async fn fetch_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<NeoFeed, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpNeoFeedProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpNeoFeedProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build feed http client")?;

        Ok(Self {
            http,
            base_url: settings.feed_base_url().to_string(),
            api_key: settings.feed_api_key().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl NeoFeedProvider for HttpNeoFeedProvider {
    /// One GET against the feed, single attempt. The upstream enforces its
    /// own quota; callers retry, this client does not.
    async fn fetch_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<NeoFeed, ServiceError> {
        tracing::debug!(%start, %end, "fetching neo feed");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                ("api_key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = res.status();
        let text = res.text().await.map_err(|err| {
            ServiceError::upstream(None, format!("failed to read feed response: {err}"))
        })?;

        if !status.is_success() {
            return Err(ServiceError::upstream(
                Some(status.as_u16()),
                upstream_message(&text, status),
            ));
        }

        parse_feed_body(&text)
    }
}

fn classify_send_error(err: reqwest::Error) -> ServiceError {
    if err.is_builder() {
        ServiceError::internal(format!("invalid feed request: {err}"))
    } else {
        ServiceError::upstream(None, err.to_string())
    }
}

fn parse_feed_body(text: &str) -> Result<NeoFeed, ServiceError> {
    serde_json::from_str::<NeoFeedResponse>(text)
        .map(|body| body.near_earth_objects)
        .map_err(|err| {
            ServiceError::upstream(None, format!("feed response is not valid JSON: {err}"))
        })
}

/// The feed's error bodies carry a top-level `error_message`; fall back to
/// the raw body, then to the status reason when the body is empty.
fn upstream_message(text: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        if let Some(msg) = value.get("error_message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("upstream error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
