//! Remote corpus client.
//!
//! One bounded-timeout GET per location against the BDO API. Failures are
//! classified into tags on the returned `RawResponse` instead of bubbling as
//! errors, so the aggregator can decide per location whether to skip or fail
//! the whole query. No retries here; that policy belongs to layers above.

use crate::config::MundartConfig;
use crate::domain::LocationId;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Dictionary project holding the Franconian material.
const DICTIONARY: &str = "wbf";

/// Unparsed per-location response. Ephemeral: discarded once validated or
/// rejected.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub location: LocationId,
    pub status: FetchStatus,
}

/// Transport outcome of one fetch.
#[derive(Debug, Clone)]
pub enum FetchStatus {
    /// Non-empty response body, not yet validated.
    Body(String),
    /// Server answered with a non-success status.
    HttpError(u16),
    TimedOut,
    ConnectionFailed(String),
    EmptyBody,
}

/// Seam between the aggregator and the wire. The production implementation
/// is `BdoClient`; tests script per-location outcomes through a fake.
#[async_trait]
pub trait CorpusClient: Send + Sync {
    async fn fetch(&self, word: &str, location: &LocationId) -> RawResponse;
}

/// HTTP client for the BDO corpus API.
pub struct BdoClient {
    http: reqwest::Client,
    base_url: String,
}

impl BdoClient {
    pub fn new(config: &MundartConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn query_params<'a>(word: &'a str, location: &'a LocationId) -> [(&'static str, &'a str); 4] {
        [
            ("dictionary", DICTIONARY),
            ("bedeutung", word),
            ("orte", location.as_str()),
            ("case", "no"),
        ]
    }
}

#[async_trait]
impl CorpusClient for BdoClient {
    async fn fetch(&self, word: &str, location: &LocationId) -> RawResponse {
        debug!("Querying corpus for '{}' in {}", word, location);

        let result = self
            .http
            .get(&self.base_url)
            .query(&Self::query_params(word, location))
            .header("Accept-Language", "de-DE,de;q=0.9")
            .send()
            .await;

        let status = match result {
            Err(e) if e.is_timeout() => FetchStatus::TimedOut,
            Err(e) => FetchStatus::ConnectionFailed(e.to_string()),
            Ok(response) => {
                let http_status = response.status();
                if !http_status.is_success() {
                    FetchStatus::HttpError(http_status.as_u16())
                } else {
                    match response.text().await {
                        Err(e) if e.is_timeout() => FetchStatus::TimedOut,
                        Err(e) => FetchStatus::ConnectionFailed(e.to_string()),
                        Ok(body) if body.trim().is_empty() => FetchStatus::EmptyBody,
                        Ok(body) => FetchStatus::Body(body),
                    }
                }
            }
        };

        RawResponse {
            location: location.clone(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_carry_word_location_and_dictionary() {
        let location = LocationId::new("Feuchtwangen");
        let params = BdoClient::query_params("Wurst", &location);
        assert_eq!(params[0], ("dictionary", "wbf"));
        assert_eq!(params[1], ("bedeutung", "Wurst"));
        assert_eq!(params[2], ("orte", "Feuchtwangen"));
        assert_eq!(params[3], ("case", "no"));
    }
}
