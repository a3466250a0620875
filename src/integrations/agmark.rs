use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::{
    constants::{CONNECT_TIMEOUT_SECS, MARKET_FETCH_TIMEOUT_SECS},
    error::{AppError, Result},
    models::FeedPage,
    services::market::PriceFeed,
};

/// Client for the public commodity price resource. Filters and paging are
/// passed through as query parameters; the response is an untrusted JSON
/// envelope.
#[derive(Debug, Clone)]
pub struct AgmarkClient {
    api_key: String,
    api_url: String,
}

impl AgmarkClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self { api_key, api_url }
    }

    fn request_url(
        &self,
        state: Option<&str>,
        commodity: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid market feed URL: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("api-key", self.api_key.trim())
                .append_pair("format", "json")
                .append_pair("limit", &limit.to_string())
                .append_pair("offset", &offset.to_string());
            if let Some(state) = state {
                pairs.append_pair("filters[state]", state);
            }
            if let Some(commodity) = commodity {
                pairs.append_pair("filters[commodity]", commodity);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl PriceFeed for AgmarkClient {
    async fn fetch(
        &self,
        state: Option<&str>,
        commodity: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<FeedPage> {
        let request_url = self.request_url(state, commodity, limit, offset)?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(MARKET_FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Market HTTP client init failed: {}", e)))?;

        let response = client.get(request_url).send().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Market feed request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "Market feed returned {}",
                response.status()
            )));
        }

        // A 2xx with an unexpected shape degrades to the no-data envelope;
        // only transport-level failures surface as errors.
        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Market feed returned non-JSON payload: {}", e);
                return Ok(FeedPage::default());
            }
        };

        Ok(serde_json::from_value::<FeedPage>(payload).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_carries_paging_and_format() {
        let client = AgmarkClient::new("key".to_string(), "https://example.com/resource/abc".to_string());
        let url = client.request_url(None, None, 100, 0).unwrap();
        let query = url.query().unwrap_or_default();
        assert!(query.contains("api-key=key"));
        assert!(query.contains("format=json"));
        assert!(query.contains("limit=100"));
        assert!(query.contains("offset=0"));
        assert!(!query.contains("filters"));
    }

    #[test]
    fn request_url_passes_filters_through_verbatim() {
        let client = AgmarkClient::new("key".to_string(), "https://example.com/resource/abc".to_string());
        let url = client
            .request_url(Some("Tamil Nadu"), Some("Onion"), 50, 0)
            .unwrap();
        let query = url.query().unwrap_or_default();
        assert!(query.contains("filters%5Bstate%5D=Tamil+Nadu"));
        assert!(query.contains("filters%5Bcommodity%5D=Onion"));
    }
}
