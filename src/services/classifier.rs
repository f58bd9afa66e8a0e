use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{QueryClassifier, ServiceError};
use crate::config::Secret;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Forwards queries to a remote classification endpoint and returns its JSON
/// answer untouched.
#[derive(Debug, Clone)]
pub struct HttpQueryClassifier {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<Secret>,
}

impl HttpQueryClassifier {
    pub fn new(endpoint: Url, api_key: Option<Secret>) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint, api_key })
    }
}

#[async_trait]
impl QueryClassifier for HttpQueryClassifier {
    async fn classify_user_query(&self, query: &str) -> Result<Value, ServiceError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "query": query }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("classifier request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Upstream(format!("classifier responded with {}", status)));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::Upstream(format!("classifier returned invalid JSON: {}", e)))?;

        debug!("Classified query ({} chars)", query.len());
        Ok(payload)
    }
}

/// Stand-in used when no classifier endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredClassifier;

#[async_trait]
impl QueryClassifier for UnconfiguredClassifier {
    async fn classify_user_query(&self, _query: &str) -> Result<Value, ServiceError> {
        Err(ServiceError::Unavailable("COLD_CLASSIFIER_URL is not configured".into()))
    }
}
