// Google Fit REST client (users/me datasets + sessions) via reqwest

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::{Credentials, ProviderClient, ProviderFactory, response};
use crate::error::ProviderError;
use crate::models::RawPoint;
use crate::window::TimeWindow;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/fitness/v1";

pub struct GoogleFitClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<Credentials>,
}

impl GoogleFitClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: Arc::new(credentials),
        }
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ProviderError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(self.credentials.access_token())
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!("status {}", status)));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ProviderClient for GoogleFitClient {
    #[instrument(skip(self, window), fields(provider = "google_fit", operation = "fetch_points", dataset = %window.dataset_id()))]
    async fn fetch_points(
        &self,
        source_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RawPoint>, ProviderError> {
        let url = format!(
            "{}/users/me/dataSources/{}/datasets/{}",
            self.base_url,
            source_id,
            window.dataset_id()
        );
        let body = self.get_json(&url, &[]).await?;
        response::parse_dataset(&body)
    }

    #[instrument(skip(self, window), fields(provider = "google_fit", operation = "fetch_sessions"))]
    async fn fetch_sessions(
        &self,
        window: &TimeWindow,
        activity_type: i64,
    ) -> Result<Vec<RawPoint>, ProviderError> {
        let url = format!("{}/users/me/sessions", self.base_url);
        let query = [
            ("startTime", window.start_rfc3339()),
            ("endTime", window.end_rfc3339()),
        ];
        let body = self.get_json(&url, &query).await?;
        response::parse_sessions(&body, activity_type)
    }
}

/// Shares one connection pool; each request gets its own credential snapshot.
#[derive(Clone)]
pub struct GoogleFitFactory {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleFitFactory {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

impl ProviderFactory for GoogleFitFactory {
    fn client(&self, credentials: Credentials) -> Arc<dyn ProviderClient> {
        Arc::new(GoogleFitClient::new(
            self.http.clone(),
            self.base_url.clone(),
            credentials,
        ))
    }
}
