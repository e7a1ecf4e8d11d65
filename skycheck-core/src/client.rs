use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::{fmt::Debug, time::Duration};
use tracing::{debug, info};

use crate::{
    config::Config,
    error::FetchError,
    model::{ApiErrorBody, WeatherReport, WeatherResponse},
    query::{DEFAULT_BASE_URL, QueryBuilder},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can look up current conditions for a raw query string.
#[async_trait]
pub trait ConditionsSource: Send + Sync + Debug {
    async fn fetch_current(&self, query: &str) -> Result<WeatherReport, FetchError>;
}

/// WeatherAPI.com `current.json` client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    urls: QueryBuilder,
    http: Client,
}

#[derive(Debug)]
pub struct WeatherClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl WeatherClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<WeatherClient, FetchError> {
        let http = Client::builder().timeout(self.timeout).build()?;

        Ok(WeatherClient { urls: QueryBuilder::new(self.base_url, self.api_key), http })
    }
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> WeatherClientBuilder {
        WeatherClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Construct a client from the resolved API key and any endpoint/timeout overrides.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Self::builder(config.api_key()?);

        if let Some(base_url) = &config.base_url {
            builder = builder.base_url(base_url.as_str());
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build()?)
    }

    /// Look up current conditions for `query`.
    ///
    /// Issues at most one GET and never retries. An invalid query fails before
    /// anything touches the network.
    pub async fn fetch_current(&self, query: &str) -> Result<WeatherReport, FetchError> {
        self.request_current(query)
            .await
            .inspect_err(|err| debug!(error = %err, "current conditions lookup failed"))
    }

    async fn request_current(&self, query: &str) -> Result<WeatherReport, FetchError> {
        let url = self.urls.build_url(query)?;
        debug!(
            query = query.trim(),
            endpoint = %self.urls.base_url(),
            "requesting current conditions"
        );

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let report = WeatherResponse::from_body(&body)?.into_report();
        info!(
            location = %report.location_name,
            temp_c = report.temperature_celsius,
            icon = %report.icon_id,
            "current conditions received"
        );

        Ok(report)
    }
}

#[async_trait]
impl ConditionsSource for WeatherClient {
    async fn fetch_current(&self, query: &str) -> Result<WeatherReport, FetchError> {
        WeatherClient::fetch_current(self, query).await
    }
}

fn api_error(status: StatusCode, body: &str) -> FetchError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| truncate_body(body));

    FetchError::Api { status: status.as_u16(), message }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
