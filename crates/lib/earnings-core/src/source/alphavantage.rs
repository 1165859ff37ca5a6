use std::time::Duration;

use earnings_store::models::{CompanySymbol, QuarterlyReportsResponse, ReportType};
use reqwest::Client;
use tracing::{debug, warn};

use super::{FetchFuture, ReportSource, SourceError};

pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection settings for the Alpha Vantage statements API.
#[derive(Clone)]
pub struct AlphaVantageConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl AlphaVantageConfig {
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for AlphaVantageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphaVantageConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Report source backed by the Alpha Vantage REST API.
#[derive(Debug, Clone)]
pub struct AlphaVantageSource {
    client: Client,
    config: AlphaVantageConfig,
}

impl AlphaVantageSource {
    /// Builds the HTTP client with the configured timeout.
    ///
    /// # Errors
    /// Returns `SourceError::Transport` if the client cannot be constructed.
    pub fn new(config: AlphaVantageConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| SourceError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    async fn fetch(
        &self,
        report_type: ReportType,
        symbol: CompanySymbol,
    ) -> Result<QuarterlyReportsResponse, SourceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingCredential(API_KEY_ENV))?;

        debug!("requesting {report_type} for {symbol}");
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("function", report_type.function()),
                ("symbol", symbol.as_str()),
                ("apikey", api_key),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.map_transport(err))?;

        let body = response
            .text()
            .await
            .map_err(|err| self.map_transport(err))?;
        let payload: QuarterlyReportsResponse = serde_json::from_str(&body).map_err(|err| {
            SourceError::Decode(format!("malformed {report_type} payload for {symbol}: {err}"))
        })?;

        if let Some(advisory) = payload.advisory() {
            warn!("alphavantage advisory for {symbol} {report_type}: {advisory}");
        }
        Ok(payload)
    }

    fn map_transport(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            return SourceError::Transport(format!(
                "request timed out after {:?}",
                self.config.timeout
            ));
        }
        // The request URL carries the API key.
        SourceError::Transport(err.without_url().to_string())
    }
}

impl ReportSource for AlphaVantageSource {
    fn fetch_quarterly_reports(
        &self,
        report_type: ReportType,
        symbol: CompanySymbol,
    ) -> FetchFuture<'_> {
        Box::pin(self.fetch(report_type, symbol))
    }
}
