// HTTP client for the backtest visualizer backend.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use shared::models::{ChartData, DateRange, SymbolsResponse};
use std::time::Duration;

use super::MarketApi;
use crate::config::BackendSettings;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct HttpMarketClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpMarketClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", settings.base_url, e)))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("candle-viewer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn symbols_url(&self) -> Result<Url, ApiError> {
        self.endpoint(&["symbols"])
    }

    /// `/data/{symbol}`; the symbol is encoded as a single path segment and
    /// date bounds are only appended when non-empty.
    pub fn data_url(&self, symbol: &str, range: &DateRange) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["data", symbol])?;
        let pairs = range.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "GET");
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MarketApi for HttpMarketClient {
    async fn symbols(&self) -> Result<Vec<String>, ApiError> {
        let url = self.symbols_url()?;
        let response: SymbolsResponse = self.get_json(url).await?;
        tracing::info!(count = response.symbols.len(), "Fetched symbol list");
        Ok(response.symbols)
    }

    async fn chart_data(&self, symbol: &str, range: &DateRange) -> Result<ChartData, ApiError> {
        let url = self.data_url(symbol, range)?;
        let data: ChartData = self.get_json(url).await?;
        tracing::info!(
            symbol = %symbol,
            bars = data.ohlc.len(),
            markers = data.markers.len(),
            trades = data.trades.len(),
            "Fetched chart data"
        );
        Ok(data)
    }
}
