// Backend access for the chart controller.
pub mod market_client;

use async_trait::async_trait;
use shared::models::{ChartData, DateRange};

use crate::error::ApiError;

pub use market_client::HttpMarketClient;

/// The two read endpoints the viewer depends on.
#[async_trait]
pub trait MarketApi {
    /// `GET /symbols`
    async fn symbols(&self) -> Result<Vec<String>, ApiError>;

    /// `GET /data/{symbol}` with the optional date filter.
    async fn chart_data(&self, symbol: &str, range: &DateRange) -> Result<ChartData, ApiError>;
}
