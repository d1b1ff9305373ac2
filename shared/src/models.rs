use serde::{Deserialize, Serialize};

/// Epoch seconds, as the backend sends them.
pub type Timestamp = i64;

/// Anything placed on the chart's time axis.
pub trait Timed {
    fn time(&self) -> Timestamp;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolsResponse {
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// One OHLC bar. Prices are optional because the backend emits `null` for
/// rows where a price is missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: Timestamp,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
}

impl Bar {
    pub fn new(time: Timestamp, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
        }
    }

    /// All four prices, if the bar is complete.
    pub fn prices(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.open?, self.high?, self.low?, self.close?))
    }

    pub fn is_bullish(&self) -> bool {
        match (self.open, self.close) {
            (Some(open), Some(close)) => close >= open,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub time: Timestamp,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A single point of a line series (VWAP, EMA).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub time: Timestamp,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    AboveBar,
    #[default]
    BelowBar,
    InBar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    #[default]
    ArrowUp,
    ArrowDown,
    Circle,
    Square,
}

/// Trade annotation attached to the candle series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub time: Timestamp,
    #[serde(default)]
    pub position: MarkerPosition,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub shape: MarkerShape,
    #[serde(default)]
    pub text: String,
}

/// A simulated trade as reported by the backend alongside the chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default)]
    pub entry_time: Option<String>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(rename = "type", default)]
    pub trade_type: Option<String>,
    #[serde(default)]
    pub exit_time: Option<String>,
    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub exit_reason: Option<String>,
    #[serde(default)]
    pub pnl_pct: f64,
    #[serde(default)]
    pub bars_held: u32,
}

/// Response body of `GET /data/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub ohlc: Vec<Bar>,
    #[serde(default)]
    pub volume: Vec<VolumePoint>,
    #[serde(default)]
    pub vwap: Vec<ValuePoint>,
    #[serde(default)]
    pub ema: Vec<ValuePoint>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
}

/// Optional date filter taken from the two date inputs. The strings are
/// forwarded to the backend untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    pub fn start(&self) -> Option<&str> {
        non_empty(self.start_date.as_deref())
    }

    pub fn end(&self) -> Option<&str> {
        non_empty(self.end_date.as_deref())
    }

    /// Query pairs for the non-empty bounds only.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(start) = self.start() {
            pairs.push(("start_date", start));
        }
        if let Some(end) = self.end() {
            pairs.push(("end_date", end));
        }
        pairs
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Timed for Bar {
    fn time(&self) -> Timestamp {
        self.time
    }
}

impl Timed for VolumePoint {
    fn time(&self) -> Timestamp {
        self.time
    }
}

impl Timed for ValuePoint {
    fn time(&self) -> Timestamp {
        self.time
    }
}

impl Timed for Marker {
    fn time(&self) -> Timestamp {
        self.time
    }
}
