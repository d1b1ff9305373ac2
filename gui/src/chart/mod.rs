// Chart widget seam: the controller only talks to `ChartSurface`, so the SVG
// model used by the desktop app and the recording surfaces used in tests are
// interchangeable.
pub mod model;

use shared::models::{Bar, Marker, Timestamp, ValuePoint, VolumePoint};

use crate::config::ChartConfig;
use crate::error::BootstrapError;

pub use model::ChartModel;

/// Renderer the viewer ships with.
pub const CANDLESTICK_CHART: &str = "candlestick";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Candles,
    Volume,
    Vwap,
    Ema,
}

impl SeriesKind {
    /// Creation order on bootstrap.
    pub const ALL: [SeriesKind; 4] = [
        SeriesKind::Candles,
        SeriesKind::Volume,
        SeriesKind::Vwap,
        SeriesKind::Ema,
    ];
}

/// The crosshair follows the pointer freely; there is no snapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrosshairMode {
    Normal,
}

/// Presentation constants for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub kind: SeriesKind,
    pub title: String,
    pub color: String,
    /// Bearish color; only meaningful for candles.
    pub down_color: Option<String>,
    pub line_width: u32,
    /// Fraction of the pane left empty above the series. The volume
    /// histogram sits in the bottom fifth of the price pane.
    pub scale_margin_top: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub chart_type: String,
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub text_color: String,
    pub grid_color: String,
    pub crosshair_mode: CrosshairMode,
    pub crosshair_color: String,
    pub time_visible: bool,
    pub seconds_visible: bool,
    pub series: Vec<SeriesSpec>,
}

impl ChartOptions {
    pub fn from_config(chart: &ChartConfig, width: f64, height: f64) -> Self {
        let series = vec![
            SeriesSpec {
                kind: SeriesKind::Candles,
                title: String::new(),
                color: chart.candle.bullish_color.clone(),
                down_color: Some(chart.candle.bearish_color.clone()),
                line_width: chart.candle.wick_width,
                scale_margin_top: 0.1,
            },
            SeriesSpec {
                kind: SeriesKind::Volume,
                title: chart.volume.title.clone(),
                color: chart.volume.color.clone(),
                down_color: None,
                line_width: 1,
                scale_margin_top: 0.8,
            },
            SeriesSpec {
                kind: SeriesKind::Vwap,
                title: chart.vwap.title.clone(),
                color: chart.vwap.color.clone(),
                down_color: None,
                line_width: chart.vwap.line_width,
                scale_margin_top: 0.1,
            },
            SeriesSpec {
                kind: SeriesKind::Ema,
                title: chart.ema.title.clone(),
                color: chart.ema.color.clone(),
                down_color: None,
                line_width: chart.ema.line_width,
                scale_margin_top: 0.1,
            },
        ];
        Self {
            chart_type: chart.chart_type.clone(),
            width,
            height,
            background: chart.background.clone(),
            text_color: chart.text_color.clone(),
            grid_color: chart.grid_color.clone(),
            crosshair_mode: CrosshairMode::Normal,
            crosshair_color: chart.crosshair.color.clone(),
            time_visible: true,
            seconds_visible: false,
            series,
        }
    }

    pub fn spec(&self, kind: SeriesKind) -> Option<&SeriesSpec> {
        self.series.iter().find(|s| s.kind == kind)
    }

    /// Specs in creation order; fails if one of the four is not configured.
    pub fn series_in_order(&self) -> Result<Vec<&SeriesSpec>, BootstrapError> {
        SeriesKind::ALL
            .iter()
            .map(|kind| {
                self.spec(*kind)
                    .ok_or_else(|| BootstrapError::InvalidOptions(format!("missing {:?} series", kind)))
            })
            .collect()
    }
}

/// A chart instance holding the four series.
pub trait ChartSurface {
    fn add_series(&mut self, spec: &SeriesSpec) -> Result<(), BootstrapError>;

    fn set_candles(&mut self, bars: Vec<Bar>);
    fn set_volume(&mut self, points: Vec<VolumePoint>);
    fn set_vwap(&mut self, points: Vec<ValuePoint>);
    fn set_ema(&mut self, points: Vec<ValuePoint>);
    /// Markers attach to the candle series.
    fn set_markers(&mut self, markers: Vec<Marker>);
    /// Fit the visible time range to the loaded candles.
    fn fit_content(&mut self);
    fn resize(&mut self, width: f64, height: f64);

    fn size(&self) -> (f64, f64);
    /// Size of the data area, excluding the price and time axes.
    fn plot_area(&self) -> (f64, f64);
    fn bar_at(&self, time: Timestamp) -> Option<Bar>;
    fn volume_at(&self, time: Timestamp) -> Option<f64>;
}

/// Creates the chart on bootstrap.
pub trait ChartFactory {
    type Surface: ChartSurface;

    fn create(&self, options: &ChartOptions) -> Result<Self::Surface, BootstrapError>;
}
