// SVG chart components
pub mod candlestick;
pub mod indicators;

pub use candlestick::CandlestickChart;
pub use indicators::IndicatorOverlay;
