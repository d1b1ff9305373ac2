// Colors for the window chrome around the chart (toolbar, legend, trade table).
use super::ChartConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct ThemePalette {
    pub background: String,
    pub foreground: String,
    pub panel: String,
    pub border: String,
    pub muted: String,
    pub bullish: String,
    pub bearish: String,
}

impl ThemePalette {
    pub fn default_dark() -> Self {
        Self {
            background: "#131722".to_string(),
            foreground: "#d1d4dc".to_string(),
            panel: "#1e222d".to_string(),
            border: "#2b2b43".to_string(),
            muted: "#787b86".to_string(),
            bullish: "#26a69a".to_string(),
            bearish: "#ef5350".to_string(),
        }
    }

    /// Dark palette with the chart's own colors taking precedence.
    pub fn from_chart(chart: &ChartConfig) -> Self {
        Self {
            background: chart.background.clone(),
            foreground: chart.text_color.clone(),
            border: chart.grid_color.clone(),
            bullish: chart.candle.bullish_color.clone(),
            bearish: chart.candle.bearish_color.clone(),
            ..Self::default_dark()
        }
    }

    pub fn pnl_color(&self, pnl_pct: f64) -> &str {
        if pnl_pct > 0.0 {
            &self.bullish
        } else if pnl_pct < 0.0 {
            &self.bearish
        } else {
            &self.foreground
        }
    }
}
