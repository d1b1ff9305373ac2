// The controls surrounding the chart, as seen by the controller.

use shared::models::{DateRange, TradeRecord};

pub const SYMBOLS_LOADING_LABEL: &str = "Loading symbols...";
pub const SYMBOLS_PLACEHOLDER_LABEL: &str = "Select a symbol";
pub const SYMBOLS_ERROR_LABEL: &str = "Error loading symbols";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectorStatus {
    #[default]
    Loading,
    Ready,
    Error,
}

/// Contents of the symbol `<select>`: one placeholder option followed by the
/// symbols in backend order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorState {
    pub status: SelectorStatus,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

impl SelectorState {
    pub fn loading() -> Self {
        Self::default()
    }

    /// Ready with the first symbol pre-selected.
    pub fn ready(symbols: &[String]) -> Self {
        Self {
            status: SelectorStatus::Ready,
            options: symbols.to_vec(),
            selected: symbols.first().cloned(),
        }
    }

    pub fn error() -> Self {
        Self {
            status: SelectorStatus::Error,
            options: Vec::new(),
            selected: None,
        }
    }

    pub fn placeholder_label(&self) -> &'static str {
        match self.status {
            SelectorStatus::Loading => SYMBOLS_LOADING_LABEL,
            SelectorStatus::Ready => SYMBOLS_PLACEHOLDER_LABEL,
            SelectorStatus::Error => SYMBOLS_ERROR_LABEL,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.status != SelectorStatus::Ready
    }

    /// Applies a user selection; the empty placeholder value clears it.
    pub fn select(&mut self, value: &str) {
        self.selected = if value.is_empty() {
            None
        } else {
            self.options.iter().find(|s| s.as_str() == value).cloned()
        };
    }

    /// Placeholder label followed by every symbol, as rendered.
    pub fn labels(&self) -> Vec<&str> {
        std::iter::once(self.placeholder_label())
            .chain(self.options.iter().map(String::as_str))
            .collect()
    }
}

/// Formatted values shown in the floating legend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegendContent {
    pub symbol: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub time: String,
}

/// Handles on the selector, date inputs, loading indicator, legend and
/// alert dialog.
pub trait ControlView {
    fn selected_symbol(&self) -> Option<String>;
    fn date_range(&self) -> DateRange;

    fn show_symbols_loading(&mut self);
    fn populate_symbols(&mut self, symbols: &[String]);
    fn show_symbols_error(&mut self);

    fn set_loading(&mut self, visible: bool);

    fn show_legend(&mut self, content: LegendContent);
    fn hide_legend(&mut self);

    fn show_trades(&mut self, trades: Vec<TradeRecord>);

    /// Blocking, user-facing message.
    fn alert(&mut self, message: &str);
}
