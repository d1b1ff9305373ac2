// Window state: every control the controller touches is a signal, so the
// components re-render whenever the controller writes through these adapters.

use std::ops::Deref;
use std::rc::Rc;

use dioxus::prelude::*;
use shared::models::{Bar, DateRange, Marker, Timestamp, TradeRecord, ValuePoint, VolumePoint};

use crate::chart::{ChartFactory, ChartModel, ChartOptions, ChartSurface, SeriesSpec, CANDLESTICK_CHART};
use crate::controller::{ChartController, ControlView, LegendContent, SelectorState, UiEvent};
use crate::error::BootstrapError;
use crate::services::HttpMarketClient;

pub type AppController = ChartController<HttpMarketClient, SignalChart, SignalView>;

/// Shared handle passed to components as a prop.
#[derive(Clone)]
pub struct ControllerHandle(Rc<AppController>);

impl ControllerHandle {
    pub fn new(controller: AppController) -> Self {
        Self(Rc::new(controller))
    }

    /// Runs an event through the controller without blocking the handler.
    pub fn dispatch(&self, event: UiEvent) {
        let controller = self.clone();
        spawn(async move {
            controller.handle(event).await;
        });
    }
}

impl Deref for ControllerHandle {
    type Target = AppController;

    fn deref(&self) -> &AppController {
        &self.0
    }
}

impl PartialEq for ControllerHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct SignalView {
    pub selector: Signal<SelectorState>,
    pub start_date: Signal<String>,
    pub end_date: Signal<String>,
    pub loading: Signal<bool>,
    pub legend: Signal<Option<LegendContent>>,
    pub trades: Signal<Vec<TradeRecord>>,
}

/// Creates the control signals in the calling component.
pub fn use_signal_view() -> SignalView {
    SignalView {
        selector: use_signal(SelectorState::loading),
        start_date: use_signal(String::new),
        end_date: use_signal(String::new),
        loading: use_signal(|| false),
        legend: use_signal(|| None),
        trades: use_signal(Vec::new),
    }
}

/// `window.alert` call with the message embedded as a JS string literal.
pub fn alert_script(message: &str) -> String {
    format!("window.alert({});", serde_json::Value::from(message))
}

/// Installs a `ResizeObserver` on the element with `id` that posts its
/// content box as `{ width, height }` on every size change.
pub fn resize_observer_script(id: &str) -> String {
    format!(
        r#"const target = document.getElementById({id});
if (target) {{
    new ResizeObserver((entries) => {{
        for (const entry of entries) {{
            dioxus.send({{ width: entry.contentRect.width, height: entry.contentRect.height }});
        }}
    }}).observe(target);
}}
await new Promise(() => {{}});"#,
        id = serde_json::Value::from(id)
    )
}

impl ControlView for SignalView {
    fn selected_symbol(&self) -> Option<String> {
        self.selector.peek().selected.clone()
    }

    fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date.peek().clone(), self.end_date.peek().clone())
    }

    fn show_symbols_loading(&mut self) {
        self.selector.set(SelectorState::loading());
    }

    fn populate_symbols(&mut self, symbols: &[String]) {
        self.selector.set(SelectorState::ready(symbols));
    }

    fn show_symbols_error(&mut self) {
        self.selector.set(SelectorState::error());
    }

    fn set_loading(&mut self, visible: bool) {
        self.loading.set(visible);
    }

    fn show_legend(&mut self, content: LegendContent) {
        self.legend.set(Some(content));
    }

    fn hide_legend(&mut self) {
        if self.legend.peek().is_some() {
            self.legend.set(None);
        }
    }

    fn show_trades(&mut self, trades: Vec<TradeRecord>) {
        self.trades.set(trades);
    }

    fn alert(&mut self, message: &str) {
        tracing::warn!(message = %message, "Alert");
        let dialog = eval(&alert_script(message));
        spawn(async move {
            if let Err(e) = dialog.join().await {
                tracing::error!(error = ?e, "Could not show alert dialog");
            }
        });
    }
}

/// Chart surface over the model signal rendered by `CandlestickChart`.
#[derive(Clone, Copy, PartialEq)]
pub struct SignalChart {
    model: Signal<ChartModel>,
}

impl ChartSurface for SignalChart {
    fn add_series(&mut self, spec: &SeriesSpec) -> Result<(), BootstrapError> {
        self.model.write().add_series(spec)
    }

    fn set_candles(&mut self, bars: Vec<Bar>) {
        self.model.write().set_candles(bars);
    }

    fn set_volume(&mut self, points: Vec<VolumePoint>) {
        self.model.write().set_volume(points);
    }

    fn set_vwap(&mut self, points: Vec<ValuePoint>) {
        self.model.write().set_vwap(points);
    }

    fn set_ema(&mut self, points: Vec<ValuePoint>) {
        self.model.write().set_ema(points);
    }

    fn set_markers(&mut self, markers: Vec<Marker>) {
        self.model.write().set_markers(markers);
    }

    fn fit_content(&mut self) {
        self.model.write().fit_content();
    }

    fn resize(&mut self, width: f64, height: f64) {
        if self.model.peek().size() != (width, height) {
            self.model.write().resize(width, height);
        }
    }

    fn size(&self) -> (f64, f64) {
        self.model.peek().size()
    }

    fn plot_area(&self) -> (f64, f64) {
        self.model.peek().plot_area()
    }

    fn bar_at(&self, time: Timestamp) -> Option<Bar> {
        self.model.peek().bar_at(time)
    }

    fn volume_at(&self, time: Timestamp) -> Option<f64> {
        self.model.peek().volume_at(time)
    }
}

/// Builds the SVG chart into `model`. Only the candlestick renderer exists.
pub struct SvgChartFactory {
    pub model: Signal<ChartModel>,
}

impl ChartFactory for SvgChartFactory {
    type Surface = SignalChart;

    fn create(&self, options: &ChartOptions) -> Result<SignalChart, BootstrapError> {
        if options.chart_type != CANDLESTICK_CHART {
            return Err(BootstrapError::ChartUnavailable(format!(
                "no renderer for chart type '{}'",
                options.chart_type
            )));
        }
        let mut model = self.model;
        model.set(ChartModel::new(options.clone()));
        Ok(SignalChart { model })
    }
}
