// ChartController: owns the chart, the surrounding controls and the backend
// client for the lifetime of the window, and turns UI events into fetches and
// series updates.
pub mod events;
pub mod view;

use std::cell::{Cell, Ref, RefCell};

use shared::models::{ChartData, DateRange};
use shared::utils::{format_price, format_timestamp, format_volume, sort_by_time};

use crate::chart::{ChartFactory, ChartOptions, ChartSurface};
use crate::config::{AppConfig, LegendPolicy};
use crate::dom_ids;
use crate::error::BootstrapError;
use crate::services::MarketApi;

pub use events::{CrosshairEvent, Point, ResizeEvent, UiEvent};
pub use view::{ControlView, LegendContent, SelectorState, SelectorStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub auto_load_first_symbol: bool,
    pub legend_policy: LegendPolicy,
    pub date_time_format: String,
    pub thousand_separator: String,
}

impl ControllerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            auto_load_first_symbol: config.behavior.auto_load_first_symbol,
            legend_policy: config.behavior.legend_policy,
            date_time_format: config.format.date_time_format.clone(),
            thousand_separator: config.format.thousand_separator.clone(),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            auto_load_first_symbol: true,
            legend_policy: LegendPolicy::Hide,
            date_time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            thousand_separator: ",".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered { bars: usize },
    /// The backend returned no OHLC rows.
    Empty,
    Failed,
    /// A newer load was issued while this one was in flight.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolsOutcome {
    Loaded {
        count: usize,
        first_load: Option<LoadOutcome>,
    },
    Failed,
}

/// Shows the loading indicator while alive. Only the latest request hides
/// it, so a superseded load cannot clear the indicator of a newer one.
struct LoadingGuard<'a, V: ControlView> {
    view: &'a RefCell<V>,
    latest: &'a Cell<u64>,
    generation: u64,
}

impl<'a, V: ControlView> LoadingGuard<'a, V> {
    fn new(view: &'a RefCell<V>, latest: &'a Cell<u64>, generation: u64) -> Self {
        view.borrow_mut().set_loading(true);
        Self { view, latest, generation }
    }
}

impl<V: ControlView> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        if self.latest.get() == self.generation {
            self.view.borrow_mut().set_loading(false);
        }
    }
}

pub struct ChartController<A, S, V> {
    api: A,
    chart: RefCell<S>,
    view: RefCell<V>,
    settings: ControllerSettings,
    generation: Cell<u64>,
}

impl<A, S, V> ChartController<A, S, V>
where
    A: MarketApi,
    S: ChartSurface,
    V: ControlView,
{
    /// Creates the chart and its four series. On failure the user is alerted
    /// and nothing else is initialized.
    pub fn bootstrap<F>(
        api: A,
        factory: &F,
        options: &ChartOptions,
        mut view: V,
        settings: ControllerSettings,
    ) -> Result<Self, BootstrapError>
    where
        F: ChartFactory<Surface = S>,
    {
        let built = factory.create(options).and_then(|mut chart| {
            for spec in options.series_in_order()? {
                chart.add_series(spec)?;
                tracing::debug!(series = ?spec.kind, title = %spec.title, "Series created");
            }
            Ok(chart)
        });

        match built {
            Ok(chart) => {
                tracing::info!(
                    chart_type = %options.chart_type,
                    width = options.width,
                    height = options.height,
                    "Chart initialized"
                );
                Ok(Self {
                    api,
                    chart: RefCell::new(chart),
                    view: RefCell::new(view),
                    settings,
                    generation: Cell::new(0),
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Error initializing chart");
                view.alert(&format!("Error initializing chart: {}", e));
                Err(e)
            }
        }
    }

    pub fn chart(&self) -> Ref<'_, S> {
        self.chart.borrow()
    }

    pub fn view(&self) -> Ref<'_, V> {
        self.view.borrow()
    }

    fn next_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.get() != generation
    }

    /// Fetches the symbol list into the selector and, when configured,
    /// loads the first symbol.
    pub async fn init_symbols(&self) -> SymbolsOutcome {
        self.view.borrow_mut().show_symbols_loading();

        match self.api.symbols().await {
            Ok(symbols) => {
                tracing::info!(count = symbols.len(), "Symbols loaded");
                self.view.borrow_mut().populate_symbols(&symbols);

                let first_load = match symbols.first() {
                    Some(first) if self.settings.auto_load_first_symbol => {
                        let range = self.view.borrow().date_range();
                        Some(self.load_data(first, &range).await)
                    }
                    _ => None,
                };
                SymbolsOutcome::Loaded {
                    count: symbols.len(),
                    first_load,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading symbols");
                let mut view = self.view.borrow_mut();
                view.show_symbols_error();
                view.alert(&format!("Error loading symbols: {}", e));
                SymbolsOutcome::Failed
            }
        }
    }

    /// Fetches and renders one symbol. Every call supersedes the previous
    /// one; late responses of older calls are dropped.
    pub async fn load_data(&self, symbol: &str, range: &DateRange) -> LoadOutcome {
        let generation = self.next_generation();
        let _loading = LoadingGuard::new(&self.view, &self.generation, generation);
        tracing::info!(
            symbol = %symbol,
            generation,
            start_date = ?range.start(),
            end_date = ?range.end(),
            "Loading chart data"
        );

        let result = self.api.chart_data(symbol, range).await;

        if self.is_stale(generation) {
            tracing::debug!(symbol = %symbol, generation, latest = self.generation.get(), "Discarding stale response");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(data) if data.ohlc.is_empty() => {
                tracing::warn!(symbol = %symbol, "No OHLC rows returned");
                self.view.borrow_mut().alert(&format!("No data found for {}", symbol));
                LoadOutcome::Empty
            }
            Ok(data) => {
                let bars = data.ohlc.len();
                self.render(data);
                tracing::info!(symbol = %symbol, bars, "Chart updated");
                LoadOutcome::Rendered { bars }
            }
            Err(e) => {
                tracing::error!(symbol = %symbol, error = %e, "Error loading data");
                self.view.borrow_mut().alert(&format!("Error loading data for {}", symbol));
                LoadOutcome::Failed
            }
        }
    }

    fn render(&self, data: ChartData) {
        let ChartData {
            mut ohlc,
            volume,
            vwap,
            ema,
            mut markers,
            trades,
        } = data;
        sort_by_time(&mut ohlc);
        sort_by_time(&mut markers);

        {
            let mut chart = self.chart.borrow_mut();
            chart.set_candles(ohlc);
            chart.set_volume(volume);
            chart.set_vwap(vwap);
            chart.set_ema(ema);
            chart.set_markers(markers);
            chart.fit_content();
        }
        self.view.borrow_mut().show_trades(trades);
    }

    /// Single entry point for control events.
    pub async fn handle(&self, event: UiEvent) -> Option<LoadOutcome> {
        match event {
            UiEvent::LoadClicked => {
                let selected = self.view.borrow().selected_symbol();
                let Some(symbol) = selected else {
                    self.view.borrow_mut().alert("Please select a symbol");
                    return None;
                };
                Some(self.load_selected(&symbol).await)
            }
            UiEvent::SymbolChanged | UiEvent::DateChanged => {
                let symbol = self.view.borrow().selected_symbol()?;
                Some(self.load_selected(&symbol).await)
            }
            UiEvent::Crosshair(crosshair) => {
                self.on_crosshair_move(&crosshair);
                None
            }
            UiEvent::Resized(resize) => {
                self.on_resize(&resize);
                None
            }
        }
    }

    async fn load_selected(&self, symbol: &str) -> LoadOutcome {
        let range = self.view.borrow().date_range();
        self.load_data(symbol, &range).await
    }

    pub fn on_crosshair_move(&self, event: &CrosshairEvent) {
        match self.legend_for(event) {
            Some(content) => self.view.borrow_mut().show_legend(content),
            None => match self.settings.legend_policy {
                LegendPolicy::Hide => self.view.borrow_mut().hide_legend(),
                LegendPolicy::Keep => {}
            },
        }
    }

    fn legend_for(&self, event: &CrosshairEvent) -> Option<LegendContent> {
        let point = event.point?;
        let time = event.time?;

        let chart = self.chart.borrow();
        let (width, height) = chart.plot_area();
        if point.x < 0.0 || point.y < 0.0 || point.x > width || point.y > height {
            return None;
        }
        let bar = chart.bar_at(time)?;
        let volume = chart.volume_at(time);
        let sep = self.settings.thousand_separator.as_str();

        Some(LegendContent {
            symbol: self.view.borrow().selected_symbol().unwrap_or_default(),
            open: format_price(bar.open),
            high: format_price(bar.high),
            low: format_price(bar.low),
            close: format_price(bar.close),
            volume: format_volume(volume, sep),
            time: format_timestamp(bar.time, &self.settings.date_time_format),
        })
    }

    /// Forwards container resizes to the chart. Returns whether the event
    /// targeted the chart container.
    pub fn on_resize(&self, event: &ResizeEvent) -> bool {
        if event.target != dom_ids::CHART_CONTAINER {
            return false;
        }
        tracing::trace!(width = event.width, height = event.height, "Chart container resized");
        self.chart.borrow_mut().resize(event.width, event.height);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::model::{PRICE_AXIS_WIDTH, TIME_AXIS_HEIGHT};
    use crate::chart::{SeriesKind, SeriesSpec};
    use crate::error::ApiError;
    use async_trait::async_trait;
    use shared::models::{Bar, Marker, MarkerPosition, MarkerShape, Timestamp, TradeRecord, ValuePoint, VolumePoint};
    use shared::utils::is_sorted_by_time;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    // --- scripted backend ---------------------------------------------------

    #[derive(Clone)]
    enum Reply<T> {
        Ok(T),
        Status(u16),
    }

    impl<T: Clone> Reply<T> {
        fn into_result(self, url: &str) -> Result<T, ApiError> {
            match self {
                Reply::Ok(value) => Ok(value),
                Reply::Status(status) => Err(ApiError::Status {
                    status,
                    url: url.to_string(),
                }),
            }
        }
    }

    struct ScriptedApi {
        symbols: Reply<Vec<String>>,
        data: HashMap<String, Reply<ChartData>>,
        gates: HashMap<String, Arc<Notify>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedApi {
        fn new(symbols: &[&str]) -> Self {
            Self {
                symbols: Reply::Ok(symbols.iter().map(|s| s.to_string()).collect()),
                data: HashMap::new(),
                gates: HashMap::new(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn symbols_status(mut self, status: u16) -> Self {
            self.symbols = Reply::Status(status);
            self
        }

        fn data(mut self, symbol: &str, data: ChartData) -> Self {
            self.data.insert(symbol.to_string(), Reply::Ok(data));
            self
        }

        fn data_status(mut self, symbol: &str, status: u16) -> Self {
            self.data.insert(symbol.to_string(), Reply::Status(status));
            self
        }

        /// Holds the response for `symbol` until the returned handle is notified.
        fn gate(&mut self, symbol: &str) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.gates.insert(symbol.to_string(), gate.clone());
            gate
        }

        fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
            self.calls.clone()
        }
    }

    #[async_trait]
    impl MarketApi for ScriptedApi {
        async fn symbols(&self) -> Result<Vec<String>, ApiError> {
            self.calls.lock().unwrap().push("/symbols".to_string());
            self.symbols.clone().into_result("/symbols")
        }

        async fn chart_data(&self, symbol: &str, range: &DateRange) -> Result<ChartData, ApiError> {
            let mut call = format!("/data/{}", symbol);
            let query: Vec<String> = range.query_pairs().iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            if !query.is_empty() {
                call = format!("{}?{}", call, query.join("&"));
            }
            self.calls.lock().unwrap().push(call.clone());

            let gate = self.gates.get(symbol).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.data
                .get(symbol)
                .cloned()
                .unwrap_or(Reply::Status(404))
                .into_result(&call)
        }
    }

    // --- recording chart ----------------------------------------------------

    #[derive(Default)]
    struct RecordingChart {
        series: Vec<SeriesKind>,
        candles: Vec<Bar>,
        volume: Vec<VolumePoint>,
        vwap: Vec<ValuePoint>,
        ema: Vec<ValuePoint>,
        markers: Vec<Marker>,
        set_calls: usize,
        fits: usize,
        size: (f64, f64),
        resizes: Vec<(f64, f64)>,
    }

    impl ChartSurface for RecordingChart {
        fn add_series(&mut self, spec: &SeriesSpec) -> Result<(), BootstrapError> {
            self.series.push(spec.kind);
            Ok(())
        }

        fn set_candles(&mut self, bars: Vec<Bar>) {
            self.set_calls += 1;
            self.candles = bars;
        }

        fn set_volume(&mut self, points: Vec<VolumePoint>) {
            self.set_calls += 1;
            self.volume = points;
        }

        fn set_vwap(&mut self, points: Vec<ValuePoint>) {
            self.set_calls += 1;
            self.vwap = points;
        }

        fn set_ema(&mut self, points: Vec<ValuePoint>) {
            self.set_calls += 1;
            self.ema = points;
        }

        fn set_markers(&mut self, markers: Vec<Marker>) {
            self.set_calls += 1;
            self.markers = markers;
        }

        fn fit_content(&mut self) {
            self.fits += 1;
        }

        fn resize(&mut self, width: f64, height: f64) {
            self.size = (width, height);
            self.resizes.push((width, height));
        }

        fn size(&self) -> (f64, f64) {
            self.size
        }

        fn plot_area(&self) -> (f64, f64) {
            (self.size.0 - PRICE_AXIS_WIDTH, self.size.1 - TIME_AXIS_HEIGHT)
        }

        fn bar_at(&self, time: Timestamp) -> Option<Bar> {
            self.candles.iter().find(|b| b.time == time).copied()
        }

        fn volume_at(&self, time: Timestamp) -> Option<f64> {
            self.volume.iter().find(|p| p.time == time).map(|p| p.value)
        }
    }

    struct RecordingFactory {
        fail: bool,
    }

    impl ChartFactory for RecordingFactory {
        type Surface = RecordingChart;

        fn create(&self, options: &ChartOptions) -> Result<RecordingChart, BootstrapError> {
            if self.fail {
                return Err(BootstrapError::ChartUnavailable(options.chart_type.clone()));
            }
            Ok(RecordingChart {
                size: (options.width, options.height),
                ..Default::default()
            })
        }
    }

    // --- recording view -----------------------------------------------------

    #[derive(Default)]
    struct RecordingView {
        selector: SelectorState,
        selector_history: Vec<SelectorStatus>,
        range: DateRange,
        loading: bool,
        loading_shown: usize,
        loading_hidden: usize,
        legend: Option<LegendContent>,
        legend_hides: usize,
        trades: Vec<TradeRecord>,
        alerts: Vec<String>,
    }

    impl ControlView for RecordingView {
        fn selected_symbol(&self) -> Option<String> {
            self.selector.selected.clone()
        }

        fn date_range(&self) -> DateRange {
            self.range.clone()
        }

        fn show_symbols_loading(&mut self) {
            self.selector = SelectorState::loading();
            self.selector_history.push(self.selector.status);
        }

        fn populate_symbols(&mut self, symbols: &[String]) {
            self.selector = SelectorState::ready(symbols);
            self.selector_history.push(self.selector.status);
        }

        fn show_symbols_error(&mut self) {
            self.selector = SelectorState::error();
            self.selector_history.push(self.selector.status);
        }

        fn set_loading(&mut self, visible: bool) {
            self.loading = visible;
            if visible {
                self.loading_shown += 1;
            } else {
                self.loading_hidden += 1;
            }
        }

        fn show_legend(&mut self, content: LegendContent) {
            self.legend = Some(content);
        }

        fn hide_legend(&mut self) {
            self.legend = None;
            self.legend_hides += 1;
        }

        fn show_trades(&mut self, trades: Vec<TradeRecord>) {
            self.trades = trades;
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    // --- helpers ------------------------------------------------------------

    type TestController = ChartController<ScriptedApi, RecordingChart, RecordingView>;

    fn options() -> ChartOptions {
        let config = AppConfig::load_default().unwrap();
        ChartOptions::from_config(&config.chart, 800.0, 600.0)
    }

    fn controller_with(api: ScriptedApi, settings: ControllerSettings) -> TestController {
        ChartController::bootstrap(
            api,
            &RecordingFactory { fail: false },
            &options(),
            RecordingView::default(),
            settings,
        )
        .unwrap()
    }

    fn manual_settings() -> ControllerSettings {
        ControllerSettings {
            auto_load_first_symbol: false,
            ..ControllerSettings::default()
        }
    }

    fn bars(times: &[Timestamp]) -> Vec<Bar> {
        times
            .iter()
            .map(|&t| Bar::new(t, t as f64, t as f64 + 1.0, t as f64 - 1.0, t as f64 + 0.5))
            .collect()
    }

    fn marker(time: Timestamp) -> Marker {
        Marker {
            time,
            position: MarkerPosition::BelowBar,
            color: Some("#2196F3".to_string()),
            shape: MarkerShape::ArrowUp,
            text: format!("Buy @ {}", time),
        }
    }

    fn chart_data(times: &[Timestamp]) -> ChartData {
        ChartData {
            ohlc: bars(times),
            volume: times
                .iter()
                .map(|&t| VolumePoint { time: t, value: 1234567.0, color: None })
                .collect(),
            vwap: times.iter().map(|&t| ValuePoint { time: t, value: 1.0 }).collect(),
            ema: times.iter().map(|&t| ValuePoint { time: t, value: 2.0 }).collect(),
            markers: Vec::new(),
            trades: Vec::new(),
        }
    }

    fn times(bars: &[Bar]) -> Vec<Timestamp> {
        bars.iter().map(|b| b.time).collect()
    }

    // --- bootstrap ----------------------------------------------------------

    #[test]
    fn bootstrap_creates_series_in_fixed_order() {
        let controller = controller_with(ScriptedApi::new(&[]), ControllerSettings::default());
        assert_eq!(controller.chart().series, SeriesKind::ALL.to_vec());
        assert_eq!(controller.chart().size(), (800.0, 600.0));
    }

    #[test]
    fn bootstrap_failure_alerts_and_aborts() {
        struct AlertSink(Arc<Mutex<Vec<String>>>);
        impl ControlView for AlertSink {
            fn selected_symbol(&self) -> Option<String> {
                None
            }
            fn date_range(&self) -> DateRange {
                DateRange::default()
            }
            fn show_symbols_loading(&mut self) {}
            fn populate_symbols(&mut self, _: &[String]) {}
            fn show_symbols_error(&mut self) {}
            fn set_loading(&mut self, _: bool) {}
            fn show_legend(&mut self, _: LegendContent) {}
            fn hide_legend(&mut self) {}
            fn show_trades(&mut self, _: Vec<TradeRecord>) {}
            fn alert(&mut self, message: &str) {
                self.0.lock().unwrap().push(message.to_string());
            }
        }

        let alerts = Arc::new(Mutex::new(Vec::new()));
        let api = ScriptedApi::new(&["AAPL"]);
        let calls = api.call_log();
        let result = ChartController::bootstrap(
            api,
            &RecordingFactory { fail: true },
            &options(),
            AlertSink(alerts.clone()),
            ControllerSettings::default(),
        );

        assert!(matches!(result, Err(BootstrapError::ChartUnavailable(_))));
        let alerts = alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Error initializing chart"));
        assert!(calls.lock().unwrap().is_empty());
    }

    // --- symbols ------------------------------------------------------------

    #[tokio::test]
    async fn symbols_populate_selector_in_order_with_first_selected() {
        let api = ScriptedApi::new(&["AAPL", "MSFT"]);
        let calls = api.call_log();
        let controller = controller_with(api, manual_settings());

        let outcome = controller.init_symbols().await;

        assert_eq!(outcome, SymbolsOutcome::Loaded { count: 2, first_load: None });
        let view = controller.view();
        assert_eq!(view.selector.labels(), vec!["Select a symbol", "AAPL", "MSFT"]);
        assert_eq!(view.selector.selected.as_deref(), Some("AAPL"));
        assert!(!view.selector.is_disabled());
        assert_eq!(view.selector_history, vec![SelectorStatus::Loading, SelectorStatus::Ready]);
        assert_eq!(*calls.lock().unwrap(), vec!["/symbols".to_string()]);
    }

    #[tokio::test]
    async fn symbols_auto_load_first_symbol() {
        let api = ScriptedApi::new(&["AAPL", "MSFT"]).data("AAPL", chart_data(&[100, 200]));
        let calls = api.call_log();
        let controller = controller_with(api, ControllerSettings::default());

        let outcome = controller.init_symbols().await;

        assert_eq!(
            outcome,
            SymbolsOutcome::Loaded {
                count: 2,
                first_load: Some(LoadOutcome::Rendered { bars: 2 })
            }
        );
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["/symbols".to_string(), "/data/AAPL".to_string()]
        );
    }

    #[tokio::test]
    async fn symbols_failure_shows_error_and_skips_data_fetch() {
        let api = ScriptedApi::new(&["AAPL"]).symbols_status(500);
        let calls = api.call_log();
        let controller = controller_with(api, ControllerSettings::default());

        let outcome = controller.init_symbols().await;

        assert_eq!(outcome, SymbolsOutcome::Failed);
        let view = controller.view();
        assert_eq!(view.selector.status, SelectorStatus::Error);
        assert_eq!(view.selector.labels(), vec!["Error loading symbols"]);
        assert_eq!(view.alerts.len(), 1);
        assert!(view.alerts[0].starts_with("Error loading symbols:"));
        assert!(view.alerts[0].contains("500"));
        assert_eq!(*calls.lock().unwrap(), vec!["/symbols".to_string()]);
        assert_eq!(view.loading_shown, 0);
    }

    #[tokio::test]
    async fn empty_symbol_list_does_not_load() {
        let api = ScriptedApi::new(&[]);
        let calls = api.call_log();
        let controller = controller_with(api, ControllerSettings::default());

        let outcome = controller.init_symbols().await;

        assert_eq!(outcome, SymbolsOutcome::Loaded { count: 0, first_load: None });
        assert_eq!(controller.view().selector.selected, None);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    // --- data ---------------------------------------------------------------

    #[tokio::test]
    async fn candles_and_markers_are_sorted_before_rendering() {
        let mut data = chart_data(&[200, 100]);
        data.markers = vec![marker(300), marker(100), marker(200)];
        let api = ScriptedApi::new(&["AAPL"]).data("AAPL", data);
        let controller = controller_with(api, manual_settings());

        let outcome = controller.load_data("AAPL", &DateRange::default()).await;

        assert_eq!(outcome, LoadOutcome::Rendered { bars: 2 });
        let chart = controller.chart();
        assert_eq!(times(&chart.candles), vec![100, 200]);
        assert_eq!(chart.candles[0].open, Some(100.0));
        assert!(is_sorted_by_time(&chart.markers));
        assert_eq!(chart.markers.len(), 3);
        assert_eq!(chart.set_calls, 5);
        assert_eq!(chart.fits, 1);
        // Volume, VWAP and EMA are passed through in backend order.
        assert_eq!(chart.volume.iter().map(|p| p.time).collect::<Vec<_>>(), vec![200, 100]);
    }

    #[tokio::test]
    async fn date_range_is_forwarded_only_when_set() {
        let api = ScriptedApi::new(&["AAPL"]).data("AAPL", chart_data(&[100]));
        let calls = api.call_log();
        let controller = controller_with(api, manual_settings());

        controller.load_data("AAPL", &DateRange::default()).await;
        let range = DateRange {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some(String::new()),
        };
        controller.load_data("AAPL", &range).await;
        controller
            .load_data("AAPL", &DateRange::new("2024-01-01", "2024-01-31"))
            .await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "/data/AAPL".to_string(),
                "/data/AAPL?start_date=2024-01-01".to_string(),
                "/data/AAPL?start_date=2024-01-01&end_date=2024-01-31".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn empty_ohlc_alerts_without_touching_series() {
        let api = ScriptedApi::new(&["AAPL"]).data("AAPL", ChartData::default());
        let controller = controller_with(api, manual_settings());

        let outcome = controller.load_data("AAPL", &DateRange::default()).await;

        assert_eq!(outcome, LoadOutcome::Empty);
        assert_eq!(controller.chart().set_calls, 0);
        assert_eq!(controller.chart().fits, 0);
        let view = controller.view();
        assert_eq!(view.alerts, vec!["No data found for AAPL".to_string()]);
        assert!(!view.loading);
        assert_eq!(view.loading_hidden, 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_series() {
        let api = ScriptedApi::new(&["AAPL", "MSFT"])
            .data("AAPL", chart_data(&[100, 200, 300]))
            .data_status("MSFT", 500);
        let controller = controller_with(api, manual_settings());

        controller.load_data("AAPL", &DateRange::default()).await;
        let set_calls = controller.chart().set_calls;
        let outcome = controller.load_data("MSFT", &DateRange::default()).await;

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(controller.chart().set_calls, set_calls);
        assert_eq!(times(&controller.chart().candles), vec![100, 200, 300]);
        let view = controller.view();
        assert_eq!(view.alerts, vec!["Error loading data for MSFT".to_string()]);
        assert!(!view.loading);
        assert_eq!(view.loading_shown, 2);
        assert_eq!(view.loading_hidden, 2);
    }

    #[tokio::test]
    async fn failed_fetch_hides_loading_exactly_once() {
        let api = ScriptedApi::new(&["AAPL"]).data_status("AAPL", 502);
        let controller = controller_with(api, manual_settings());

        controller.load_data("AAPL", &DateRange::default()).await;

        let view = controller.view();
        assert_eq!(view.loading_shown, 1);
        assert_eq!(view.loading_hidden, 1);
        assert_eq!(controller.chart().set_calls, 0);
    }

    #[tokio::test]
    async fn trades_are_forwarded_to_view() {
        let mut data = chart_data(&[100]);
        data.trades = vec![TradeRecord {
            entry_time: Some("2024-01-02T10:00:00".to_string()),
            entry_price: Some(10.0),
            trade_type: Some("v_bottom".to_string()),
            exit_time: Some("2024-01-02T11:00:00".to_string()),
            exit_price: Some(10.5),
            exit_reason: Some("eod_1500".to_string()),
            pnl_pct: 5.0,
            bars_held: 30,
        }];
        let api = ScriptedApi::new(&["AAPL"]).data("AAPL", data);
        let controller = controller_with(api, manual_settings());

        controller.load_data("AAPL", &DateRange::default()).await;

        assert_eq!(controller.view().trades.len(), 1);
        assert_eq!(controller.view().trades[0].exit_reason.as_deref(), Some("eod_1500"));
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let mut api = ScriptedApi::new(&["AAPL", "MSFT"])
            .data("AAPL", chart_data(&[1, 2, 3]))
            .data("MSFT", chart_data(&[10, 20]));
        let gate = api.gate("AAPL");
        let controller = controller_with(api, manual_settings());
        let range = DateRange::default();

        let (slow, fast) = tokio::join!(controller.load_data("AAPL", &range), async {
            let outcome = controller.load_data("MSFT", &range).await;
            gate.notify_one();
            outcome
        });

        assert_eq!(slow, LoadOutcome::Superseded);
        assert_eq!(fast, LoadOutcome::Rendered { bars: 2 });
        assert_eq!(times(&controller.chart().candles), vec![10, 20]);
        let view = controller.view();
        assert!(view.alerts.is_empty());
        assert!(!view.loading);
        assert_eq!(view.loading_shown, 2);
        assert_eq!(view.loading_hidden, 1);
    }

    // --- event wiring -------------------------------------------------------

    #[tokio::test]
    async fn load_click_without_symbol_alerts() {
        let api = ScriptedApi::new(&["AAPL"]);
        let calls = api.call_log();
        let controller = controller_with(api, manual_settings());

        assert_eq!(controller.handle(UiEvent::LoadClicked).await, None);

        assert_eq!(controller.view().alerts, vec!["Please select a symbol".to_string()]);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn date_change_without_symbol_is_ignored() {
        let api = ScriptedApi::new(&["AAPL"]);
        let calls = api.call_log();
        let controller = controller_with(api, manual_settings());

        assert_eq!(controller.handle(UiEvent::DateChanged).await, None);
        assert_eq!(controller.handle(UiEvent::SymbolChanged).await, None);

        assert!(controller.view().alerts.is_empty());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn control_events_load_current_selection_and_dates() {
        let api = ScriptedApi::new(&["AAPL", "MSFT"])
            .data("AAPL", chart_data(&[100]))
            .data("MSFT", chart_data(&[100, 200]));
        let calls = api.call_log();
        let controller = controller_with(api, manual_settings());
        controller.init_symbols().await;

        controller.view.borrow_mut().selector.select("MSFT");
        let outcome = controller.handle(UiEvent::SymbolChanged).await;
        assert_eq!(outcome, Some(LoadOutcome::Rendered { bars: 2 }));

        controller.view.borrow_mut().range = DateRange::new("2024-01-01", "2024-01-05");
        controller.handle(UiEvent::DateChanged).await;
        controller.handle(UiEvent::LoadClicked).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                "/symbols".to_string(),
                "/data/MSFT".to_string(),
                "/data/MSFT?start_date=2024-01-01&end_date=2024-01-05".to_string(),
                "/data/MSFT?start_date=2024-01-01&end_date=2024-01-05".to_string(),
            ]
        );
    }

    // --- legend -------------------------------------------------------------

    async fn loaded_controller(policy: LegendPolicy) -> TestController {
        let mut data = chart_data(&[100, 200]);
        data.ohlc[1].open = None;
        let api = ScriptedApi::new(&["AAPL"]).data("AAPL", data);
        let controller = controller_with(
            api,
            ControllerSettings {
                auto_load_first_symbol: true,
                legend_policy: policy,
                ..ControllerSettings::default()
            },
        );
        controller.init_symbols().await;
        controller
    }

    #[tokio::test]
    async fn crosshair_over_bar_formats_legend() {
        let controller = loaded_controller(LegendPolicy::Hide).await;

        controller.on_crosshair_move(&CrosshairEvent::at(10.0, 10.0, Some(100)));

        let legend = controller.view().legend.clone().unwrap();
        assert_eq!(legend.symbol, "AAPL");
        assert_eq!(legend.open, "100.00");
        assert_eq!(legend.high, "101.00");
        assert_eq!(legend.low, "99.00");
        assert_eq!(legend.close, "100.50");
        assert_eq!(legend.volume, "1,234,567");
        assert_eq!(legend.time, format_timestamp(100, "%Y-%m-%d %H:%M:%S"));

        controller.on_crosshair_move(&CrosshairEvent::at(10.0, 10.0, Some(200)));
        assert_eq!(controller.view().legend.as_ref().unwrap().open, "-");
    }

    #[tokio::test]
    async fn crosshair_outside_hides_legend_under_hide_policy() {
        let controller = loaded_controller(LegendPolicy::Hide).await;
        controller.on_crosshair_move(&CrosshairEvent::at(10.0, 10.0, Some(100)));

        controller.on_crosshair_move(&CrosshairEvent::at(900.0, 10.0, Some(100)));
        assert!(controller.view().legend.is_none());

        controller.on_crosshair_move(&CrosshairEvent::at(10.0, 10.0, Some(100)));
        controller.on_crosshair_move(&CrosshairEvent::at(10.0, 10.0, Some(150)));
        assert!(controller.view().legend.is_none());

        controller.on_crosshair_move(&CrosshairEvent::left());
        assert_eq!(controller.view().legend_hides, 3);
    }

    #[tokio::test]
    async fn crosshair_over_axis_strips_hides_legend() {
        let controller = loaded_controller(LegendPolicy::Hide).await;
        let (plot_w, plot_h) = controller.chart().plot_area();

        controller.on_crosshair_move(&CrosshairEvent::at(10.0, plot_h - 1.0, Some(100)));
        assert!(controller.view().legend.is_some());

        // Inside the container but over the time axis.
        controller.on_crosshair_move(&CrosshairEvent::at(10.0, plot_h + 5.0, Some(100)));
        assert!(controller.view().legend.is_none());

        controller.on_crosshair_move(&CrosshairEvent::at(10.0, 10.0, Some(100)));
        // Inside the container but over the price axis.
        controller.on_crosshair_move(&CrosshairEvent::at(plot_w + 5.0, 10.0, Some(100)));
        assert!(controller.view().legend.is_none());
        assert_eq!(controller.view().legend_hides, 2);
    }

    #[tokio::test]
    async fn crosshair_outside_keeps_legend_under_keep_policy() {
        let controller = loaded_controller(LegendPolicy::Keep).await;
        controller.on_crosshair_move(&CrosshairEvent::at(10.0, 10.0, Some(100)));

        controller.handle(UiEvent::Crosshair(CrosshairEvent::left())).await;
        controller.on_crosshair_move(&CrosshairEvent::at(-1.0, 10.0, Some(100)));

        let view = controller.view();
        assert_eq!(view.legend.as_ref().map(|l| l.close.as_str()), Some("100.50"));
        assert_eq!(view.legend_hides, 0);
    }

    // --- resize -------------------------------------------------------------

    #[tokio::test]
    async fn resize_only_follows_chart_container() {
        let controller = controller_with(ScriptedApi::new(&[]), manual_settings());

        let other = ResizeEvent {
            target: "sidebar".to_string(),
            width: 10.0,
            height: 10.0,
        };
        assert!(!controller.on_resize(&other));

        let chart = ResizeEvent {
            target: dom_ids::CHART_CONTAINER.to_string(),
            width: 1024.0,
            height: 500.0,
        };
        assert!(controller.on_resize(&chart));
        controller.handle(UiEvent::Resized(chart)).await;

        assert_eq!(controller.chart().resizes, vec![(1024.0, 500.0), (1024.0, 500.0)]);
        assert_eq!(controller.chart().size(), (1024.0, 500.0));
    }
}
