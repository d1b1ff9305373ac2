#![allow(non_snake_case)]
use dioxus::prelude::*;

use crate::chart::{ChartModel, ChartOptions};
use crate::components::{CandlestickChart, Legend, Toolbar, TradeTable};
use crate::config::theme::ThemePalette;
use crate::config::AppConfig;
use crate::controller::{ChartController, ControllerSettings};
use crate::services::HttpMarketClient;
use crate::state::{use_signal_view, ControllerHandle, SignalView, SvgChartFactory};

fn initial_options(config: &AppConfig) -> ChartOptions {
    ChartOptions::from_config(&config.chart, config.app.width as f64, config.app.height as f64)
}

/// Wires the backend client, the SVG chart and the control signals into one
/// controller. Errors are already logged (and alerted, for chart failures).
fn start_controller(
    config: &AppConfig,
    view: SignalView,
    model: Signal<ChartModel>,
) -> Result<ControllerHandle, String> {
    let api = HttpMarketClient::new(&config.backend).map_err(|e| {
        tracing::error!(error = %e, base_url = %config.backend.base_url, "Could not create backend client");
        e.to_string()
    })?;
    let controller = ChartController::bootstrap(
        api,
        &SvgChartFactory { model },
        &initial_options(config),
        view,
        ControllerSettings::from_config(config),
    )
    .map_err(|e| e.to_string())?;
    Ok(ControllerHandle::new(controller))
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let palette = use_hook(|| ThemePalette::from_chart(&config.chart));
    let view = use_signal_view();
    let model = use_signal(|| ChartModel::new(initial_options(&config)));
    let controller = use_hook(|| start_controller(&config, view, model));

    use_hook(|| {
        if let Ok(handle) = controller.clone() {
            spawn(async move {
                handle.init_symbols().await;
            });
        }
    });

    match controller {
        Ok(handle) => rsx! {
            div {
                style: "display: flex; flex-direction: column; height: 100vh; margin: 0; background: {palette.background}; color: {palette.foreground}; font-family: sans-serif;",
                Toolbar { controller: handle.clone(), view, palette: palette.clone() }
                CandlestickChart {
                    controller: handle.clone(),
                    model,
                    palette: palette.clone(),
                    Legend { legend: view.legend, palette: palette.clone() }
                }
                TradeTable { trades: view.trades, palette: palette.clone() }
            }
        },
        Err(message) => rsx! {
            div {
                style: "padding: 24px; background: {palette.background}; color: {palette.bearish}; font-family: sans-serif; height: 100vh;",
                h3 { "Chart could not be started" }
                p { "{message}" }
            }
        },
    }
}
