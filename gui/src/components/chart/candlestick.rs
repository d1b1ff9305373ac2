// Candlestick chart rendering component
#![allow(non_snake_case)]
use dioxus::prelude::*;
use shared::models::MarkerShape;

use super::indicators::IndicatorOverlay;
use crate::chart::model::{LineGlyph, MarkerGlyph, PRICE_AXIS_WIDTH};
use crate::chart::{ChartModel, ChartSurface, SeriesKind};
use crate::config::theme::ThemePalette;
use crate::controller::{CrosshairEvent, Point, ResizeEvent, UiEvent};
use crate::dom_ids;
use crate::state::app_state::resize_observer_script;
use crate::state::ControllerHandle;

const TIME_TICKS: usize = 8;
const PRICE_TICKS: usize = 6;

/// Feeds every size change of the chart container to the controller,
/// including layout changes that are not window resizes.
async fn observe_container(controller: ControllerHandle) {
    let mut observer = eval(&resize_observer_script(dom_ids::CHART_CONTAINER));
    loop {
        match observer.recv().await {
            Ok(message) => match ResizeEvent::from_observer(message) {
                Ok(event) => {
                    controller.handle(UiEvent::Resized(event)).await;
                }
                Err(e) => tracing::warn!(error = %e, "Malformed chart container size"),
            },
            Err(e) => {
                tracing::warn!(error = ?e, "Chart container observer stopped");
                break;
            }
        }
    }
}

#[component]
pub fn CandlestickChart(
    controller: ControllerHandle,
    model: Signal<ChartModel>,
    palette: ThemePalette,
    children: Element,
) -> Element {
    let mut crosshair = use_signal(|| None::<Point>);

    let chart = model.read();
    let options = chart.options();
    let (width, height) = chart.size();
    let plot_w = chart.plot_width();
    let plot_h = chart.plot_height();
    let has_data = chart.has_data();
    let background = options.background.clone();
    let text_color = options.text_color.clone();
    let grid_color = options.grid_color.clone();
    let crosshair_color = options.crosshair_color.clone();
    let candles = chart.candle_glyphs();
    let volumes = chart.volume_glyphs();
    let lines: Vec<LineGlyph> = [SeriesKind::Vwap, SeriesKind::Ema]
        .into_iter()
        .filter_map(|kind| chart.line_glyph(kind))
        .collect();
    let markers: Vec<(MarkerGlyph, String)> = chart
        .marker_glyphs()
        .into_iter()
        .map(|marker| {
            let outline = marker.polygon_points();
            (marker, outline)
        })
        .collect();
    let time_ticks = chart.time_ticks(TIME_TICKS);
    let price_ticks: Vec<(f64, f64, String)> = chart
        .price_ticks(PRICE_TICKS)
        .into_iter()
        .map(|tick| (tick.position, tick.position + 4.0, tick.label))
        .collect();
    drop(chart);

    let cross = crosshair().filter(|p| has_data && p.x <= plot_w && p.y <= plot_h);
    let axis_x = plot_w + 6.0;
    let time_label_y = plot_h + 17.0;
    let (center_x, center_y) = (plot_w / 2.0, plot_h / 2.0);

    let mount_controller = controller.clone();
    let move_controller = controller.clone();
    let leave_controller = controller;

    rsx! {
        div {
            id: dom_ids::CHART_CONTAINER,
            style: "position: relative; flex: 1; min-height: 0; overflow: hidden; background: {background};",
            onmounted: move |_| {
                spawn(observe_container(mount_controller.clone()));
            },
            svg {
                width: "{width}",
                height: "{height}",
                style: "display: block; font-family: sans-serif;",
                // Grid and axes
                for (i, (y, label_y, label)) in price_ticks.iter().enumerate() {
                    g {
                        key: "p{i}",
                        line { x1: "0", y1: "{y}", x2: "{plot_w}", y2: "{y}", stroke: "{grid_color}", stroke_width: "1" }
                        text { x: "{axis_x}", y: "{label_y}", fill: "{text_color}", font_size: "11", "{label}" }
                    }
                }
                for (i, tick) in time_ticks.iter().enumerate() {
                    g {
                        key: "t{i}",
                        line { x1: "{tick.position}", y1: "0", x2: "{tick.position}", y2: "{plot_h}", stroke: "{grid_color}", stroke_width: "1" }
                        text { x: "{tick.position}", y: "{time_label_y}", fill: "{text_color}", font_size: "11", text_anchor: "middle", "{tick.label}" }
                    }
                }
                line { x1: "{plot_w}", y1: "0", x2: "{plot_w}", y2: "{plot_h}", stroke: "{grid_color}", stroke_width: "1" }
                line { x1: "0", y1: "{plot_h}", x2: "{plot_w}", y2: "{plot_h}", stroke: "{grid_color}", stroke_width: "1" }

                // Volume histogram
                g {
                    class: "volume",
                    opacity: "0.5",
                    for (i, bar) in volumes.iter().enumerate() {
                        rect { key: "v{i}", x: "{bar.x}", y: "{bar.y}", width: "{bar.width}", height: "{bar.height}", fill: "{bar.color}" }
                    }
                }

                // Candles
                g {
                    class: "candles",
                    for (i, candle) in candles.iter().enumerate() {
                        g {
                            key: "c{i}",
                            line { x1: "{candle.x}", y1: "{candle.wick_top}", x2: "{candle.x}", y2: "{candle.wick_bottom}", stroke: "{candle.color}", stroke_width: "1" }
                            rect { x: "{candle.body_left}", y: "{candle.body_top}", width: "{candle.body_width}", height: "{candle.body_height}", fill: "{candle.color}" }
                        }
                    }
                }

                IndicatorOverlay { lines }

                // Trade markers
                g {
                    class: "markers",
                    for (i, (marker, outline)) in markers.iter().enumerate() {
                        g {
                            key: "m{i}",
                            if marker.shape == MarkerShape::Circle {
                                circle { cx: "{marker.x}", cy: "{marker.y}", r: "5", fill: "{marker.color}" }
                            } else {
                                polygon { points: "{outline}", fill: "{marker.color}" }
                            }
                            text { x: "{marker.x}", y: "{marker.text_y}", fill: "{marker.color}", font_size: "10", text_anchor: "middle", "{marker.text}" }
                        }
                    }
                }

                if let Some(point) = cross {
                    g {
                        class: "crosshair",
                        line { x1: "{point.x}", y1: "0", x2: "{point.x}", y2: "{plot_h}", stroke: "{crosshair_color}", stroke_width: "1", stroke_dasharray: "4 4" }
                        line { x1: "0", y1: "{point.y}", x2: "{plot_w}", y2: "{point.y}", stroke: "{crosshair_color}", stroke_width: "1", stroke_dasharray: "4 4" }
                    }
                }

                if !has_data {
                    text {
                        x: "{center_x}",
                        y: "{center_y}",
                        fill: "{palette.muted}",
                        font_size: "14",
                        text_anchor: "middle",
                        "Select a symbol to load data"
                    }
                }
            }
            // Pointer capture layer; offsets are relative to the container.
            div {
                style: "position: absolute; inset: 0 {PRICE_AXIS_WIDTH}px 0 0; cursor: crosshair;",
                onmousemove: move |evt: MouseEvent| {
                    let coords = evt.element_coordinates();
                    let time = model.peek().time_at_x(coords.x);
                    crosshair.set(Some(Point { x: coords.x, y: coords.y }));
                    move_controller.dispatch(UiEvent::Crosshair(CrosshairEvent::at(coords.x, coords.y, time)));
                },
                onmouseleave: move |_| {
                    crosshair.set(None);
                    leave_controller.dispatch(UiEvent::Crosshair(CrosshairEvent::left()));
                },
            }
            {children}
        }
    }
}
