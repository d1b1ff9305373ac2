// Floating OHLCV legend in the top-left corner of the chart.
#![allow(non_snake_case)]
use dioxus::prelude::*;

use crate::config::theme::ThemePalette;
use crate::controller::LegendContent;
use crate::dom_ids;

#[component]
pub fn Legend(legend: Signal<Option<LegendContent>>, palette: ThemePalette) -> Element {
    let Some(content) = legend.read().clone() else {
        return None;
    };

    rsx! {
        div {
            id: dom_ids::LEGEND,
            style: "position: absolute; top: 8px; left: 8px; z-index: 2; pointer-events: none; padding: 4px 8px; font-size: 12px; font-family: monospace; color: {palette.foreground}; background: {palette.panel}cc; border: 1px solid {palette.border}; border-radius: 3px;",
            strong { "{content.symbol}" }
            span { "  O " span { style: "color: {palette.bullish};", "{content.open}" } }
            span { "  H " span { style: "color: {palette.bullish};", "{content.high}" } }
            span { "  L " span { style: "color: {palette.bearish};", "{content.low}" } }
            span { "  C " span { style: "color: {palette.foreground};", "{content.close}" } }
            span { "  V " span { style: "color: {palette.muted};", "{content.volume}" } }
            div { style: "color: {palette.muted};", "{content.time}" }
        }
    }
}
