// VWAP and EMA lines drawn over the candles.
#![allow(non_snake_case)]
use dioxus::prelude::*;

use crate::chart::model::LineGlyph;

#[component]
pub fn IndicatorOverlay(lines: Vec<LineGlyph>) -> Element {
    if lines.is_empty() {
        return None;
    }

    let polylines = lines.into_iter().map(|line| {
        rsx! {
            polyline {
                key: "{line.title}",
                points: "{line.points}",
                fill: "none",
                stroke: "{line.color}",
                stroke_width: "{line.width}",
                stroke_linejoin: "round",
            }
        }
    });

    rsx! {
        g {
            class: "indicator-overlay-group",
            {polylines}
        }
    }
}
