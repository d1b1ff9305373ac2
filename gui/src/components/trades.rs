// Trade list returned alongside the chart data, with a one-line summary.
#![allow(non_snake_case)]
use dioxus::prelude::*;
use shared::models::TradeRecord;
use shared::utils::{format_price, summarize_trades, MISSING};

use crate::config::theme::ThemePalette;

fn text_or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

#[component]
pub fn TradeTable(trades: Signal<Vec<TradeRecord>>, palette: ThemePalette) -> Element {
    let trades = trades.read().clone();
    if trades.is_empty() {
        return None;
    }
    let summary = summarize_trades(&trades);
    let win_rate = format!("{:.1}", summary.win_rate_pct);
    let avg_pnl = format!("{:+.2}", summary.avg_pnl_pct);
    let avg_color = palette.pnl_color(summary.avg_pnl_pct).to_string();

    let rows = trades.iter().enumerate().map(|(i, trade)| {
        let pnl = format!("{:+.2}%", trade.pnl_pct);
        let pnl_color = palette.pnl_color(trade.pnl_pct).to_string();
        let entry_price = format_price(trade.entry_price);
        let exit_price = format_price(trade.exit_price);
        let entry_time = text_or_missing(&trade.entry_time);
        let trade_type = text_or_missing(&trade.trade_type);
        let exit_time = text_or_missing(&trade.exit_time);
        let exit_reason = text_or_missing(&trade.exit_reason);
        rsx! {
            tr {
                key: "{i}",
                td { "{entry_time}" }
                td { "{trade_type}" }
                td { "{entry_price}" }
                td { "{exit_time}" }
                td { "{exit_price}" }
                td { "{exit_reason}" }
                td { style: "color: {pnl_color};", "{pnl}" }
                td { "{trade.bars_held}" }
            }
        }
    });

    rsx! {
        div {
            class: "trades",
            style: "max-height: 200px; overflow-y: auto; font-size: 12px; color: {palette.foreground}; background: {palette.panel}; border-top: 1px solid {palette.border};",
            div {
                style: "padding: 4px 12px;",
                "Trades: {summary.total}  Winners: {summary.winners}  Losers: {summary.losers}  Win rate: {win_rate}%  Avg P&L: "
                span { style: "color: {avg_color};", "{avg_pnl}%" }
            }
            table {
                style: "width: 100%; border-collapse: collapse;",
                thead {
                    tr {
                        style: "color: {palette.muted}; text-align: left;",
                        th { "Entry" }
                        th { "Type" }
                        th { "Entry price" }
                        th { "Exit" }
                        th { "Exit price" }
                        th { "Reason" }
                        th { "P&L" }
                        th { "Bars" }
                    }
                }
                tbody { {rows} }
            }
        }
    }
}
