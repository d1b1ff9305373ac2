// Formatting and ordering helpers shared by the controller and the chart
// components.

use chrono::{Local, TimeZone};
use std::fmt::Display;

use crate::models::{Timed, Timestamp, TradeRecord};

pub const MISSING: &str = "-";

/// Stable ascending sort on the time axis.
pub fn sort_by_time<T: Timed>(items: &mut [T]) {
    items.sort_by_key(|item| item.time());
}

pub fn is_sorted_by_time<T: Timed>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0].time() <= w[1].time())
}

/// Two decimals, or a dash when the value is missing.
pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => MISSING.to_string(),
    }
}

/// Locale-style number: grouped integer part, at most three fraction digits
/// with trailing zeros dropped (`1234567.5` -> `1,234,567.5`).
pub fn format_grouped(value: f64, thousand_separator: &str) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * thousand_separator.len());
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(thousand_separator);
        }
        grouped.push(*ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn format_volume(value: Option<f64>, thousand_separator: &str) -> String {
    match value {
        Some(v) => format_grouped(v, thousand_separator),
        None => MISSING.to_string(),
    }
}

/// Epoch seconds rendered in the given time zone.
pub fn format_timestamp_in<Tz>(tz: &Tz, time: Timestamp, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_opt(time, 0).single() {
        Some(dt) => dt.format(pattern).to_string(),
        None => MISSING.to_string(),
    }
}

/// Epoch seconds rendered as a local date-time string.
pub fn format_timestamp(time: Timestamp, pattern: &str) -> String {
    format_timestamp_in(&Local, time, pattern)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeSummary {
    pub total: usize,
    pub winners: usize,
    pub losers: usize,
    pub win_rate_pct: f64,
    pub avg_pnl_pct: f64,
}

pub fn summarize_trades(trades: &[TradeRecord]) -> TradeSummary {
    if trades.is_empty() {
        return TradeSummary::default();
    }
    let total = trades.len();
    let winners = trades.iter().filter(|t| t.pnl_pct > 0.0).count();
    let losers = trades.iter().filter(|t| t.pnl_pct < 0.0).count();
    let pnl_sum: f64 = trades.iter().map(|t| t.pnl_pct).sum();
    TradeSummary {
        total,
        winners,
        losers,
        win_rate_pct: winners as f64 / total as f64 * 100.0,
        avg_pnl_pct: pnl_sum / total as f64,
    }
}
