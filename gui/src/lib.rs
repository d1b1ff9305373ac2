// Desktop candlestick viewer for the backtest visualizer backend.
pub mod app;
pub mod chart;
pub mod components;
pub mod config;
pub mod controller;
pub mod dom_ids;
pub mod error;
pub mod services;
pub mod state;
