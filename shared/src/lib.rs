// Data models and formatting helpers shared by the viewer crates.
pub mod models;
pub mod utils;
