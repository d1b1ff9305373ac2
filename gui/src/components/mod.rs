// GUI components module
pub mod chart;
pub mod legend;
pub mod toolbar;
pub mod trades;

pub use chart::CandlestickChart;
pub use legend::Legend;
pub use toolbar::Toolbar;
pub use trades::TradeTable;
