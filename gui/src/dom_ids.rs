// Element ids the viewer's markup and event wiring agree on.
pub const SYMBOL_SELECT: &str = "symbolSelect";
pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";
pub const LOAD_BUTTON: &str = "loadBtn";
pub const LOADING_INDICATOR: &str = "loading";
pub const CHART_CONTAINER: &str = "chart";
pub const LEGEND: &str = "legend";
