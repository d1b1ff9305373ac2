use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("HTTP error! status: {status} ({url})")]
    Status { status: u16, url: String },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Malformed response body: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },
}

/// Failures that prevent the chart from being created at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BootstrapError {
    #[error("Chart renderer unavailable: {0}")]
    ChartUnavailable(String),

    #[error("Invalid chart options: {0}")]
    InvalidOptions(String),
}
