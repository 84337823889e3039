use thiserror::Error;

/// Fatal errors: anything that aborts a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Why a single item has no price this run. Never fatal; the item is left out
/// of the report.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("response has no lowest_price")]
    MissingPrice,

    #[error("malformed price string {0:?}")]
    MalformedPrice(String),

    #[error("unreadable response body: {0}")]
    Body(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
