use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseStatsError {
    #[error("GitHub user not found: {0}")]
    UserNotFound(String),

    #[error("Rate limit exceeded: API quota exhausted")]
    RateLimited,

    #[error("GitHub API error: HTTP {0}")]
    ApiError(u16),

    #[error("Network error: {0}")]
    TransportError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid username: {0:?}")]
    InvalidUsername(String),
}

impl From<reqwest::Error> for ReleaseStatsError {
    fn from(err: reqwest::Error) -> Self {
        ReleaseStatsError::TransportError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReleaseStatsError>;
