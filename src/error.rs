use thiserror::Error;

/// Failure taxonomy for the collection pipeline. Per-record problems never
/// surface here; they degrade into no-value fields or skipped pages instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("no data: {0}")]
    EmptyResult(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
