use thiserror::Error;

use crate::schema::CityRecord;

/// Whether an error may go away when the same request is sent again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fatal,
    Retryable,
}

#[derive(Debug, Error)]
pub enum Error {
    /// `statusCode` 403.
    #[error("Bad API-KEY.")]
    Auth,

    /// `statusCode` 404.
    #[error("The requested URL was not found on this server.")]
    NotFound,

    /// `statusCode` 429.
    #[error("Too Many Requests. Try a longer wait time.")]
    RateLimit,

    /// Any other `statusCode`.
    #[error("Unexpected error: statusCode {status_code}{}", .message.as_ref().map(|m| format!(" ({m})")).unwrap_or_default())]
    Unexpected {
        status_code: String,
        message: Option<String>,
    },

    /// Neither `statusCode` nor `result` in the response body.
    #[error("No value response was returned. Try with a longer wait time.")]
    EmptyResult,

    #[error("Invalid city code: '{0}'")]
    InvalidCityCode(String),

    #[error("City code {0} is beyond every region boundary")]
    Unclassified(u32),

    #[error("Unknown prefecture code: {0}")]
    UnknownPrefecture(u8),

    #[error("Retried {attempts} times but couldn't recover: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// A prefecture failed. `partial` holds the records of every prefecture before it.
    #[error("Stopped at prefecture {prefecture_code} with {} cities collected: {source}", .partial.len())]
    Interrupted {
        prefecture_code: u8,
        partial: Vec<CityRecord>,
        #[source]
        source: Box<Error>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RateLimit | Error::EmptyResult => ErrorKind::Retryable,
            _ => ErrorKind::Fatal,
        }
    }

    pub fn is_retriable(&self) -> bool {
        self.kind() == ErrorKind::Retryable
    }

    /// Records collected before the failure, if the error came out of a collection run.
    pub fn partial_records(&self) -> Option<&[CityRecord]> {
        match self {
            Error::Interrupted { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// The innermost error, looking through retry and interruption wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::RetriesExhausted { source, .. } | Error::Interrupted { source, .. } => {
                source.root()
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
