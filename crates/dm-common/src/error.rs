use std::time::Duration;

use thiserror::Error;

/// Errors that abort a match. A match yields either a probability or one of these.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("degenerate weights: min score {min} equals max score {max}")]
    DegenerateWeights { min: i64, max: i64 },
    #[error("reference contains no words")]
    EmptyReference,
    #[error("failed to build phrase pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("unparseable content type {value:?}")]
    ContentType { value: String },
    #[error("html to text conversion failed: {0}")]
    HtmlToText(#[from] html2text::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http client init failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("page unavailable: {0}")]
    Unavailable(String),
}

/// Rejected environment or command-line configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown test {0:?}")]
    UnknownTest(String),
    #[error("invalid weight for {key}: {value:?}")]
    InvalidWeight { key: String, value: String },
    #[error("invalid fetch timeout: {0:?}")]
    InvalidTimeout(String),
}
