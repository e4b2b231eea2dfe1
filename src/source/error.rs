//! Error type shared by every feed adapter.

use thiserror::Error;

/// Why a feed could not produce a record.
///
/// Two kinds exist: transport failures (network, DNS, non-success HTTP
/// status) and parse failures (the body was not the JSON shape the adapter
/// expects).  Neither is fatal to the dashboard; the controller only ever
/// sees a present or absent slot.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Stored without its request URL, which carries the API key.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response shape: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn parse(msg: impl Into<String>) -> Self {
        FetchError::Parse(msg.into())
    }

    /// `true` for network and HTTP-status failures, `false` for shape errors.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
