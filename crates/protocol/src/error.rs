use thiserror::Error;

/// Failure of a single gateway call. Callers treat both kinds the same way:
/// the node state is unknown and no view may be updated from this call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn network(detail: impl std::fmt::Display) -> Self {
        Self::Network(detail.to_string())
    }

    pub fn parse(detail: impl std::fmt::Display) -> Self {
        Self::Parse(detail.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}
