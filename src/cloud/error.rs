//! Error taxonomy for the probe engine

use thiserror::Error;

/// Terminal failures of a probe call. Only targeted mode produces these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("cloud provider '{0}' not found")]
    ProviderNotFound(String),

    #[error("cloud provider '{0}' does not have a metadata endpoint exposed")]
    ProviderUnreachable(String),
}

/// Why a single check was left out of a result set. Never terminal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("could not build URL from '{0}'")]
    InvalidUrl(String),

    #[error("first hop to {url} returned no role name")]
    EmptyRole { url: String },

    #[error("chained request failed: {0}")]
    ChainedRequest(Box<CheckError>),
}

impl CheckError {
    pub(crate) fn request(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Request {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
