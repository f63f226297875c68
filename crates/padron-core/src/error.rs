//! Error types for Padrón

use std::time::Duration;
use thiserror::Error;

/// Message used when the service declines a request without saying why
pub const APPLICATION_FALLBACK: &str = "Failed to fetch data";

/// Message used when a transport error carries no description
pub const TRANSPORT_FALLBACK: &str = "An unknown error occurred";

#[derive(Debug, Error)]
pub enum PadronError {
    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Adapter errors
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(String),
}

pub type Result<T> = std::result::Result<T, PadronError>;

/// Why a demographics fetch did not produce a report.
///
/// Every variant renders to a human-readable message; the controller stores
/// that message verbatim in [`crate::RequestState::Failure`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The service answered but declined the request (e.g. unknown municipality)
    #[error("{0}")]
    Application(String),

    /// No usable response: network failure or a malformed body
    #[error("{0}")]
    Transport(String),

    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

impl FetchError {
    /// Application failure, substituting the fallback for a missing or blank message
    pub fn application(message: Option<impl Into<String>>) -> Self {
        Self::Application(non_blank(message).unwrap_or_else(|| APPLICATION_FALLBACK.to_string()))
    }

    /// Transport failure described by the underlying error
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(non_blank(Some(err.to_string())).unwrap_or_else(|| TRANSPORT_FALLBACK.to_string()))
    }
}

fn non_blank(message: Option<impl Into<String>>) -> Option<String> {
    message.map(Into::into).filter(|m| !m.trim().is_empty())
}
