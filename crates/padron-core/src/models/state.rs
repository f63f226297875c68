use serde::Serialize;

use super::Report;

/// Lifecycle of the most recent search.
///
/// Exactly one variant is current. Once a search has been submitted the
/// state never returns to `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum RequestState {
    /// No search has been submitted yet
    #[default]
    Idle,

    /// A request is in flight for the latest submitted query
    Loading,

    /// The latest request produced a report
    Success(Report),

    /// The latest request failed; the message is shown to the user as-is
    Failure(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Success(report) => Some(report),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }
}
