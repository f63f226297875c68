use serde::{Deserialize, Serialize};
use std::fmt;

/// A municipality name ready to be sent to the data service.
///
/// Always trimmed and never empty; raw input that is blank after trimming
/// does not produce a `Query`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    /// Trim raw input, rejecting empty and whitespace-only text
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Query {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "query must not be blank".to_string())
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}
