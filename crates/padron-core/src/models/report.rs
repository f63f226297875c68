use serde::{Deserialize, Serialize};

/// Demographic summary for one municipality, as returned by the data service.
///
/// Field names follow the service's camelCase wire format. The counts are
/// taken verbatim: `population_spanish + population_foreign` is not required
/// to equal `population_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Resolved location name echoed by the service
    pub municipality: String,

    #[serde(deserialize_with = "count::deserialize")]
    pub population_total: u64,

    #[serde(deserialize_with = "count::deserialize")]
    pub population_spanish: u64,

    #[serde(deserialize_with = "count::deserialize")]
    pub population_foreign: u64,

    /// Residents per nationality, in the order the service sent them
    #[serde(default)]
    pub nationality_breakdown: Vec<NationalityCount>,
}

/// One `(name, value)` entry of the nationality breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationalityCount {
    pub name: String,
    #[serde(deserialize_with = "count::deserialize")]
    pub value: u64,
}

impl NationalityCount {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self { name: name.into(), value }
    }
}

/// Resident counts arrive either as integers or as whole-number floats
/// (`3223334.0`), depending on how the service serialized its source values.
mod count {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CountVisitor)
    }

    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative whole number")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
            u64::try_from(value)
                .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<u64, E> {
            // u64::MAX as f64 rounds up to 2^64, which is itself out of range
            if value.fract() == 0.0 && value >= 0.0 && value < u64::MAX as f64 {
                Ok(value as u64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }
    }
}
