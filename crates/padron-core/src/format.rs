//! Display formatting for counts and percentages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PadronError;

/// Digit grouping convention used when displaying counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberLocale {
    /// `3,223,334` and `83.8%`
    #[default]
    En,
    /// `3.223.334` and `83,8%`
    Es,
}

impl NumberLocale {
    fn group_separator(self) -> char {
        match self {
            NumberLocale::En => ',',
            NumberLocale::Es => '.',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            NumberLocale::En => '.',
            NumberLocale::Es => ',',
        }
    }

    /// Format a count with thousands separators (e.g., 12345 → "12,345")
    pub fn format_count(self, n: u64) -> String {
        let digits = n.to_string();
        let len = digits.len();
        let mut result = String::with_capacity(len + len / 3);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                result.push(self.group_separator());
            }
            result.push(c);
        }

        result
    }

    /// Format a percentage with one decimal and a trailing `%`
    pub fn format_percent(self, percent: f64) -> String {
        let text = format!("{:.1}%", percent);
        match self.decimal_separator() {
            '.' => text,
            sep => text.replace('.', &sep.to_string()),
        }
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberLocale::En => write!(f, "en"),
            NumberLocale::Es => write!(f, "es"),
        }
    }
}

impl FromStr for NumberLocale {
    type Err = PadronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Ok(NumberLocale::En),
            "es" | "es-es" | "es_es" => Ok(NumberLocale::Es),
            _ => Err(PadronError::ConfigInvalid {
                key: "locale".to_string(),
                reason: format!("Invalid locale: {}. Use en or es", s),
            }),
        }
    }
}

/// Share of `part` in `total` as a percentage rounded to one decimal.
///
/// A zero total yields 0 rather than dividing.
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
