use crate::error::{PadronError, Result};
use crate::format::NumberLocale;
use crate::presenter::ReportPresenter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default demographics endpoint (local development server)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5328/api/demographics";

/// Default fetch timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for Padrón
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub endpoint: ConfigValue<String>,
    pub timeout_secs: ConfigValue<u64>,
    pub top_nationalities: ConfigValue<Option<usize>>,
    pub locale: ConfigValue<NumberLocale>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            endpoint: ConfigValue::new(DEFAULT_ENDPOINT.to_string(), ConfigSource::Default),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            top_nationalities: ConfigValue::new(None, ConfigSource::Default),
            locale: ConfigValue::new(NumberLocale::En, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| PadronError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| PadronError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(endpoint) = file_config.endpoint {
            self.endpoint.update(endpoint, ConfigSource::File);
        }

        if let Some(timeout_secs) = file_config.timeout_secs {
            self.timeout_secs.update(parse_timeout(timeout_secs)?, ConfigSource::File);
        }

        if let Some(top) = file_config.top_nationalities {
            self.top_nationalities.update(Some(top), ConfigSource::File);
        }

        if let Some(locale) = file_config.locale {
            self.locale.update(locale, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // PADRON_ENDPOINT
        if let Ok(endpoint) = env::var("PADRON_ENDPOINT") {
            self.endpoint.update(endpoint, ConfigSource::Environment);
        }

        // PADRON_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("PADRON_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) if timeout > 0 => {
                    self.timeout_secs.update(timeout, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid PADRON_TIMEOUT_SECS value '{}': expected a positive integer",
                    timeout_str
                ),
            }
        }

        // PADRON_TOP_NATIONALITIES
        if let Ok(top_str) = env::var("PADRON_TOP_NATIONALITIES") {
            match top_str.parse::<usize>() {
                Ok(top) => self.top_nationalities.update(Some(top), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PADRON_TOP_NATIONALITIES value '{}': expected an integer",
                    top_str
                ),
            }
        }

        // PADRON_LOCALE
        if let Ok(locale_str) = env::var("PADRON_LOCALE") {
            match locale_str.parse::<NumberLocale>() {
                Ok(locale) => self.locale.update(locale, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PADRON_LOCALE value '{}': expected en or es",
                    locale_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint.update(endpoint, ConfigSource::Cli);
        }

        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs.update(parse_timeout(timeout_secs)?, ConfigSource::Cli);
        }

        if let Some(top) = overrides.top_nationalities {
            self.top_nationalities.update(Some(top), ConfigSource::Cli);
        }

        if let Some(locale) = overrides.locale {
            self.locale.update(locale, ConfigSource::Cli);
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.value)
    }

    /// Presenter configured with this top-N and locale
    pub fn presenter(&self) -> ReportPresenter {
        ReportPresenter::new()
            .with_top_nationalities(self.top_nationalities.value)
            .with_locale(self.locale.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("endpoint".to_string(), (self.endpoint.value.clone(), self.endpoint.source));

        map.insert(
            "timeout_secs".to_string(),
            (self.timeout_secs.value.to_string(), self.timeout_secs.source),
        );

        map.insert(
            "top_nationalities".to_string(),
            (
                self.top_nationalities
                    .value
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "all".to_string()),
                self.top_nationalities.source,
            ),
        );

        map.insert("locale".to_string(), (self.locale.value.to_string(), self.locale.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    top_nationalities: Option<usize>,
    locale: Option<NumberLocale>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub top_nationalities: Option<usize>,
    pub locale: Option<NumberLocale>,
}

/// A zero timeout would fail every request before it is sent
fn parse_timeout(secs: u64) -> Result<u64> {
    if secs == 0 {
        return Err(PadronError::ConfigInvalid {
            key: "timeout_secs".to_string(),
            reason: "Timeout must be at least 1 second".to_string(),
        });
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_KEYS: [&str; 4] =
        ["PADRON_ENDPOINT", "PADRON_TIMEOUT_SECS", "PADRON_TOP_NATIONALITIES", "PADRON_LOCALE"];

    fn clear_env() {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.endpoint.value, DEFAULT_ENDPOINT);
        assert_eq!(config.endpoint.source, ConfigSource::Default);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.top_nationalities.value, None);
        assert_eq!(config.locale.value, NumberLocale::En);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
endpoint = "https://padron.example.com/api/demographics"
timeout_secs = 3
top_nationalities = 5
locale = "es"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.endpoint.value, "https://padron.example.com/api/demographics");
        assert_eq!(config.endpoint.source, ConfigSource::File);
        assert_eq!(config.timeout_secs.value, 3);
        assert_eq!(config.top_nationalities.value, Some(5));
        assert_eq!(config.locale.value, NumberLocale::Es);
    }

    #[test]
    fn test_load_from_file_rejects_zero_timeout() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 0").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, PadronError::ConfigInvalid { ref key, .. } if key == "timeout_secs"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/padron.toml");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        clear_env();
        env::set_var("PADRON_ENDPOINT", "http://env.example/api/demographics");
        env::set_var("PADRON_TIMEOUT_SECS", "4");
        env::set_var("PADRON_LOCALE", "es");

        let config = LayeredConfig::with_defaults().load_from_env();
        clear_env();

        assert_eq!(config.endpoint.value, "http://env.example/api/demographics");
        assert_eq!(config.endpoint.source, ConfigSource::Environment);
        assert_eq!(config.timeout_secs.value, 4);
        assert_eq!(config.locale.value, NumberLocale::Es);
        assert_eq!(config.top_nationalities.source, ConfigSource::Default);
    }

    #[test]
    #[serial]
    fn test_invalid_env_values_are_ignored() {
        clear_env();
        env::set_var("PADRON_TIMEOUT_SECS", "soon");
        env::set_var("PADRON_TOP_NATIONALITIES", "-3");
        env::set_var("PADRON_LOCALE", "klingon");

        let config = LayeredConfig::with_defaults().load_from_env();
        clear_env();

        assert_eq!(config.timeout_secs.value, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.timeout_secs.source, ConfigSource::Default);
        assert_eq!(config.top_nationalities.value, None);
        assert_eq!(config.locale.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            endpoint: Some("http://cli.example/api".to_string()),
            timeout_secs: None,
            top_nationalities: Some(3),
            locale: None,
        };

        config.update_from_cli(overrides).unwrap();

        assert_eq!(config.endpoint.value, "http://cli.example/api");
        assert_eq!(config.endpoint.source, ConfigSource::Cli);
        assert_eq!(config.top_nationalities.value, Some(3));
        // These should still be defaults
        assert_eq!(config.timeout_secs.source, ConfigSource::Default);
        assert_eq!(config.locale.source, ConfigSource::Default);

        let presenter = config.presenter();
        assert_eq!(presenter, ReportPresenter::new().with_top_nationalities(Some(3)));
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("endpoint"));
        assert!(map.contains_key("timeout_secs"));
        assert!(map.contains_key("top_nationalities"));
        assert!(map.contains_key("locale"));

        let (top, source) = &map["top_nationalities"];
        assert_eq!(top, "all");
        assert_eq!(*source, ConfigSource::Default);
    }
}
