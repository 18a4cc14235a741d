use std::fs;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::SETTINGS_ENV_PREFIX;
use crate::error::RtdError;
use crate::rtd::SubmoduleConfig;

/// Host-side real-time data configuration (`realTimeData` in the host's config).
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RealTimeData {
    /// How long the host may hold an auction for submodules flagged `wait_for_it`
    #[serde(default = "default_auction_delay_ms")]
    #[validate(range(max = 10000))]
    pub auction_delay_ms: u32,

    #[serde(default)]
    #[validate(nested)]
    pub data_providers: Vec<SubmoduleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub realtime_data: RealTimeData,
}

impl Settings {
    /// Parse settings from TOML, applying `HUMANSECURITY_RTD__*` overrides.
    ///
    /// # Errors
    ///
    /// Returns [`RtdError::Configuration`] if the TOML is malformed, required
    /// sections are missing or validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<RtdError>> {
        let environment = Environment::default()
            .prefix(SETTINGS_ENV_PREFIX)
            .separator("__")
            .try_parsing(true);

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(RtdError::Configuration {
                message: "Failed to build configuration".to_string(),
            })?;

        let settings: Self = config
            .try_deserialize()
            .change_context(RtdError::Configuration {
                message: "Failed to deserialize configuration".to_string(),
            })?;

        settings.validate().map_err(|err| {
            Report::new(RtdError::Configuration {
                message: format!("Settings validation failed: {err}"),
            })
        })?;

        Ok(settings)
    }

    /// Read and parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`RtdError::Configuration`] if the file cannot be read or
    /// [`Settings::from_toml`] rejects it.
    pub fn from_file(path: &Path) -> Result<Self, Report<RtdError>> {
        let content = fs::read_to_string(path).change_context(RtdError::Configuration {
            message: format!("Failed to read {}", path.display()),
        })?;
        Self::from_toml(&content)
    }

    /// Config entry for the data provider registered as `name`.
    #[must_use]
    pub fn data_provider(&self, name: &str) -> Option<&SubmoduleConfig> {
        self.realtime_data
            .data_providers
            .iter()
            .find(|provider| provider.name == name)
    }
}

fn default_auction_delay_ms() -> u32 {
    0
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::tests::{crate_test_settings_str, create_test_settings};

    #[test]
    fn test_settings_from_valid_toml() {
        let settings = create_test_settings();

        assert_eq!(settings.realtime_data.auction_delay_ms, 300);
        assert_eq!(settings.realtime_data.data_providers.len(), 2);

        let provider = settings
            .data_provider("humansecurity")
            .expect("humansecurity provider should be configured");
        assert!(provider.wait_for_it);
        assert_eq!(
            provider.params,
            Some(json!({ "customerId": "ABC123", "bidders": ["appnexus", "rubicon"] }))
        );

        let other = settings.data_provider("other").expect("other provider");
        assert!(!other.wait_for_it);
        assert!(other.params.is_none());
    }

    #[test]
    fn test_settings_missing_provider() {
        let settings = create_test_settings();
        assert!(settings.data_provider("missing").is_none());
    }

    #[test]
    fn test_settings_without_providers() {
        let toml_str = r#"
            [realtime_data]
            auction_delay_ms = 100
            "#;

        let settings = Settings::from_toml(toml_str).expect("should parse");
        assert_eq!(settings.realtime_data.auction_delay_ms, 100);
        assert!(settings.realtime_data.data_providers.is_empty());
    }

    #[test]
    fn test_settings_empty_toml() {
        let settings = Settings::from_toml("");
        assert!(settings.is_err(), "Should fail with empty TOML");
    }

    #[test]
    fn test_settings_invalid_toml_syntax() {
        let toml_str = r#"
            [realtime_data
            auction_delay_ms = 300
            "#;

        let settings = Settings::from_toml(toml_str);
        assert!(settings.is_err(), "Should fail with invalid TOML syntax");
    }

    #[test]
    fn test_settings_rejects_out_of_range_delay() {
        let toml_str = r#"
            [realtime_data]
            auction_delay_ms = 60000
            "#;

        let err = Settings::from_toml(toml_str).expect_err("delay should be rejected");
        assert!(matches!(
            err.current_context(),
            RtdError::Configuration { .. }
        ));
    }

    #[test]
    fn test_settings_rejects_unnamed_provider() {
        let toml_str = r#"
            [realtime_data]

            [[realtime_data.data_providers]]
            name = ""
            "#;

        assert!(Settings::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_override_env() {
        temp_env::with_var(
            "HUMANSECURITY_RTD__REALTIME_DATA__AUCTION_DELAY_MS",
            Some("750"),
            || {
                let settings = Settings::from_toml(&crate_test_settings_str());

                assert!(settings.is_ok(), "Settings should load with env override");
                assert_eq!(
                    settings
                        .expect("settings should load")
                        .realtime_data
                        .auction_delay_ms,
                    750
                );
            },
        );
    }

    #[test]
    fn test_settings_from_missing_file() {
        let err = Settings::from_file(Path::new("/nonexistent/rtd.toml"))
            .expect_err("missing file should fail");
        assert!(err.current_context().message().starts_with("Failed to read"));
    }
}
