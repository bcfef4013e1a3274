use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::extract::ExtractConfig;

const CONFIG_FILE: &str = "storybook";
const ENV_PREFIX: &str = "STORYBOOK";

/// Settings from an optional `storybook.{toml,yaml,json}` file overlaid with
/// `STORYBOOK_*` variables; `__` separates nested keys
/// (`STORYBOOK_EXTRACT__SETTLE_DELAY_MS=500`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: Option<String>,
    pub additional_building_instructions: Option<String>,
    pub extract: ExtractConfig,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(|e| Error::Configuration(e.to_string()))
    }

    /// The Storybook base URL; a flag value wins over configured ones.
    pub fn base_url(&self, flag: Option<&str>) -> Result<String> {
        flag.or(self.base_url.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "missing Storybook base URL (pass --base-url or set {}_BASE_URL)",
                    ENV_PREFIX
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_configured_url() {
        let s = Settings {
            base_url: Some("https://configured/sb".into()),
            ..Default::default()
        };
        assert_eq!(s.base_url(Some("https://flag/sb")).unwrap(), "https://flag/sb");
        assert_eq!(s.base_url(None).unwrap(), "https://configured/sb");
    }

    #[test]
    fn missing_or_blank_url_is_a_configuration_error() {
        let s = Settings::default();
        assert!(matches!(s.base_url(None), Err(Error::Configuration(_))));
        assert!(matches!(s.base_url(Some("  ")), Err(Error::Configuration(_))));
    }

    #[test]
    fn nested_extract_settings_deserialize_with_defaults() {
        let s: Settings = Config::builder()
            .set_override("base_url", "https://x/sb")
            .unwrap()
            .set_override("extract.settle_delay_ms", 50)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(s.base_url.as_deref(), Some("https://x/sb"));
        assert_eq!(s.extract.settle_delay_ms, 50);
        assert_eq!(s.extract.probe_depth, 3);
        assert_eq!(s.extract.root_selector, "#storybook-docs");
    }
}
