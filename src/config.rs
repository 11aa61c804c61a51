use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub ner: NerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NerSettings {
    #[serde(default = "default_ner_model_id")]
    pub model_id: String,
}

fn default_ner_model_id() -> String {
    "dslim/bert-base-NER".to_string()
}

impl Default for NerSettings {
    fn default() -> Self {
        Self {
            model_id: default_ner_model_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with REVIEWLENS_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with REVIEWLENS_)
            // e.g., REVIEWLENS_OPENAI__MODEL -> openai.model
            .add_source(
                Environment::with_prefix("REVIEWLENS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("REVIEWLENS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply direct environment overrides for values that are conventionally set
/// outside the config files. The API key is checked as OPENAI_API_KEY first,
/// then REVIEWLENS_OPENAI__API_KEY.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("OPENAI_API_KEY")
        .or_else(|_| env::var("REVIEWLENS_OPENAI__API_KEY"))
        .ok();

    let ner_model_id = env::var("REVIEWLENS_NER__MODEL_ID").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("openai.api_key", api_key)?;
    }
    if let Some(model_id) = ner_model_id {
        builder = builder.set_override("ner.model_id", model_id)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_openai_settings() {
        assert_eq!(default_base_url(), "https://api.openai.com/v1");
        assert_eq!(default_model(), "gpt-4");
    }

    #[test]
    fn test_default_ner_model() {
        let ner = NerSettings::default();
        assert_eq!(ner.model_id, "dslim/bert-base-NER");
    }

    #[test]
    fn test_settings_deserialize_from_empty_sources() {
        let settings: Settings = Config::builder()
            .build()
            .expect("empty config builds")
            .try_deserialize()
            .expect("defaults fill every section");

        assert_eq!(settings.openai.model, "gpt-4");
        assert!(settings.openai.api_key.is_empty());
        assert_eq!(settings.ner.model_id, "dslim/bert-base-NER");
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "pretty");
    }
}
