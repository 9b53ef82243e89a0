use core_config::{ConfigError, FromEnv, env_or_default, env_optional};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Chat-completion endpoint settings.
///
/// Environment variables:
/// - `OPENAI_API_KEY` (optional; without it the offline generator is used)
/// - `OPENAI_BASE_URL` (default `https://api.openai.com/v1`)
/// - `OPENAI_MODEL` (default `gpt-3.5-turbo`)
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl FromEnv for OpenAiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: env_optional("OPENAI_API_KEY"),
            base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: env_or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_key() {
        temp_env::with_vars_unset(["OPENAI_API_KEY", "OPENAI_BASE_URL", "OPENAI_MODEL"], || {
            let config = OpenAiConfig::from_env().unwrap();
            assert!(!config.is_configured());
            assert_eq!(config.base_url, DEFAULT_OPENAI_BASE_URL);
            assert_eq!(config.model, "gpt-3.5-turbo");
        });
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("OPENAI_API_KEY", Some("sk-test")),
                ("OPENAI_BASE_URL", Some("http://localhost:8089/v1/")),
                ("OPENAI_MODEL", Some("gpt-4o-mini")),
            ],
            || {
                let config = OpenAiConfig::from_env().unwrap();
                assert_eq!(config.api_key.as_deref(), Some("sk-test"));
                assert_eq!(config.base_url, "http://localhost:8089/v1");
                assert_eq!(config.model, "gpt-4o-mini");
            },
        );
    }

    #[test]
    fn test_blank_key_is_unset() {
        temp_env::with_var("OPENAI_API_KEY", Some("  "), || {
            assert!(!OpenAiConfig::from_env().unwrap().is_configured());
        });
    }
}
