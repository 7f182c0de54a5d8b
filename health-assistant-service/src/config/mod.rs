use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-instruct";
const DEFAULT_TEMPERATURE: &str = "0.8";
const DEFAULT_MAX_TOKENS: &str = "256";
const DEFAULT_TIMEOUT_SECS: &str = "60";

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    /// Completion model (e.g., gpt-3.5-turbo-instruct)
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// HTTP client timeout for a single completion call
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// OTLP collector endpoint; trace export is disabled when unset
    pub otlp_endpoint: Option<String>,
}

impl AssistantConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let lookup = |key: &str| env::var(key).ok();

        Ok(AssistantConfig {
            common: common_config,
            openai: OpenAiConfig::from_lookup(lookup)?,
            observability: ObservabilityConfig::from_lookup(lookup),
        })
    }
}

impl OpenAiConfig {
    /// Build the provider settings from a key lookup.
    ///
    /// `OPENAI_API_KEY` has no default: the service refuses to start without it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";

        let api_key = get_env(&lookup, "OPENAI_API_KEY", None, is_prod)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY is set but empty; provide a valid OpenAI API key"
            )));
        }

        Ok(OpenAiConfig {
            api_key: Secret::new(api_key),
            base_url: get_env(
                &lookup,
                "OPENAI_BASE_URL",
                Some(DEFAULT_OPENAI_BASE_URL),
                is_prod,
            )?
            .trim_end_matches('/')
            .to_string(),
            model: get_env(&lookup, "OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), is_prod)?,
            temperature: parse_env(&lookup, "OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE, is_prod)?,
            max_tokens: parse_env(&lookup, "OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS, is_prod)?,
            timeout_secs: parse_env(
                &lookup,
                "OPENAI_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
                is_prod,
            )?,
        })
    }
}

impl ObservabilityConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        }
    }
}

fn get_env<F>(
    lookup: &F,
    key: &str,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<F, T>(lookup: &F, key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(lookup, key, Some(default), is_prod)?;
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_api_key_is_set() {
        let config = OpenAiConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")]))
            .expect("config should load");

        assert_eq!(config.api_key.expose_secret(), "sk-test");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-3.5-turbo-instruct");
        assert!((config.temperature - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = OpenAiConfig::from_lookup(lookup_from(&[])).unwrap_err();

        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let err = OpenAiConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")])).unwrap_err();

        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn invalid_number_is_a_config_error() {
        let err = OpenAiConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MAX_TOKENS", "lots"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("OPENAI_MAX_TOKENS"));
    }

    #[test]
    fn prod_requires_every_variable() {
        let err = OpenAiConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "prod"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("required in production"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = OpenAiConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000/v1/"),
        ]))
        .expect("config should load");

        assert_eq!(config.base_url, "http://localhost:9000/v1");
    }

    #[test]
    fn blank_otlp_endpoint_disables_export() {
        let config = ObservabilityConfig::from_lookup(lookup_from(&[("OTLP_ENDPOINT", "")]));

        assert_eq!(config.log_level, "info");
        assert!(config.otlp_endpoint.is_none());
    }
}
