//! Campaigncrew configuration types and loading
//!
//! Configuration is read once at startup into an explicit [`Config`] value that
//! is passed down to the pipeline and the tool layer.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the model name
pub const MODEL_ENV: &str = "GROQ_MODEL";

/// Environment variable overriding the default sampling temperature
pub const TEMPERATURE_ENV: &str = "GROQ_TEMPERATURE";

/// Environment variable overriding the output directory
pub const OUTPUT_DIR_ENV: &str = "OUTPUT_DIR";

/// Providers reachable through the OpenAI-compatible client
pub const SUPPORTED_PROVIDERS: [&str; 2] = ["groq", "openai"];

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is required. Set it in your environment or .env file.")]
    MissingCredential { var: String },

    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue { key: String, value: String, reason: String },
}

impl ConfigError {
    pub fn unsupported_provider(provider: &str) -> Self {
        Self::InvalidValue {
            key: "llm.provider".to_string(),
            value: provider.to_string(),
            reason: format!("supported providers: {}", SUPPORTED_PROVIDERS.join(", ")),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language model provider configuration
    pub llm: LlmConfig,

    /// Web search configuration for the trend research tool
    pub search: SearchConfig,

    /// Where briefs are written
    pub output: OutputConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read only the log level, before logging is initialized
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_file_chain(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        // An explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Project-local config: .campaigncrew.yml
        let local_config = PathBuf::from(".campaigncrew.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/campaigncrew/campaigncrew.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("campaigncrew").join("campaigncrew.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Apply `GROQ_MODEL`, `GROQ_TEMPERATURE` and `OUTPUT_DIR` overrides
    ///
    /// The lookup is injected so tests do not have to touch the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            debug!(%model, "apply_overrides: model override");
            self.llm.model = model;
        }

        if let Some(raw) = lookup(TEMPERATURE_ENV) {
            debug!(%raw, "apply_overrides: temperature override");
            self.llm.temperature = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: TEMPERATURE_ENV.to_string(),
                value: raw.clone(),
                reason: "expected a number".to_string(),
            })?;
        }

        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            debug!(%dir, "apply_overrides: output dir override");
            self.output.dir = PathBuf::from(dir);
        }

        Ok(())
    }

    /// Validate configuration before any pipeline run
    ///
    /// Fails fast when the model credential is absent or values are out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.llm.resolve()?;
        Ok(())
    }
}

/// Language model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("groq" or "openai"; both speak the chat completions API)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL (without the `/v1/...` suffix)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Sampling temperature for agents whose descriptor leaves it unset
    ///
    /// The built-in roster pins a temperature per role, so this only reaches
    /// requests from agents with `temperature: None`.
    pub temperature: f32,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Transport-level retries for 5xx and network errors
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: "https://api.groq.com/openai".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            timeout_ms: 120_000,
            max_retries: 3,
        }
    }
}

impl LlmConfig {
    /// Resolve the credential and range-check values
    pub fn resolve(&self) -> Result<ResolvedLlmConfig, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve using an injected environment lookup
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedLlmConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!(provider = %self.provider, model = %self.model, "LlmConfig::resolve_with: called");
        if !SUPPORTED_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(ConfigError::unsupported_provider(&self.provider));
        }
        let api_key = lookup(&self.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingCredential {
                var: self.api_key_env.clone(),
            })?;

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "llm.temperature".to_string(),
                value: self.temperature.to_string(),
                reason: "must be between 0.0 and 2.0".to_string(),
            });
        }

        Ok(ResolvedLlmConfig {
            provider: self.provider.clone(),
            model: self.model.clone(),
            api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: Duration::from_millis(self.timeout_ms),
            max_retries: self.max_retries,
        })
    }
}

/// LLM configuration with the credential resolved
#[derive(Clone)]
pub struct ResolvedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl std::fmt::Debug for ResolvedLlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedLlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Web search configuration (optional; absence triggers the simulated dataset)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Environment variable containing the Serper API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Search endpoint
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: "SERPER_API_KEY".to_string(),
            base_url: "https://google.serper.dev".to_string(),
            timeout_ms: 15_000,
        }
    }
}

impl SearchConfig {
    /// Live search credentials, if a key is configured
    pub fn credentials(&self) -> Option<SearchCredentials> {
        self.credentials_with(|key| std::env::var(key).ok())
    }

    /// Credentials using an injected environment lookup
    pub fn credentials_with<F>(&self, lookup: F) -> Option<SearchCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|api_key| SearchCredentials {
                api_key,
                base_url: self.base_url.trim_end_matches('/').to_string(),
                timeout: Duration::from_millis(self.timeout_ms),
            })
    }
}

/// Resolved Serper credentials handed to the trend research tool
#[derive(Clone)]
pub struct SearchCredentials {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the Markdown and JSON briefs
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory with `{name}.pmt` overrides for the embedded templates
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.search.api_key_env, "SERPER_API_KEY");
        assert_eq!(config.output.dir, PathBuf::from("output"));
        assert!(config.prompts.dir.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: openai
  model: gpt-4o-mini
  api-key-env: OPENAI_API_KEY
  base-url: https://api.openai.com
  temperature: 0.5
  max-tokens: 2048
  timeout-ms: 60000

search:
  api-key-env: MY_SERPER_KEY

output:
  dir: /tmp/briefs

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.search.api_key_env, "MY_SERPER_KEY");
        assert_eq!(config.output.dir, PathBuf::from("/tmp/briefs"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: llama-3.1-8b-instant
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.output.dir, PathBuf::from("output"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                (MODEL_ENV, "mixtral-8x7b"),
                (TEMPERATURE_ENV, "0.2"),
                (OUTPUT_DIR_ENV, "/tmp/out"),
            ]))
            .unwrap();

        assert_eq!(config.llm.model, "mixtral-8x7b");
        assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.output.dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_invalid_temperature_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[(TEMPERATURE_ENV, "warm")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_missing_credential() {
        let config = LlmConfig::default();
        let result = config.resolve_with(env(&[]));
        match result {
            Err(ConfigError::MissingCredential { var }) => assert_eq!(var, "GROQ_API_KEY"),
            other => panic!("Expected MissingCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let config = LlmConfig::default();
        let result = config.resolve_with(env(&[("GROQ_API_KEY", "   ")]));
        assert!(matches!(result, Err(ConfigError::MissingCredential { .. })));
    }

    #[test]
    fn test_resolve_with_credential() {
        let config = LlmConfig {
            base_url: "https://api.groq.com/openai/".to_string(),
            ..LlmConfig::default()
        };
        let resolved = config.resolve_with(env(&[("GROQ_API_KEY", "gsk_test")])).unwrap();

        assert_eq!(resolved.api_key, "gsk_test");
        assert_eq!(resolved.base_url, "https://api.groq.com/openai");
        assert_eq!(resolved.timeout, Duration::from_millis(120_000));
        assert!(!format!("{:?}", resolved).contains("gsk_test"));
    }

    #[test]
    fn test_temperature_out_of_range() {
        let config = LlmConfig {
            temperature: 3.5,
            ..LlmConfig::default()
        };
        let result = config.resolve_with(env(&[("GROQ_API_KEY", "gsk_test")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_unsupported_provider() {
        let config = LlmConfig {
            provider: "anthropic".to_string(),
            ..LlmConfig::default()
        };
        let err = config.resolve_with(env(&[("GROQ_API_KEY", "gsk_test")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'anthropic' for llm.provider: supported providers: groq, openai"
        );
    }

    #[test]
    fn test_search_credentials_optional() {
        let search = SearchConfig::default();
        assert!(search.credentials_with(env(&[])).is_none());

        let creds = search
            .credentials_with(env(&[("SERPER_API_KEY", "serper-key")]))
            .unwrap();
        assert_eq!(creds.api_key, "serper-key");
        assert_eq!(creds.base_url, "https://google.serper.dev");
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/campaigncrew.yml");
        let result = Config::load_file_chain(Some(&path));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaigncrew.yml");
        fs::write(&path, "output:\n  dir: briefs\nlog-level: warn\n").unwrap();

        let config = Config::load_file_chain(Some(&path)).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("briefs"));
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_reads_process_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaigncrew.yml");
        fs::write(&path, "llm:\n  model: from-file\n").unwrap();

        // SAFETY: serialized with every other test that touches the environment
        unsafe {
            std::env::set_var(MODEL_ENV, "from-env");
            std::env::set_var(OUTPUT_DIR_ENV, "env-briefs");
        }
        let result = Config::load(Some(&path));
        unsafe {
            std::env::remove_var(MODEL_ENV);
            std::env::remove_var(OUTPUT_DIR_ENV);
        }

        let config = result.unwrap();
        assert_eq!(config.llm.model, "from-env");
        assert_eq!(config.output.dir, PathBuf::from("env-briefs"));
    }
}
