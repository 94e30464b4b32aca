//! Configuration for CompletionClient.

use std::env;

use crate::api_types::SamplingParams;
use crate::error::CompletionError;

/// Base URL of the public completion API.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for CompletionClient.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// API base URL (the client appends `/v1/chat/completions`).
    pub api_url: String,

    /// Bearer token for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Optional system prompt sent before everything else.
    pub system_prompt: Option<String>,

    /// Keep per-session conversation history and send it with each request.
    pub keep_history: bool,

    /// Remove a leading "\n\n" from every returned choice.
    pub strip_newline: bool,

    /// Maximum messages kept per session (None = unbounded). Whole exchanges
    /// are dropped to stay under it; zero is rejected.
    pub max_history_messages: Option<usize>,

    /// Sampling parameters forwarded with every request.
    pub sampling: SamplingParams,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            keep_history: false,
            strip_newline: false,
            max_history_messages: None,
            sampling: SamplingParams::default(),
        }
    }
}

impl CompletionConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API URL (default: https://api.openai.com)
    /// - `OPENAI_MODEL` - Model name (default: gpt-3.5-turbo)
    /// - `OPENAI_SYSTEM_PROMPT` - System prompt
    /// - `OPENAI_KEEP_HISTORY` - Keep conversation history (default: false)
    /// - `OPENAI_STRIP_NEWLINE` - Strip leading blank line from replies (default: false)
    /// - `OPENAI_MAX_HISTORY_MESSAGES` - Bound on stored messages per chat (default: unbounded)
    /// - `OPENAI_TEMPERATURE`, `OPENAI_TOP_P`, `OPENAI_N`, `OPENAI_MAX_TOKENS`,
    ///   `OPENAI_PRESENCE_PENALTY`, `OPENAI_FREQUENCY_PENALTY`, `OPENAI_USER` - sampling
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| CompletionError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let api_url = env::var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("OPENAI_MODEL")
            .ok()
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let sampling = SamplingParams {
            temperature: parse_var("OPENAI_TEMPERATURE"),
            top_p: parse_var("OPENAI_TOP_P"),
            n: parse_var("OPENAI_N"),
            max_tokens: parse_var("OPENAI_MAX_TOKENS"),
            presence_penalty: parse_var("OPENAI_PRESENCE_PENALTY"),
            frequency_penalty: parse_var("OPENAI_FREQUENCY_PENALTY"),
            user: env::var("OPENAI_USER").ok(),
            ..Default::default()
        };

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt: env::var("OPENAI_SYSTEM_PROMPT").ok(),
            keep_history: flag_var("OPENAI_KEEP_HISTORY"),
            strip_newline: flag_var("OPENAI_STRIP_NEWLINE"),
            max_history_messages: parse_var("OPENAI_MAX_HISTORY_MESSAGES"),
            sampling,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> CompletionConfigBuilder {
        CompletionConfigBuilder::default()
    }

    /// Check required fields and fill in defaults.
    pub(crate) fn validated(mut self) -> Result<Self, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::Configuration(
                "API token is not set".to_string(),
            ));
        }
        if self.max_history_messages == Some(0) {
            return Err(CompletionError::Configuration(
                "max_history_messages must be at least 1".to_string(),
            ));
        }
        if self.model.is_empty() {
            self.model = DEFAULT_MODEL.to_string();
        }
        Ok(self)
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn flag_var(name: &str) -> bool {
    env::var(name)
        .ok()
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}

/// Builder for CompletionConfig.
#[derive(Debug, Default)]
pub struct CompletionConfigBuilder {
    config: CompletionConfig,
}

impl CompletionConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Keep conversation history between queries.
    pub fn keep_history(mut self, keep: bool) -> Self {
        self.config.keep_history = keep;
        self
    }

    /// Strip a leading blank line from returned choices.
    pub fn strip_newline(mut self, strip: bool) -> Self {
        self.config.strip_newline = strip;
        self
    }

    /// Bound the number of stored messages per session.
    pub fn max_history_messages(mut self, max: usize) -> Self {
        self.config.max_history_messages = Some(max);
        self
    }

    /// Set the sampling parameters.
    pub fn sampling(mut self, sampling: SamplingParams) -> Self {
        self.config.sampling = sampling;
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.sampling.temperature = Some(temp);
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.sampling.max_tokens = Some(tokens);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CompletionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompletionConfig::default();

        assert_eq!(config.api_url, "https://api.openai.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.system_prompt.is_none());
        assert!(!config.keep_history);
        assert!(!config.strip_newline);
        assert!(config.max_history_messages.is_none());
        assert_eq!(config.sampling, SamplingParams::default());
    }

    #[test]
    fn test_builder_all_options() {
        let config = CompletionConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com")
            .model("gpt-3.5-turbo-0301")
            .system_prompt("You are helpful")
            .keep_history(true)
            .strip_newline(true)
            .max_history_messages(20)
            .temperature(0.5)
            .max_tokens(256)
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "https://custom.api.com");
        assert_eq!(config.model, "gpt-3.5-turbo-0301");
        assert_eq!(config.system_prompt.as_deref(), Some("You are helpful"));
        assert!(config.keep_history);
        assert!(config.strip_newline);
        assert_eq!(config.max_history_messages, Some(20));
        assert_eq!(config.sampling.temperature, Some(0.5));
        assert_eq!(config.sampling.max_tokens, Some(256));
    }

    #[test]
    fn test_validated_defaults_empty_model() {
        let config = CompletionConfig::builder()
            .api_key("k")
            .model("")
            .build()
            .validated()
            .unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_validated_rejects_empty_key() {
        let err = CompletionConfig::default().validated().unwrap_err();
        assert!(matches!(err, CompletionError::Configuration(_)));
    }

    #[test]
    fn test_validated_rejects_zero_history_bound() {
        let err = CompletionConfig::builder()
            .api_key("k")
            .max_history_messages(0)
            .build()
            .validated()
            .unwrap_err();
        assert!(matches!(err, CompletionError::Configuration(_)));
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let config = CompletionConfig::builder()
            .api_url("http://127.0.0.1:1234/")
            .build();
        assert_eq!(
            config.completions_url(),
            "http://127.0.0.1:1234/v1/chat/completions"
        );
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_openai_vars() {
            for name in [
                "OPENAI_API_KEY",
                "OPENAI_API_URL",
                "OPENAI_MODEL",
                "OPENAI_SYSTEM_PROMPT",
                "OPENAI_KEEP_HISTORY",
                "OPENAI_STRIP_NEWLINE",
                "OPENAI_MAX_HISTORY_MESSAGES",
                "OPENAI_TEMPERATURE",
                "OPENAI_TOP_P",
                "OPENAI_N",
                "OPENAI_MAX_TOKENS",
                "OPENAI_PRESENCE_PENALTY",
                "OPENAI_FREQUENCY_PENALTY",
                "OPENAI_USER",
            ] {
                std::env::remove_var(name);
            }
        }

        // Missing API key
        clear_all_openai_vars();
        match CompletionConfig::from_env() {
            Err(CompletionError::Configuration(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Empty API key counts as missing
        std::env::set_var("OPENAI_API_KEY", "");
        assert!(CompletionConfig::from_env().is_err());

        // Only API key set, defaults used
        clear_all_openai_vars();
        std::env::set_var("OPENAI_API_KEY", "test-env-key");
        let config = CompletionConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(!config.keep_history);
        assert!(!config.strip_newline);
        assert_eq!(config.sampling, SamplingParams::default());

        // All vars set
        clear_all_openai_vars();
        std::env::set_var("OPENAI_API_KEY", "full-key");
        std::env::set_var("OPENAI_API_URL", "https://test.api.com");
        std::env::set_var("OPENAI_MODEL", "gpt-3.5-turbo-0301");
        std::env::set_var("OPENAI_SYSTEM_PROMPT", "Be brief");
        std::env::set_var("OPENAI_KEEP_HISTORY", "true");
        std::env::set_var("OPENAI_STRIP_NEWLINE", "1");
        std::env::set_var("OPENAI_MAX_HISTORY_MESSAGES", "40");
        std::env::set_var("OPENAI_TEMPERATURE", "0.9");
        std::env::set_var("OPENAI_N", "2");
        std::env::set_var("OPENAI_USER", "relay");

        let config = CompletionConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://test.api.com");
        assert_eq!(config.model, "gpt-3.5-turbo-0301");
        assert_eq!(config.system_prompt.as_deref(), Some("Be brief"));
        assert!(config.keep_history);
        assert!(config.strip_newline);
        assert_eq!(config.max_history_messages, Some(40));
        assert_eq!(config.sampling.temperature, Some(0.9));
        assert_eq!(config.sampling.n, Some(2));
        assert_eq!(config.sampling.user.as_deref(), Some("relay"));

        clear_all_openai_vars();
    }
}
