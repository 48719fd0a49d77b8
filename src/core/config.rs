use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::BotError;

pub const DEFAULT_SUMMARIZATION_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";
pub const DEFAULT_KEYPHRASE_URL: &str =
    "https://api-inference.huggingface.co/models/ml6team/keyphrase-extraction-distilbert-inspec";

/// How article text is pulled out of a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Text of every `<p>` element, joined with a space.
    #[default]
    Paragraphs,
    /// The whole document rendered as plain text.
    FullPage,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paragraphs" | "p" => Ok(Self::Paragraphs),
            "full" | "fullpage" | "full_page" => Ok(Self::FullPage),
            other => Err(format!("unknown extraction mode '{other}'")),
        }
    }
}

/// Tunables for a pipeline run. Read-only once the process has started.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_chunk_len: NonZeroUsize,
    pub summary_min_length: u32,
    pub max_tags: NonZeroUsize,
    pub tag_retry_attempts: u32,
    pub tag_retry_delay: Duration,
    pub request_timeout: Duration,
    pub tagging_enabled: bool,
    pub extraction_mode: ExtractionMode,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_chunk_len: NonZeroUsize::new(3000).unwrap_or(NonZeroUsize::MIN),
            summary_min_length: 100,
            max_tags: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            tag_retry_attempts: 3,
            tag_retry_delay: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            tagging_enabled: true,
            extraction_mode: ExtractionMode::Paragraphs,
        }
    }
}

/// Which Lambda is loading the configuration. Each one only requires the
/// credentials it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Verifies Slack requests and queues tasks.
    Api,
    /// Runs the pipeline and posts replies.
    Worker,
}

impl Role {
    fn required_keys(self) -> &'static [&'static str] {
        match self {
            Role::Api => &["PROCESSING_QUEUE_URL", "SLACK_SIGNING_SECRET"],
            Role::Worker => &["SLACK_BOT_TOKEN", "HUGGINGFACE_API_TOKEN"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub processing_queue_url: Option<String>,
    pub slack_signing_secret: Option<String>,
    pub slack_bot_token: Option<String>,
    pub hf_api_token: Option<String>,
    /// When set, only mentions in this channel are processed.
    pub target_channel_id: Option<String>,
    pub summarization_url: String,
    pub keyphrase_url: String,
    pub pipeline: PipelineSettings,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` naming the variable that is missing for
    /// `role` or cannot be parsed.
    pub fn from_env(role: Role) -> Result<Self, BotError> {
        Self::from_lookup(role, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(role: Role, lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(missing) = role
            .required_keys()
            .iter()
            .copied()
            .find(|key| optional(*key).is_none())
        {
            return Err(not_set(missing));
        }

        let defaults = PipelineSettings::default();
        let pipeline = PipelineSettings {
            max_chunk_len: parse_or(&lookup, "MAX_CHUNK_LENGTH", defaults.max_chunk_len)?,
            summary_min_length: parse_or(&lookup, "SUMMARY_MIN_LENGTH", defaults.summary_min_length)?,
            max_tags: parse_or(&lookup, "MAX_TAGS", defaults.max_tags)?,
            tag_retry_attempts: parse_or(&lookup, "TAG_RETRY_ATTEMPTS", defaults.tag_retry_attempts)?,
            tag_retry_delay: parse_or(&lookup, "TAG_RETRY_DELAY_SECS", 10u64)
                .map(Duration::from_secs)?,
            request_timeout: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 60u64)
                .map(Duration::from_secs)?,
            tagging_enabled: parse_or(&lookup, "TAGGING_ENABLED", defaults.tagging_enabled)?,
            extraction_mode: parse_or(&lookup, "EXTRACTION_MODE", defaults.extraction_mode)?,
        };

        Ok(Self {
            processing_queue_url: optional("PROCESSING_QUEUE_URL"),
            slack_signing_secret: optional("SLACK_SIGNING_SECRET"),
            slack_bot_token: optional("SLACK_BOT_TOKEN"),
            hf_api_token: optional("HUGGINGFACE_API_TOKEN"),
            target_channel_id: optional("CHANNEL_ID"),
            summarization_url: lookup("SUMMARIZATION_API_URL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZATION_URL.to_string()),
            keyphrase_url: lookup("KEYPHRASE_API_URL")
                .unwrap_or_else(|| DEFAULT_KEYPHRASE_URL.to_string()),
            pipeline,
        })
    }

    /// # Errors
    ///
    /// `BotError::ConfigError` if `PROCESSING_QUEUE_URL` was not set.
    pub fn queue_url(&self) -> Result<&str, BotError> {
        present(self.processing_queue_url.as_deref(), "PROCESSING_QUEUE_URL")
    }

    /// # Errors
    ///
    /// `BotError::ConfigError` if `SLACK_SIGNING_SECRET` was not set.
    pub fn signing_secret(&self) -> Result<&str, BotError> {
        present(self.slack_signing_secret.as_deref(), "SLACK_SIGNING_SECRET")
    }

    /// # Errors
    ///
    /// `BotError::ConfigError` if `SLACK_BOT_TOKEN` was not set.
    pub fn bot_token(&self) -> Result<&str, BotError> {
        present(self.slack_bot_token.as_deref(), "SLACK_BOT_TOKEN")
    }

    /// # Errors
    ///
    /// `BotError::ConfigError` if `HUGGINGFACE_API_TOKEN` was not set.
    pub fn inference_token(&self) -> Result<&str, BotError> {
        present(self.hf_api_token.as_deref(), "HUGGINGFACE_API_TOKEN")
    }
}

fn present<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, BotError> {
    value.ok_or_else(|| not_set(key))
}

fn not_set(key: &str) -> BotError {
    BotError::ConfigError(format!("{key}: environment variable not set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, BotError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| BotError::ConfigError(format!("{key}: {e}"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SLACK_BOT_TOKEN", "xoxb-token"),
            ("HUGGINGFACE_API_TOKEN", "hf_token"),
        ])
    }

    fn load_as(
        role: Role,
        env: &HashMap<&'static str, &'static str>,
    ) -> Result<AppConfig, BotError> {
        AppConfig::from_lookup(role, |k| env.get(k).map(|v| (*v).to_string()))
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<AppConfig, BotError> {
        load_as(Role::Worker, env)
    }

    #[test]
    fn defaults_apply_when_tunables_are_unset() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.pipeline.max_chunk_len.get(), 3000);
        assert_eq!(config.pipeline.max_tags.get(), 5);
        assert_eq!(config.pipeline.tag_retry_attempts, 3);
        assert_eq!(config.pipeline.tag_retry_delay, Duration::from_secs(10));
        assert!(config.pipeline.tagging_enabled);
        assert_eq!(config.pipeline.extraction_mode, ExtractionMode::Paragraphs);
        assert_eq!(config.summarization_url, DEFAULT_SUMMARIZATION_URL);
        assert!(config.target_channel_id.is_none());
    }

    #[test]
    fn tunables_are_read_from_the_environment() {
        let mut env = base_env();
        env.insert("MAX_CHUNK_LENGTH", "5104");
        env.insert("TAG_RETRY_DELAY_SECS", "2");
        env.insert("TAGGING_ENABLED", "false");
        env.insert("EXTRACTION_MODE", "full");
        env.insert("CHANNEL_ID", "C42");

        let config = load(&env).unwrap();
        assert_eq!(config.pipeline.max_chunk_len.get(), 5104);
        assert_eq!(config.pipeline.tag_retry_delay, Duration::from_secs(2));
        assert!(!config.pipeline.tagging_enabled);
        assert_eq!(config.pipeline.extraction_mode, ExtractionMode::FullPage);
        assert_eq!(config.target_channel_id.as_deref(), Some("C42"));
    }

    #[test]
    fn zero_chunk_length_is_rejected() {
        let mut env = base_env();
        env.insert("MAX_CHUNK_LENGTH", "0");

        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains("MAX_CHUNK_LENGTH"));
    }

    #[test]
    fn api_role_needs_only_its_own_credentials() {
        let env = HashMap::from([
            ("PROCESSING_QUEUE_URL", "https://sqs.example/queue"),
            ("SLACK_SIGNING_SECRET", "secret"),
        ]);

        let config = load_as(Role::Api, &env).unwrap();
        assert_eq!(config.queue_url().unwrap(), "https://sqs.example/queue");
        assert_eq!(config.signing_secret().unwrap(), "secret");
        assert!(config.hf_api_token.is_none());
        assert!(matches!(config.inference_token(), Err(BotError::ConfigError(_))));
    }

    #[test]
    fn worker_role_does_not_need_api_credentials() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.bot_token().unwrap(), "xoxb-token");
        assert!(config.processing_queue_url.is_none());
        assert!(config.slack_signing_secret.is_none());
    }

    #[test]
    fn api_role_rejects_missing_signing_secret() {
        let env = HashMap::from([("PROCESSING_QUEUE_URL", "https://sqs.example/queue")]);

        let err = load_as(Role::Api, &env).unwrap_err();
        assert!(err.to_string().contains("SLACK_SIGNING_SECRET"));
    }

    #[test]
    fn missing_credential_names_the_variable() {
        let mut env = base_env();
        env.remove("HUGGINGFACE_API_TOKEN");

        let err = load(&env).unwrap_err();
        assert!(matches!(err, BotError::ConfigError(ref m) if m.contains("HUGGINGFACE_API_TOKEN")));
    }
}
