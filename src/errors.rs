use slack_morphism::errors::SlackClientError;
use thiserror::Error;

/// Host-level failures: Slack, AWS, configuration and request plumbing.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Failed to parse Slack event: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<SlackClientError> for BotError {
    fn from(error: SlackClientError) -> Self {
        BotError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::HttpError(error.to_string())
    }
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::GeneralError(error.to_string())
    }
}

impl<E> From<aws_sdk_sqs::error::SdkError<E>> for BotError
where
    E: std::fmt::Display,
{
    fn from(error: aws_sdk_sqs::error::SdkError<E>) -> Self {
        BotError::AwsError(error.to_string())
    }
}

/// The page behind a URL could not be turned into article text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch page: {0}")]
    Http(String),

    #[error("page returned status {0}")]
    Status(u16),

    #[error("failed to decode page: {0}")]
    Decode(String),
}

/// One chunk could not be summarized. Never retried.
#[derive(Debug, Error)]
pub enum SummarizationError {
    #[error("summarization request failed: {0}")]
    Http(String),

    #[error("summarization backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected summarization response: {0}")]
    Malformed(String),

    #[error("summarization timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Tag extraction failed. Never fatal to a pipeline run.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("keyphrase backend returned status {status}: {message}")]
    Hard { status: u16, message: String },

    #[error("keyphrase request failed: {0}")]
    Http(String),

    #[error("unexpected keyphrase response: {0}")]
    Malformed(String),

    #[error("keyphrase model still warming up after {attempts} attempts")]
    WarmupExhausted { attempts: u32 },
}
