//! Keyphrase extraction used to tag a merged summary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use tracing::{info, warn};

use super::client::{BackendErrorBody, InferenceClient};
use super::retry::{RetryError, RetryPolicy};
use crate::errors::TagError;

/// Something that derives short topical tags from a text.
#[async_trait]
pub trait TagExtractor: Send + Sync {
    /// Returns at most `max_tags` phrases in backend relevance order.
    ///
    /// # Errors
    ///
    /// `TagError::WarmupExhausted` when every attempt allowed by `retry` found
    /// the model still loading, any other variant for a failure that was not
    /// retried.
    async fn extract_tags(
        &self,
        text: &str,
        max_tags: NonZeroUsize,
        retry: &RetryPolicy,
    ) -> Result<Vec<String>, TagError>;
}

#[derive(Debug, Serialize)]
struct KeyphraseRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct KeyphraseRecord {
    word: String,
}

/// Result of a single call, before retry classification.
#[derive(Debug)]
enum AttemptError {
    WarmingUp(String),
    Failed(TagError),
}

/// Tag extractor backed by a hosted token-classification model.
#[derive(Debug, Clone)]
pub struct HostedTagExtractor {
    client: InferenceClient,
}

impl HostedTagExtractor {
    #[must_use]
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    async fn request_once(&self, text: &str) -> Result<Vec<String>, AttemptError> {
        let response = self
            .client
            .post_json(&KeyphraseRequest { inputs: text })
            .await
            .map_err(|e| AttemptError::Failed(TagError::Http(e.to_string())))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AttemptError::Failed(TagError::Http(format!("failed to read response body: {e}")))
        })?;

        if !status.is_success() {
            let parsed = BackendErrorBody::parse(&body);
            if parsed.is_warming_up() {
                return Err(AttemptError::WarmingUp(parsed.message));
            }
            return Err(AttemptError::Failed(TagError::Hard {
                status: status.as_u16(),
                message: parsed.message,
            }));
        }

        let records: Vec<KeyphraseRecord> = serde_json::from_str(&body)
            .map_err(|e| AttemptError::Failed(TagError::Malformed(format!("{e}: {body}"))))?;

        Ok(records.into_iter().map(|r| r.word).collect())
    }
}

#[async_trait]
impl TagExtractor for HostedTagExtractor {
    async fn extract_tags(
        &self,
        text: &str,
        max_tags: NonZeroUsize,
        retry: &RetryPolicy,
    ) -> Result<Vec<String>, TagError> {
        let words = retry
            .run(
                || self.request_once(text),
                |e| matches!(e, AttemptError::WarmingUp(_)),
            )
            .await
            .map_err(|e| match e {
                RetryError::Exhausted { attempts, last } => {
                    if let Some(AttemptError::WarmingUp(message)) = last {
                        warn!(attempts, "Keyphrase model still loading: {}", message);
                    }
                    TagError::WarmupExhausted { attempts }
                }
                RetryError::Permanent(AttemptError::Failed(err)) => err,
                RetryError::Permanent(AttemptError::WarmingUp(message)) => TagError::Hard {
                    status: 503,
                    message,
                },
            })?;

        let tags = normalize_tags(words, max_tags);
        info!(count = tags.len(), "Extracted tags");
        Ok(tags)
    }
}

/// Trim phrases, drop blanks and case-insensitive repeats, then cap the count.
/// Backend order is kept.
#[must_use]
pub fn normalize_tags<I>(phrases: I, max_tags: NonZeroUsize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    phrases
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.to_lowercase()))
        .take(max_tags.get())
        .collect()
}
