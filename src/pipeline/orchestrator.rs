//! Runs chunking, summarization and tagging for one article.

use tokio::time::timeout;
use tracing::{error, info, warn};

use super::chunker::chunk;
use crate::ai::{RetryPolicy, Summarizer, TagExtractor};
use crate::core::config::PipelineSettings;
use crate::core::models::{DigestSummary, PipelineResult, Stage};
use crate::errors::SummarizationError;

pub struct Pipeline<S, T> {
    summarizer: S,
    tagger: T,
    settings: PipelineSettings,
}

impl<S, T> Pipeline<S, T>
where
    S: Summarizer,
    T: TagExtractor,
{
    #[must_use]
    pub fn new(summarizer: S, tagger: T, settings: PipelineSettings) -> Self {
        Self {
            summarizer,
            tagger,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    #[must_use]
    pub fn summarizer(&self) -> &S {
        &self.summarizer
    }

    #[must_use]
    pub fn tagger(&self) -> &T {
        &self.tagger
    }

    /// Summarize and tag `source_text`.
    ///
    /// Chunks are summarized strictly in order and the first failing chunk
    /// ends the run. A tagging failure only leaves the tags empty.
    #[tracing::instrument(level = "info", skip_all, fields(url = %source_url))]
    pub async fn run(&self, source_url: &str, source_text: &str) -> PipelineResult {
        if source_text.trim().is_empty() {
            warn!(stage = %Stage::Extraction, "No article text to summarize");
            return PipelineResult::failure(
                Stage::Extraction,
                "No article text could be extracted from the page.",
                source_url,
            );
        }

        let chunks = chunk(source_text, self.settings.max_chunk_len);
        info!(
            chunks = chunks.len(),
            chars = source_text.chars().count(),
            "Summarizing article"
        );

        let mut fragments = Vec::with_capacity(chunks.len());
        for (index, piece) in chunks.iter().enumerate() {
            match self.summarize_chunk(piece.text).await {
                Ok(fragment) => fragments.push(fragment),
                Err(e) => {
                    error!(
                        stage = %Stage::Summarization,
                        chunk = index,
                        offset = piece.offset,
                        "Summarization failed: {}",
                        e
                    );
                    return PipelineResult::failure(Stage::Summarization, e.to_string(), source_url);
                }
            }
        }

        let merged_summary = fragments.join(" ");
        let (tags, tag_note) = self.tag(&merged_summary).await;

        PipelineResult::Success(DigestSummary {
            merged_summary,
            tags,
            source_url: source_url.to_string(),
            tag_note,
        })
    }

    async fn summarize_chunk(&self, text: &str) -> Result<String, SummarizationError> {
        let limit = self.settings.request_timeout;
        timeout(limit, self.summarizer.summarize(text))
            .await
            .unwrap_or(Err(SummarizationError::Timeout(limit)))
    }

    async fn tag(&self, summary: &str) -> (Vec<String>, Option<String>) {
        if !self.settings.tagging_enabled {
            return (Vec::new(), None);
        }

        let policy = RetryPolicy::new(
            self.settings.tag_retry_attempts,
            self.settings.tag_retry_delay,
        );

        match self
            .tagger
            .extract_tags(summary, self.settings.max_tags, &policy)
            .await
        {
            Ok(tags) => (tags, None),
            Err(e) => {
                warn!("Tag extraction failed, continuing without tags: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        }
    }
}
