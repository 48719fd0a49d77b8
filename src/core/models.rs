use serde::{Deserialize, Serialize};
use std::fmt;

/// Work item handed from the API function to the worker through SQS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingTask {
    pub correlation_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub url: String,
}

/// Pipeline step a failed run stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extraction,
    Summarization,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extraction => f.write_str("extraction"),
            Stage::Summarization => f.write_str("summarization"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSummary {
    pub merged_summary: String,
    /// Backend relevance order, at most `max_tags` entries.
    pub tags: Vec<String>,
    pub source_url: String,
    /// Why tags are missing, when tag extraction failed.
    pub tag_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestFailure {
    pub stage: Stage,
    pub message: String,
    pub source_url: String,
}

/// Outcome of one pipeline run; the only input of the reply formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Success(DigestSummary),
    Failure(DigestFailure),
}

impl PipelineResult {
    #[must_use]
    pub fn failure(stage: Stage, message: impl Into<String>, source_url: impl Into<String>) -> Self {
        PipelineResult::Failure(DigestFailure {
            stage,
            message: message.into(),
            source_url: source_url.into(),
        })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success(_))
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        match self {
            PipelineResult::Success(s) => &s.source_url,
            PipelineResult::Failure(f) => &f.source_url,
        }
    }
}
