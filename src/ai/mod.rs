//! Clients for the hosted inference backends

pub mod client;
pub mod keyphrase;
pub mod retry;
pub mod summarizer;

// Re-export main types for convenience
pub use client::InferenceClient;
pub use keyphrase::{HostedTagExtractor, TagExtractor};
pub use retry::{RetryError, RetryPolicy};
pub use summarizer::{HostedSummarizer, Summarizer};
