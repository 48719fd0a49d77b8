/// Linkdigest - A Slack bot that summarizes and tags the article behind a posted link.
///
/// This crate implements a two-Lambda architecture:
/// 1. An API Lambda that verifies Slack event callbacks and queues a task for
///    every mention that carries a URL
/// 2. A Worker Lambda that fetches the page, runs the summarization pipeline
///    and posts the formatted reply back to the channel
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - SQS for task queuing between Lambdas
/// - slack-morphism for Slack API interactions
/// - Hosted inference endpoints for summarization and keyphrase extraction
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use linkdigest::ai::{HostedSummarizer, HostedTagExtractor, InferenceClient};
/// use linkdigest::core::config::PipelineSettings;
/// use linkdigest::pipeline::Pipeline;
/// use linkdigest::slack::{FormatOptions, format_reply};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     linkdigest::setup_logging();
///
///     let settings = PipelineSettings::default();
///     let summarizer = HostedSummarizer::new(
///         InferenceClient::new(
///             "https://example.com/summarize".to_string(),
///             "hf_token".to_string(),
///             settings.request_timeout,
///         )?,
///         settings.summary_min_length,
///     );
///     let tagger = HostedTagExtractor::new(InferenceClient::new(
///         "https://example.com/keyphrases".to_string(),
///         "hf_token".to_string(),
///         settings.request_timeout,
///     )?);
///
///     let pipeline = Pipeline::new(summarizer, tagger, settings);
///     let result = pipeline
///         .run("https://example.com/post", "Some long article text.")
///         .await;
///
///     for message in format_reply(&result, FormatOptions::default()) {
///         println!("{message}");
///     }
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod article;
pub mod core;
pub mod errors;
pub mod pipeline;
pub mod slack;
pub mod utils;
pub mod worker;

pub use errors::BotError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. The level comes from `RUST_LOG` when set.
/// Calling it more than once is harmless; later calls leave the first
/// subscriber in place.
///
/// # Example
///
/// ```
/// // Initialize structured logging at the start of your Lambda handler
/// linkdigest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
