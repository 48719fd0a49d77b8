use tracing::{error, info};

use crate::ai::{Summarizer, TagExtractor};
use crate::article::ArticleExtractor;
use crate::core::models::{PipelineResult, ProcessingTask, Stage};
use crate::errors::BotError;
use crate::pipeline::Pipeline;
use crate::slack::{FormatOptions, MessageSink, format_reply};

/// Extract, summarize, format and post the reply for one task.
///
/// Pipeline failures are reported to the channel, not returned; only a
/// delivery failure is an `Err`.
///
/// # Errors
///
/// Returns an error if a reply message could not be posted.
pub async fn process_task<E, S, T, M>(
    task: &ProcessingTask,
    extractor: &E,
    pipeline: &Pipeline<S, T>,
    sink: &M,
) -> Result<PipelineResult, BotError>
where
    E: ArticleExtractor + ?Sized,
    S: Summarizer,
    T: TagExtractor,
    M: MessageSink + ?Sized,
{
    info!(
        correlation_id = %task.correlation_id,
        url = %task.url,
        "Processing summary request"
    );

    let result = match extractor.extract(&task.url).await {
        Ok(text) => pipeline.run(&task.url, &text).await,
        Err(e) => PipelineResult::failure(Stage::Extraction, e.to_string(), &task.url),
    };

    if let PipelineResult::Failure(failure) = &result {
        error!(
            correlation_id = %task.correlation_id,
            url = %failure.source_url,
            stage = %failure.stage,
            "Pipeline failed: {}",
            failure.message
        );
    }

    let options = FormatOptions {
        show_tags: pipeline.settings().tagging_enabled,
    };
    let messages = format_reply(&result, options);

    for message in &messages {
        sink.send(&task.channel_id, message).await?;
    }

    info!(
        correlation_id = %task.correlation_id,
        messages = messages.len(),
        success = result.is_success(),
        "Reply delivered"
    );

    Ok(result)
}
