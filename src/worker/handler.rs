use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::process::process_task;
use crate::ai::{HostedSummarizer, HostedTagExtractor, InferenceClient};
use crate::article::HttpArticleExtractor;
use crate::core::config::AppConfig;
use crate::core::models::ProcessingTask;
use crate::errors::BotError;
use crate::pipeline::Pipeline;
use crate::slack::SlackClient;

/// Long-lived clients shared by every invocation of a warm worker.
pub struct WorkerContext {
    pub extractor: HttpArticleExtractor,
    pub pipeline: Pipeline<HostedSummarizer, HostedTagExtractor>,
    pub slack: SlackClient,
}

impl WorkerContext {
    /// # Errors
    ///
    /// Returns an error if a worker credential is missing or an HTTP client
    /// cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, BotError> {
        let settings = config.pipeline.clone();
        let token = config.inference_token()?;
        let summarizer = HostedSummarizer::new(
            InferenceClient::new(
                config.summarization_url.clone(),
                token,
                settings.request_timeout,
            )?,
            settings.summary_min_length,
        );
        let tagger = HostedTagExtractor::new(InferenceClient::new(
            config.keyphrase_url.clone(),
            token,
            settings.request_timeout,
        )?);

        Ok(Self {
            extractor: HttpArticleExtractor::new(settings.request_timeout, settings.extraction_mode)?,
            pipeline: Pipeline::new(summarizer, tagger, settings),
            slack: SlackClient::new(config.bot_token()?.to_string()),
        })
    }
}

/// Pull every `ProcessingTask` out of an SQS event. Records that cannot be
/// decoded are returned as errors so the rest of the batch still runs.
#[must_use]
pub fn tasks_from_sqs_event(payload: &Value) -> Vec<Result<ProcessingTask, BotError>> {
    let Some(records) = payload.get("Records").and_then(Value::as_array) else {
        return vec![Err(BotError::ParseError(
            "SQS event has no Records array".to_string(),
        ))];
    };

    records
        .iter()
        .map(|record| {
            let body = record
                .get("body")
                .and_then(Value::as_str)
                .ok_or_else(|| BotError::ParseError("SQS record has no body".to_string()))?;
            serde_json::from_str(body).map_err(|e| {
                BotError::ParseError(format!(
                    "Failed to parse SQS message body into ProcessingTask: {e}"
                ))
            })
        })
        .collect()
}

/// Lambda handler for the Worker entrypoint.
///
/// # Errors
///
/// Never fails for a bad record or a failed run; those are logged so that
/// one message cannot poison the batch.
pub async fn function_handler(ctx: &WorkerContext, event: LambdaEvent<Value>) -> Result<(), Error> {
    for task in tasks_from_sqs_event(&event.payload) {
        let task = match task {
            Ok(task) => task,
            Err(e) => {
                error!("Skipping SQS record: {}", e);
                continue;
            }
        };

        match process_task(&task, &ctx.extractor, &ctx.pipeline, &ctx.slack).await {
            Ok(result) => info!(
                correlation_id = %task.correlation_id,
                success = result.is_success(),
                "Task finished"
            ),
            Err(e) => error!(
                correlation_id = %task.correlation_id,
                "Failed to deliver reply: {}",
                e
            ),
        }
    }

    Ok(())
}
