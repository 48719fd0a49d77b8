use crate::core::{config::AppConfig, models::ProcessingTask};
use crate::errors::BotError;
use aws_sdk_sqs::Client as SqsClient;

/// # Errors
///
/// Returns an error if serialization fails or the message cannot be sent to SQS.
pub async fn send_to_sqs(task: &ProcessingTask, config: &AppConfig) -> Result<(), BotError> {
    let queue_url = config.queue_url()?;
    let shared_config = aws_config::load_from_env().await;
    let client = SqsClient::new(&shared_config);
    let message_body = serde_json::to_string(task)
        .map_err(|e| BotError::GeneralError(format!("Failed to serialize task: {e}")))?;

    client
        .send_message()
        .queue_url(queue_url)
        .message_body(message_body)
        .send()
        .await
        .map_err(|e| BotError::AwsError(format!("Failed to send message to SQS: {e}")))?;
    Ok(())
}
