//! Abstractive summarization of a single chunk.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::client::{BackendErrorBody, InferenceClient};
use crate::errors::SummarizationError;

/// Something that turns one chunk of article text into a short summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// # Errors
    ///
    /// Any backend failure; callers must not retry.
    async fn summarize(&self, chunk: &str) -> Result<String, SummarizationError>;
}

#[derive(Debug, Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct GenerationParameters {
    min_length: u32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummarizationResponse {
    Many(Vec<SummaryItem>),
    One(SummaryItem),
}

/// Summarizer backed by a hosted sequence-to-sequence model.
#[derive(Debug, Clone)]
pub struct HostedSummarizer {
    client: InferenceClient,
    parameters: GenerationParameters,
}

impl HostedSummarizer {
    /// `min_length` is forwarded to the model; decoding is always greedy.
    #[must_use]
    pub fn new(client: InferenceClient, min_length: u32) -> Self {
        Self {
            client,
            parameters: GenerationParameters {
                min_length,
                do_sample: false,
            },
        }
    }
}

#[async_trait]
impl Summarizer for HostedSummarizer {
    async fn summarize(&self, chunk: &str) -> Result<String, SummarizationError> {
        #[cfg(feature = "debug-logs")]
        tracing::info!("Summarizing chunk:\n{}", chunk);

        let request = SummarizationRequest {
            inputs: chunk,
            parameters: self.parameters,
        };

        let response = self.client.post_json(&request).await.map_err(|e| {
            if e.is_timeout() {
                SummarizationError::Timeout(self.client.timeout())
            } else {
                SummarizationError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummarizationError::Http(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let parsed = BackendErrorBody::parse(&body);
            error!(status = %status, "Summarization backend error: {}", parsed.message);
            return Err(SummarizationError::Status {
                status: status.as_u16(),
                body: parsed.message,
            });
        }

        let parsed: SummarizationResponse = serde_json::from_str(&body)
            .map_err(|e| SummarizationError::Malformed(format!("{e}: {body}")))?;

        let summary = match parsed {
            SummarizationResponse::Many(items) => items.into_iter().next().map(|i| i.summary_text),
            SummarizationResponse::One(item) => Some(item.summary_text),
        }
        .ok_or_else(|| SummarizationError::Malformed("empty summary list".to_string()))?;

        debug!(
            input_chars = chunk.chars().count(),
            summary_chars = summary.chars().count(),
            "Chunk summarized"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn summarizer(server: &mockito::Server) -> HostedSummarizer {
        let client = InferenceClient::new(
            format!("{}/models/bart", server.url()),
            "hf_test",
            Duration::from_secs(5),
        )
        .unwrap();
        HostedSummarizer::new(client, 50)
    }

    #[tokio::test]
    async fn sends_generation_parameters_and_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/bart")
            .match_header("authorization", "Bearer hf_test")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "inputs": "Some long article text.",
                "parameters": {"min_length": 50, "do_sample": false}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"summary_text":"Short summary."}]"#)
            .create_async()
            .await;

        let summary = summarizer(&server)
            .summarize("Some long article text.")
            .await
            .unwrap();

        assert_eq!(summary, "Short summary.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn accepts_a_bare_object_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/bart")
            .with_status(200)
            .with_body(r#"{"summary_text":"Bare."}"#)
            .create_async()
            .await;

        assert_eq!(summarizer(&server).summarize("x").await.unwrap(), "Bare.");
    }

    #[tokio::test]
    async fn non_success_status_carries_backend_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/bart")
            .with_status(400)
            .with_body(r#"{"error":"Input is too long"}"#)
            .create_async()
            .await;

        let err = summarizer(&server).summarize("x").await.unwrap_err();
        match err {
            SummarizationError::Status { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "Input is too long");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_list_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/bart")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let err = summarizer(&server).summarize("x").await.unwrap_err();
        assert!(matches!(err, SummarizationError::Malformed(_)));
    }

    #[tokio::test]
    async fn unexpected_shape_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/bart")
            .with_status(200)
            .with_body(r#"[{"generated_text":"wrong model"}]"#)
            .create_async()
            .await;

        let err = summarizer(&server).summarize("x").await.unwrap_err();
        assert!(matches!(err, SummarizationError::Malformed(_)));
    }
}
