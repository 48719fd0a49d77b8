//! HTTP plumbing shared by the hosted inference backends.
//!
//! Both the summarization and keyphrase models sit behind the same kind of
//! endpoint: a JSON POST with a bearer token, answering with either the model
//! output or an `{"error": ...}` body.

use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::errors::BotError;

/// A configured endpoint for one hosted model.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: Client,
    endpoint: String,
    token: String,
    timeout: Duration,
}

impl InferenceClient {
    /// # Errors
    ///
    /// Returns `BotError::HttpError` if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build inference HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
            timeout,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST `body` as JSON with the bearer credential attached.
    ///
    /// # Errors
    ///
    /// Returns the transport error; non-2xx statuses are not errors here.
    pub async fn post_json<B>(&self, body: &B) -> Result<Response, reqwest::Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!(endpoint = %self.endpoint, "POST inference request");
        self.http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
    }
}

/// Parsed `{"error": ..., "estimated_time": ...}` body of a failed call.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendErrorBody {
    pub message: String,
    pub estimated_time: Option<f64>,
}

impl BackendErrorBody {
    /// Parse an error body, falling back to the raw text when it is not the
    /// usual JSON shape. `error` may be a string or a list of strings.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            return Self {
                message: raw.trim().to_string(),
                estimated_time: None,
            };
        };

        let message = match value.get("error") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
            _ => raw.trim().to_string(),
        };

        Self {
            message,
            estimated_time: value.get("estimated_time").and_then(Value::as_f64),
        }
    }

    /// The model is still being loaded onto the backend and should become
    /// available after a short wait.
    #[must_use]
    pub fn is_warming_up(&self) -> bool {
        self.estimated_time.is_some() || self.message.to_ascii_lowercase().contains("loading")
    }
}
