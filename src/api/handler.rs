//! API Lambda handler.
//!
//! This module handles:
//! - Request validation (headers, body, signature)
//! - Dropping Slack redeliveries
//! - Event callbacks (delegated to `event_handler`)

use super::{event_handler, helpers, parsing, signature};
use crate::core::config::{AppConfig, Role};
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

pub use self::function_handler as handler;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Returns an error only when the configuration cannot be loaded; request
/// problems become 4xx response payloads.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<impl Serialize, Error> {
    let config = AppConfig::from_env(Role::Api).map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e.to_string())
    })?;

    Ok(route(&config, &event.payload).await)
}

/// Validate a Slack request and dispatch it.
pub async fn route(config: &AppConfig, payload: &Value) -> Value {
    let Some(headers) = payload.get("headers") else {
        error!("Request missing headers");
        return helpers::err_response(400, "Missing headers");
    };

    let body = match extract_body(payload) {
        Ok(b) => b,
        Err(response) => return response,
    };

    if let Err(response) = verify_signature(body, headers, config) {
        return response;
    }

    info!("Slack signature verified successfully");

    // Slack redelivers events it considers unacknowledged; the first delivery
    // already queued the work.
    if let Some(retry_num) = parsing::get_header_value(headers, "X-Slack-Retry-Num") {
        info!(retry_num, "Ignoring Slack retry delivery");
        return helpers::ok_empty();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(json_body) => event_handler::handle_event_callback(config, &json_body).await,
        Err(e) => {
            error!("Request body is not JSON: {}", e);
            helpers::err_response(400, "Invalid JSON body")
        }
    }
}

fn extract_body(payload: &Value) -> Result<&str, Value> {
    let Some(body) = payload.get("body") else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let Some(body_str) = body.as_str() else {
        error!("Request body is not a string");
        return Err(helpers::err_response(400, "Invalid body format"));
    };

    Ok(body_str)
}

fn verify_signature(body: &str, headers: &Value, config: &AppConfig) -> Result<(), Value> {
    let Some(sig) = parsing::get_header_value(headers, "X-Slack-Signature") else {
        error!("Missing X-Slack-Signature header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Signature header",
        ));
    };

    let Some(timestamp) = parsing::get_header_value(headers, "X-Slack-Request-Timestamp") else {
        error!("Missing X-Slack-Request-Timestamp header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Request-Timestamp header",
        ));
    };

    let secret = config.signing_secret().map_err(|e| {
        error!("{}", e);
        helpers::err_response(500, "Server misconfigured")
    })?;

    if !signature::verify_slack_signature(body, timestamp, sig, secret) {
        error!("Slack signature verification failed");
        return Err(helpers::err_response(401, "Invalid Slack signature"));
    }

    Ok(())
}
