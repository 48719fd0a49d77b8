use std::time::{SystemTime, UNIX_EPOCH};

use linkdigest::api::handler::route;
use linkdigest::api::signature::compute_signature;
use linkdigest::core::config::{AppConfig, PipelineSettings};
use serde_json::{Value, json};

/// Tests for request validation in the API Lambda.
/// None of these reach the queue: they stop at verification or are ignored.

const SECRET: &str = "test-signing-secret";

fn config() -> AppConfig {
    AppConfig {
        processing_queue_url: Some("https://sqs.example/queue".to_string()),
        slack_signing_secret: Some(SECRET.to_string()),
        slack_bot_token: None,
        hf_api_token: None,
        target_channel_id: None,
        summarization_url: "https://example.com/summarize".to_string(),
        keyphrase_url: "https://example.com/keyphrases".to_string(),
        pipeline: PipelineSettings::default(),
    }
}

fn now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
        .to_string()
}

fn signed_request(body: &str, extra_headers: &[(&str, &str)]) -> Value {
    let ts = now();
    let mut headers = json!({
        "x-slack-request-timestamp": ts,
        "x-slack-signature": compute_signature(&ts, body, SECRET),
    });
    for (name, value) in extra_headers {
        headers[*name] = json!(value);
    }
    json!({ "headers": headers, "body": body })
}

#[tokio::test]
async fn test_url_verification_echoes_challenge() {
    let body = json!({"type": "url_verification", "challenge": "c-123"}).to_string();

    let response = route(&config(), &signed_request(&body, &[])).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["body"], "c-123");
}

#[tokio::test]
async fn test_bad_signature_is_rejected() {
    let body = json!({"type": "url_verification", "challenge": "c-123"}).to_string();
    let mut request = signed_request(&body, &[]);
    request["headers"]["x-slack-signature"] = json!("v0=00ff");

    let response = route(&config(), &request).await;

    assert_eq!(response["statusCode"], 401);
}

#[tokio::test]
async fn test_missing_headers_is_a_bad_request() {
    let response = route(&config(), &json!({ "body": "{}" })).await;

    assert_eq!(response["statusCode"], 400);
}

#[tokio::test]
async fn test_slack_retries_are_acknowledged_without_processing() {
    let body = json!({"type": "url_verification", "challenge": "c-123"}).to_string();
    let request = signed_request(&body, &[("X-Slack-Retry-Num", "1")]);

    let response = route(&config(), &request).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["body"], "{}");
}

#[tokio::test]
async fn test_mention_without_url_is_ignored() {
    let body = json!({
        "type": "event_callback",
        "event": {
            "type": "app_mention",
            "channel": "C1",
            "user": "U1",
            "text": "<@UBOT> what's up"
        }
    })
    .to_string();

    let response = route(&config(), &signed_request(&body, &[])).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["body"], "{}");
}
