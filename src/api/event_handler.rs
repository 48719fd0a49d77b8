//! Handler for Slack Events API callbacks.
//!
//! A mention of the bot that carries a URL becomes a `ProcessingTask` on the
//! queue; everything else is acknowledged and dropped.

use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use super::helpers::{ok_challenge, ok_empty};
use super::sqs;
use crate::core::config::AppConfig;
use crate::core::models::ProcessingTask;
use crate::slack::ChatEvent;

/// What to do with one Events API payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDecision {
    /// `url_verification` handshake; echo the challenge.
    Challenge(String),
    /// Queue this task for the worker.
    Enqueue(ProcessingTask),
    /// Acknowledge without doing anything.
    Ignore(&'static str),
}

/// Decide how to handle an Events API body without performing any I/O.
#[must_use]
pub fn decide(json_body: &Value, target_channel_id: Option<&str>) -> EventDecision {
    match json_body.get("type").and_then(Value::as_str) {
        Some("url_verification") => {
            let challenge = json_body
                .get("challenge")
                .and_then(Value::as_str)
                .unwrap_or("");
            return EventDecision::Challenge(challenge.to_string());
        }
        Some("event_callback") => {}
        _ => return EventDecision::Ignore("not an event callback"),
    }

    let Some(chat) = json_body.get("event").and_then(ChatEvent::from_event) else {
        return EventDecision::Ignore("not a user message");
    };

    if target_channel_id.is_some_and(|target| target != chat.channel_id) {
        return EventDecision::Ignore("outside the configured channel");
    }

    if !chat.mentions_bot {
        return EventDecision::Ignore("bot not mentioned");
    }

    let Some(url) = chat.requested_url() else {
        return EventDecision::Ignore("no URL in message");
    };

    EventDecision::Enqueue(ProcessingTask {
        correlation_id: Uuid::new_v4().to_string(),
        channel_id: chat.channel_id,
        user_id: chat.user_id,
        url,
    })
}

/// Handle an Events API payload and build the HTTP response for Slack.
pub async fn handle_event_callback(config: &AppConfig, json_body: &Value) -> Value {
    match decide(json_body, config.target_channel_id.as_deref()) {
        EventDecision::Challenge(challenge) => ok_challenge(&challenge),
        EventDecision::Enqueue(task) => {
            info!(
                correlation_id = %task.correlation_id,
                channel_id = %task.channel_id,
                url = %task.url,
                "Queueing summary request"
            );
            if let Err(e) = sqs::send_to_sqs(&task, config).await {
                error!(correlation_id = %task.correlation_id, "enqueue failed: {}", e);
            }
            ok_empty()
        }
        EventDecision::Ignore(reason) => {
            info!(reason, "Ignoring event");
            ok_empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mention(channel: &str, text: &str) -> Value {
        json!({
            "type": "event_callback",
            "event": {
                "type": "app_mention",
                "channel": channel,
                "user": "U1",
                "text": text,
                "ts": "1700000000.000100"
            }
        })
    }

    #[test]
    fn verification_echoes_challenge() {
        let body = json!({"type": "url_verification", "challenge": "abc123"});
        assert_eq!(decide(&body, None), EventDecision::Challenge("abc123".into()));
    }

    #[test]
    fn mention_with_url_is_enqueued() {
        let body = mention("C1", "<@U0BOT> tl;dr <https://blog.example/post?id=1&amp;x=2>");
        match decide(&body, None) {
            EventDecision::Enqueue(task) => {
                assert_eq!(task.channel_id, "C1");
                assert_eq!(task.user_id, "U1");
                assert_eq!(task.url, "https://blog.example/post?id=1&x=2");
                assert!(!task.correlation_id.is_empty());
            }
            other => panic!("expected enqueue, got {other:?}"),
        }
    }

    #[test]
    fn mention_without_url_is_ignored() {
        let body = mention("C1", "<@U0BOT> hello");
        assert_eq!(decide(&body, None), EventDecision::Ignore("no URL in message"));
    }

    #[test]
    fn other_channels_are_ignored_when_target_is_set() {
        let body = mention("C2", "<@U0BOT> https://x.io");
        assert_eq!(
            decide(&body, Some("C1")),
            EventDecision::Ignore("outside the configured channel")
        );
        assert!(matches!(decide(&body, Some("C2")), EventDecision::Enqueue(_)));
    }

    #[test]
    fn plain_messages_never_trigger() {
        let body = json!({
            "type": "event_callback",
            "event": {"type": "message", "channel": "C1", "user": "U1", "text": "https://x.io"}
        });
        assert_eq!(decide(&body, None), EventDecision::Ignore("bot not mentioned"));
    }
}
