//! The subset of a Slack Events API callback the pipeline cares about.

use serde::Deserialize;
use serde_json::Value;

use crate::utils::links::first_url;

#[derive(Debug, Clone, Deserialize)]
struct RawMessageEvent {
    #[serde(rename = "type")]
    event_type: String,
    channel: Option<String>,
    user: Option<String>,
    text: Option<String>,
    bot_id: Option<String>,
    subtype: Option<String>,
}

/// A chat message as seen by the core: where it was posted, who posted it,
/// whether it mentions the bot and its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub channel_id: String,
    pub user_id: String,
    pub mentions_bot: bool,
    pub raw_text: String,
}

impl ChatEvent {
    /// Interpret the `event` object of an `event_callback`.
    ///
    /// Returns `None` for events that are not user-authored messages
    /// (bot posts, edits, joins) so the bot never answers itself.
    #[must_use]
    pub fn from_event(event: &Value) -> Option<Self> {
        let raw: RawMessageEvent = serde_json::from_value(event.clone()).ok()?;

        if raw.bot_id.is_some() || raw.subtype.is_some() {
            return None;
        }

        let mentions_bot = match raw.event_type.as_str() {
            "app_mention" => true,
            "message" => false,
            _ => return None,
        };

        Some(Self {
            channel_id: raw.channel?,
            user_id: raw.user.unwrap_or_default(),
            mentions_bot,
            raw_text: raw.text.unwrap_or_default(),
        })
    }

    /// URL the bot was asked to summarize, if any.
    #[must_use]
    pub fn requested_url(&self) -> Option<String> {
        first_url(&self.raw_text)
    }
}
