//! Turns a pipeline result into chat messages that respect the size cap.
//!
//! Overflow is handled by truncating on character count, never by failing.

use crate::core::models::{DigestFailure, DigestSummary, PipelineResult};

/// Hard per-message cap of the chat platform, in characters.
pub const MESSAGE_CHAR_LIMIT: usize = 2000;
/// Characters of summary kept when the full reply does not fit.
pub const TRUNCATED_SUMMARY_CHARS: usize = 1800;
pub const ELLIPSIS: &str = "...";

pub const SUMMARY_HEADER: &str = "*Summary:*";
pub const TRUNCATED_SUMMARY_HEADER: &str = "*Summary (truncated):*";
pub const TOO_LONG_NOTICE: &str = "Summary is too long, it's better to read for yourself.";
pub const TAGS_LABEL: &str = "*Tags:*";
pub const NO_TAGS_FOUND: &str = "none found";
pub const TAGS_UNAVAILABLE: &str = "unavailable right now";

const LINK_LABEL: &str = "Read the full article here";
const MAX_ERROR_DETAIL_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Whether a tags line is part of the reply at all.
    pub show_tags: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { show_tags: true }
    }
}

/// Build the ordered list of messages to post for `result`.
/// Every returned string is at most [`MESSAGE_CHAR_LIMIT`] characters.
#[must_use]
pub fn format_reply(result: &PipelineResult, options: FormatOptions) -> Vec<String> {
    let messages = match result {
        PipelineResult::Success(summary) => format_summary(summary, options),
        PipelineResult::Failure(failure) => vec![format_failure(failure)],
    };

    messages.into_iter().map(|m| clamp(&m)).collect()
}

fn format_summary(summary: &DigestSummary, options: FormatOptions) -> Vec<String> {
    let link = article_link(&summary.source_url);
    let full = format!("{SUMMARY_HEADER}\n{}\n{link}", summary.merged_summary);

    let mut messages = if char_len(&full) <= MESSAGE_CHAR_LIMIT {
        vec![full]
    } else if char_len(&summary.merged_summary) <= TRUNCATED_SUMMARY_CHARS {
        // Only the link overflows; the summary itself is never cut.
        vec![format!("{SUMMARY_HEADER}\n{}", summary.merged_summary), link]
    } else {
        let prefix = take_chars(&summary.merged_summary, TRUNCATED_SUMMARY_CHARS);
        vec![
            format!("{TRUNCATED_SUMMARY_HEADER}\n{prefix}{ELLIPSIS}\n{link}"),
            format!("{TOO_LONG_NOTICE}\n{link}"),
        ]
    };

    if options.show_tags {
        let line = tags_line(summary);
        match messages.last_mut() {
            Some(last) if char_len(last) + 1 + char_len(&line) <= MESSAGE_CHAR_LIMIT => {
                last.push('\n');
                last.push_str(&line);
            }
            _ => messages.push(line),
        }
    }

    messages
}

fn format_failure(failure: &DigestFailure) -> String {
    let detail = if char_len(&failure.message) > MAX_ERROR_DETAIL_CHARS {
        format!("{}{ELLIPSIS}", take_chars(&failure.message, MAX_ERROR_DETAIL_CHARS))
    } else {
        failure.message.clone()
    };

    format!(
        "Sorry, I couldn't summarize <{}|that page> ({} failed): {detail}",
        failure.source_url, failure.stage
    )
}

/// The tags line for a successful run.
///
/// Empty tags are always reported: "none found" when the backend returned
/// nothing, "unavailable right now" when tag extraction failed.
#[must_use]
pub fn tags_line(summary: &DigestSummary) -> String {
    if !summary.tags.is_empty() {
        format!("{TAGS_LABEL} {}", summary.tags.join(", "))
    } else if summary.tag_note.is_some() {
        format!("{TAGS_LABEL} {TAGS_UNAVAILABLE}")
    } else {
        format!("{TAGS_LABEL} {NO_TAGS_FOUND}")
    }
}

fn article_link(url: &str) -> String {
    format!("<{url}|{LINK_LABEL}>")
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Last-resort guard so no message ever exceeds the platform cap.
fn clamp(message: &str) -> String {
    if char_len(message) <= MESSAGE_CHAR_LIMIT {
        return message.to_string();
    }
    let keep = MESSAGE_CHAR_LIMIT - ELLIPSIS.len();
    format!("{}{ELLIPSIS}", take_chars(message, keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Stage;

    fn success(summary: &str, tags: &[&str]) -> PipelineResult {
        PipelineResult::Success(DigestSummary {
            merged_summary: summary.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            source_url: "https://example.com/post".to_string(),
            tag_note: None,
        })
    }

    #[test]
    fn take_chars_respects_code_points() {
        assert_eq!(take_chars("añb", 2), "añ");
        assert_eq!(take_chars("ab", 5), "ab");
    }

    #[test]
    fn clamp_limits_long_messages() {
        let long = "x".repeat(MESSAGE_CHAR_LIMIT + 10);
        let clamped = clamp(&long);
        assert_eq!(char_len(&clamped), MESSAGE_CHAR_LIMIT);
        assert!(clamped.ends_with(ELLIPSIS));
    }

    #[test]
    fn tags_are_not_shown_when_disabled() {
        let messages = format_reply(&success("Fine.", &["a"]), FormatOptions { show_tags: false });
        assert_eq!(messages.len(), 1);
        assert!(!messages[0].contains(TAGS_LABEL));
    }

    #[test]
    fn oversized_url_still_fits() {
        let mut result = success("Short.", &[]);
        if let PipelineResult::Success(s) = &mut result {
            s.source_url = format!("https://example.com/{}", "p".repeat(5000));
        }
        let messages = format_reply(&result, FormatOptions::default());
        assert!(messages.iter().all(|m| char_len(m) <= MESSAGE_CHAR_LIMIT));
    }

    #[test]
    fn long_url_does_not_mark_short_summary_as_truncated() {
        let mut result = success("Short.", &["a"]);
        if let PipelineResult::Success(s) = &mut result {
            s.source_url = format!("https://example.com/{}", "p".repeat(2500));
        }
        let messages = format_reply(&result, FormatOptions::default());

        assert_eq!(messages[0], format!("{SUMMARY_HEADER}\nShort."));
        assert!(!messages[0].contains(TRUNCATED_SUMMARY_HEADER));
        assert!(!messages.iter().any(|m| m.contains(TOO_LONG_NOTICE)));
        assert!(messages.iter().any(|m| m.contains("*Tags:* a")));
        assert!(messages.iter().all(|m| char_len(m) <= MESSAGE_CHAR_LIMIT));
    }

    #[test]
    fn long_error_detail_is_shortened() {
        let result = PipelineResult::failure(Stage::Summarization, "e".repeat(1000), "https://x.y");
        let messages = format_reply(&result, FormatOptions::default());
        assert_eq!(messages.len(), 1);
        assert!(messages[0].len() < 500);
        assert!(messages[0].contains("summarization failed"));
    }
}
