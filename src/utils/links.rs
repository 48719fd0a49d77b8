//! Picks the article URL out of a chat message.

/// Return the first whitespace-delimited token that starts with `http`.
///
/// Slack delivers links as `<https://example.com|label>` or
/// `<https://example.com>` and escapes `&` as `&amp;`, so each token is
/// unwrapped before the prefix check. Nothing beyond the prefix is validated.
#[must_use]
pub fn first_url(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(unwrap_slack_link)
        .find(|token| token.starts_with("http"))
        .map(|token| token.replace("&amp;", "&"))
}

/// Strip Slack's angle-bracket link markup from a single token.
#[must_use]
pub fn unwrap_slack_link(token: &str) -> &str {
    let Some(inner) = token.strip_prefix('<') else {
        return token;
    };
    let end = inner.find(['|', '>']).unwrap_or(inner.len());
    &inner[..end]
}
