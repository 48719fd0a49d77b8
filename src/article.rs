//! Fetches a web page and pulls out its article text.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::core::config::ExtractionMode;
use crate::errors::{BotError, ExtractionError};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:91.0) Gecko/20100101 Firefox/91.0";
const RENDER_WIDTH: usize = 200;

/// Source of article text for a URL.
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    /// Returns the plain article text, possibly empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or decoded.
    async fn extract(&self, url: &str) -> Result<String, ExtractionError>;
}

pub struct HttpArticleExtractor {
    http: Client,
    mode: ExtractionMode,
}

impl HttpArticleExtractor {
    /// # Errors
    ///
    /// Returns `BotError::HttpError` if the HTTP client cannot be built.
    pub fn new(timeout: Duration, mode: ExtractionMode) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build page HTTP client: {e}")))?;
        Ok(Self { http, mode })
    }
}

#[async_trait]
impl ArticleExtractor for HttpArticleExtractor {
    async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        let parsed = Url::parse(url).map_err(|e| ExtractionError::InvalidUrl(format!("{url}: {e}")))?;

        let response = self
            .http
            .get(parsed)
            .send()
            .await
            .map_err(|e| ExtractionError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ExtractionError::Decode(e.to_string()))?;
        debug!(bytes = html.len(), "Fetched page");

        let text = html_to_article_text(&html, self.mode)?;
        info!(chars = text.chars().count(), mode = ?self.mode, "Extracted article text");
        Ok(text)
    }
}

/// Convert a fetched HTML document to single-line article text.
///
/// # Errors
///
/// Returns `ExtractionError::Decode` if the document cannot be rendered.
pub fn html_to_article_text(html: &str, mode: ExtractionMode) -> Result<String, ExtractionError> {
    match mode {
        ExtractionMode::Paragraphs => Ok(paragraph_text(html)),
        ExtractionMode::FullPage => html2text::from_read(html.as_bytes(), RENDER_WIDTH)
            .map(|rendered| collapse_whitespace(&rendered))
            .map_err(|e| ExtractionError::Decode(e.to_string())),
    }
}

/// Text of every `<p>` element, joined with a single space.
///
/// The document is parsed as a browser would, so unclosed paragraphs,
/// character references and markup inside `<script>` are handled.
#[must_use]
pub fn paragraph_text(html: &str) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
