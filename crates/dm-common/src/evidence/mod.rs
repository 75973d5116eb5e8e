//! Home-page evidence for the WebPageRef test.
//!
//! The fetch and the HTML-to-text step sit behind traits so the rest of the
//! engine can run against stubs without touching the network.

mod http;

use async_trait::async_trait;
use mime::Mime;
use regex::Regex;
use tracing::debug;

use crate::error::{FetchError, MatchError};
pub use http::HttpPageFetcher;

/// A fetched home page. The status is informational only; any response body
/// is inspected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    /// Raw `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Fetches `http://<domain>/`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, domain: &str) -> Result<FetchedPage, FetchError>;
}

/// Turns an HTML document into its visible text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, html: &[u8]) -> Result<String, MatchError>;
}

/// `html2text` rendering without line wrapping. Script and style content is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html2TextExtractor;

impl TextExtractor for Html2TextExtractor {
    fn extract_text(&self, html: &[u8]) -> Result<String, MatchError> {
        Ok(html2text::from_read(html, usize::MAX)?)
    }
}

/// Whether a `Content-Type` value names an HTML document.
///
/// A missing or malformed header is an error; any other media type is `false`.
pub fn is_html(content_type: Option<&str>) -> Result<bool, MatchError> {
    let raw = content_type.unwrap_or_default();
    let mime: Mime = raw.trim().parse().map_err(|_| MatchError::ContentType {
        value: raw.to_string(),
    })?;
    Ok(mime.essence_str().eq_ignore_ascii_case("text/html"))
}

/// Fetches the domain's home page and looks for the phrase pattern in its text.
pub async fn web_page_ref(
    domain: &str,
    pattern: &Regex,
    fetcher: &dyn PageFetcher,
    extractor: &dyn TextExtractor,
) -> Result<bool, MatchError> {
    let page = fetcher.fetch(domain).await?;

    if !is_html(page.content_type.as_deref())? {
        debug!(
            url = %page.url,
            content_type = page.content_type.as_deref().unwrap_or(""),
            "home page is not html"
        );
        return Ok(false);
    }

    let text = extractor.extract_text(&page.body)?;
    let found = pattern.is_match(&text);
    debug!(url = %page.url, status = page.status, text_len = text.len(), found, "scanned home page");
    Ok(found)
}
