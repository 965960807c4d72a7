//! Web-page capture for `t2p note web`.
//!
//! Deliberately primitive: fetch the page and regex out the title, the
//! description meta tag, and the first h1. No HTML parser; pages that
//! resist this get handed to the LLM instead.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::AssistError;

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static META_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<meta\s+name=["']description["']\s+content=["'](.*?)["']"#).unwrap()
});
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// What the scrape recovered from a page.
#[derive(Debug, Clone)]
pub struct PageCapture {
    pub title: String,
    /// Remaining extracted fragments, in page order.
    pub lines: Vec<String>,
}

/// Fetches pages and scrapes the few fragments the capture flow needs.
pub struct WebCapture {
    client: reqwest::Client,
}

impl WebCapture {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch `url` and extract title/description/h1 fragments.
    ///
    /// `Ok(None)` means the page loaded but nothing recognizable was found.
    pub async fn fetch(&self, url: &str) -> Result<Option<PageCapture>, AssistError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssistError::Http(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AssistError::Http(e.to_string()))?;

        let mut fragments: Vec<String> = Vec::new();
        for re in [&*TITLE, &*META_DESCRIPTION, &*H1] {
            if let Some(caps) = re.captures(&html) {
                let text = strip_tags(&caps[1]);
                if !text.is_empty() {
                    fragments.push(text);
                }
            }
        }

        debug!(url, fragments = fragments.len(), "Captured page");

        let mut iter = fragments.into_iter();
        match iter.next() {
            Some(title) => Ok(Some(PageCapture {
                title,
                lines: iter.collect(),
            })),
            None => Ok(None),
        }
    }
}

impl Default for WebCapture {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_tags(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
