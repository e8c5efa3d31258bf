use reqwest::Client;
use scraper::{Html, Selector};
use once_cell::sync::Lazy;
use crate::error::{AppError, Result};

pub const MIN_ARTICLE_CHARS: usize = 100;

// Compiled once; the selector is a constant.
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

/// Turns raw page markup into the plain text that gets summarized.
pub trait BodyExtractor: Send + Sync {
    fn extract_body_text(&self, markup: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ParagraphExtractor;

impl BodyExtractor for ParagraphExtractor {
    fn extract_body_text(&self, markup: &str) -> String {
        let document = Html::parse_document(markup);

        let mut raw = String::with_capacity(markup.len() / 4);
        for element in document.select(&PARAGRAPH_SELECTOR) {
            for chunk in element.text() {
                raw.push_str(chunk);
            }
            raw.push(' ');
        }

        collapse_whitespace(&raw)
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "Failed to fetch article: {}",
            status
        )));
    }

    let html = response.text().await?;
    Ok(html)
}

pub fn extract_article_text(extractor: &dyn BodyExtractor, markup: &str) -> Result<String> {
    let text = extractor.extract_body_text(markup);
    let chars = text.chars().count();
    if chars < MIN_ARTICLE_CHARS {
        return Err(AppError::Extraction(format!(
            "Could not extract enough article text ({} characters)",
            chars
        )));
    }
    Ok(text)
}
