use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub keyword: Option<String>,
    pub gnews_api_key: Option<String>,
}

impl SearchRequest {
    pub fn keyword(&self) -> Result<&str> {
        non_empty(self.keyword.as_deref())
            .ok_or_else(|| AppError::Validation("A search keyword is required.".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub article_text: Option<String>,
    pub article_url: Option<String>,
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSource {
    Text(String),
    Url(String),
}

impl SummarizeRequest {
    // Pre-extracted text takes precedence over a URL.
    pub fn source(&self) -> Result<ArticleSource> {
        if let Some(text) = non_empty(self.article_text.as_deref()) {
            return Ok(ArticleSource::Text(text.to_string()));
        }
        if let Some(url) = non_empty(self.article_url.as_deref()) {
            return Ok(ArticleSource::Url(url.trim().to_string()));
        }
        Err(AppError::Validation(
            "Either articleText or articleUrl is required.".to_string(),
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub summary: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
