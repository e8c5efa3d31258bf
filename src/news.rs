use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

pub const SEARCH_LANG: &str = "ja";
pub const SEARCH_COUNTRY: &str = "jp";
pub const SEARCH_MAX_RESULTS: u32 = 10;

// Passed through exactly as the provider sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NewsArticle(pub Value);

#[derive(Deserialize)]
struct SearchResponse {
    articles: Option<Value>,
}

#[derive(Deserialize)]
struct SearchErrorResponse {
    errors: Option<Value>,
}

impl SearchResponse {
    fn into_articles(self) -> Vec<NewsArticle> {
        match self.articles {
            Some(Value::Array(items)) => items.into_iter().map(NewsArticle).collect(),
            _ => Vec::new(),
        }
    }
}

impl SearchErrorResponse {
    fn joined(&self) -> Option<String> {
        let messages: Vec<String> = match self.errors.as_ref()? {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            // GNews sometimes reports errors as an object keyed by field.
            Value::Object(map) => map
                .values()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect(),
            Value::String(s) => vec![s.clone()],
            _ => Vec::new(),
        };

        if messages.is_empty() {
            None
        } else {
            Some(messages.join(", "))
        }
    }
}

pub async fn search_news(
    client: &Client,
    base_url: &str,
    api_key: &str,
    keyword: &str,
) -> Result<Vec<NewsArticle>> {
    let endpoint = format!("{}/search", base_url);
    let max = SEARCH_MAX_RESULTS.to_string();

    tracing::info!(
        endpoint = %endpoint,
        keyword = %keyword,
        lang = SEARCH_LANG,
        country = SEARCH_COUNTRY,
        max = SEARCH_MAX_RESULTS,
        "Searching news provider"
    );

    let response = client
        .get(&endpoint)
        .query(&[
            ("q", keyword),
            ("lang", SEARCH_LANG),
            ("country", SEARCH_COUNTRY),
            ("max", max.as_str()),
            ("apikey", api_key),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<SearchErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.joined())
            .unwrap_or_else(|| "Unknown error".to_string());

        return Err(AppError::Upstream(format!(
            "GNews API request failed: {} {}",
            status.as_u16(),
            detail
        )));
    }

    let body: SearchResponse = response.json().await?;
    Ok(body.into_articles())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors_of(body: Value) -> Option<String> {
        serde_json::from_value::<SearchErrorResponse>(body).unwrap().joined()
    }

    #[test]
    fn error_list_is_joined() {
        let joined = errors_of(json!({ "errors": ["Invalid key", "Quota exceeded"] }));
        assert_eq!(joined.as_deref(), Some("Invalid key, Quota exceeded"));
    }

    #[test]
    fn missing_or_empty_errors_yield_none() {
        assert_eq!(errors_of(json!({})), None);
        assert_eq!(errors_of(json!({ "errors": [] })), None);
        assert_eq!(errors_of(json!({ "errors": null })), None);
    }

    #[test]
    fn error_object_values_are_joined() {
        let joined = errors_of(json!({ "errors": { "q": "The q parameter is required." } }));
        assert_eq!(joined.as_deref(), Some("The q parameter is required."));
    }

    #[test]
    fn articles_pass_through_untouched() {
        let body: SearchResponse = serde_json::from_value(json!({
            "totalArticles": 2,
            "articles": [
                { "title": "a", "url": "https://a.example", "extra": { "nested": true } },
                { "title": "b" }
            ]
        }))
        .unwrap();

        let articles = body.into_articles();
        assert_eq!(articles.len(), 2);
        assert_eq!(
            serde_json::to_value(&articles[0]).unwrap(),
            json!({ "title": "a", "url": "https://a.example", "extra": { "nested": true } })
        );
    }

    #[test]
    fn absent_or_non_array_articles_are_empty() {
        for body in [json!({}), json!({ "articles": null }), json!({ "articles": "nope" })] {
            let parsed: SearchResponse = serde_json::from_value(body).unwrap();
            assert!(parsed.into_articles().is_empty());
        }
    }
}
