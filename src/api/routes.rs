use axum::{
    routing::post,
    Router,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Json, Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::time::Instant;

use crate::error::{Result, AppError};
use crate::api::models::{ArticleSource, ArticleSummary, SearchRequest, SummarizeRequest};
use crate::news::{search_news, NewsArticle};
use crate::prompt::{build_key_points_prompt, build_structured_prompt, MAX_ARTICLE_CHARS};
use crate::scraper::{extract_article_text, fetch_html};
use crate::llm::call_gemini;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let body_limit = app_state.config.max_body_bytes;

    Router::new()
        .route(
            "/api/fetch-news",
            post(fetch_news_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/summarize-article",
            post(summarize_article_handler).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(middleware::from_fn(reject_bare_options))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

// CorsLayer answers every OPTIONS request; only real preflights may reach it.
async fn reject_bare_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS
        && !request.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
    {
        return AppError::MethodNotAllowed.into_response();
    }
    next.run(request).await
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(format!("Request body too large: {}", rejection.body_text()));
    }
    AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
}

async fn fetch_news_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<NewsArticle>>> {
    let Json(req) = payload.map_err(invalid_body)?;
    let keyword = req.keyword()?;
    let api_key = state.config.resolve_gnews_key(req.gnews_api_key.as_deref())?;

    let start_time = Instant::now();
    let articles = search_news(&state.http, &state.config.gnews_base_url, &api_key, keyword).await?;

    tracing::info!(
        keyword = %keyword,
        count = articles.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "News search completed"
    );
    Ok(Json(articles))
}

async fn summarize_article_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<ArticleSummary>> {
    let Json(req) = payload.map_err(invalid_body)?;
    let source = req.source()?;
    let api_key = state.config.resolve_gemini_key(req.gemini_api_key.as_deref())?;

    let start_time = Instant::now();
    let summary = process_summarize_request(&state, &source, &api_key).await?;

    tracing::info!(
        summary_chars = summary.chars().count(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Summary generated"
    );
    Ok(Json(ArticleSummary { summary }))
}

async fn process_summarize_request(
    state: &AppState,
    source: &ArticleSource,
    api_key: &str,
) -> Result<String> {
    let prompt = match source {
        ArticleSource::Text(text) => {
            tracing::info!(text_chars = text.chars().count(), "Summarizing supplied article text");
            build_structured_prompt(text)
        }
        ArticleSource::Url(url) => {
            tracing::info!(article_url = %url, "Fetching article");
            let html = fetch_html(&state.http, url).await?;
            let text = extract_article_text(state.extractor.as_ref(), &html)?;

            let text_chars = text.chars().count();
            tracing::info!(article_url = %url, text_chars, "Extracted article text");
            if text_chars > MAX_ARTICLE_CHARS {
                tracing::debug!(
                    text_chars,
                    kept = MAX_ARTICLE_CHARS,
                    "Article text truncated for prompt"
                );
            }

            build_key_points_prompt(&text)
        }
    };

    call_gemini(
        &state.http,
        &state.config.gemini_base_url,
        &state.config.gemini_model,
        api_key,
        &prompt,
    )
    .await
}
