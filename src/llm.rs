use serde::{Deserialize, Serialize};
use reqwest::Client;
use crate::error::{Result, AppError};

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

// Every level is optional; blocked or partial responses omit parts of the tree.
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

pub async fn call_gemini(
    client: &Client,
    base_url: &str,
    model: &str,
    api_key: &str,
    prompt: &str,
) -> Result<String> {
    let url = format!("{}/models/{}:generateContent", base_url, model);
    let body = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
    };

    tracing::debug!(endpoint = %url, prompt_chars = prompt.chars().count(), "Calling generative API");

    let res = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&body)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "Generative API request failed: {}",
            status.as_u16()
        )));
    }

    let parsed: GenerateResponse = res
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Invalid response from generative API: {}", e.without_url())))?;

    let reply = parsed
        .first_text()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AppError::Upstream("Generative API returned an empty response".to_string()))?;

    Ok(reply)
}
