pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod news;
pub mod prompt;
pub mod scraper;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;
use reqwest::{Client, ClientBuilder};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::scraper::{BodyExtractor, ParagraphExtractor};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
    pub extractor: Arc<dyn BodyExtractor>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_extractor(config, Arc::new(ParagraphExtractor))
    }

    pub fn with_extractor(config: Config, extractor: Arc<dyn BodyExtractor>) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(config.http_timeout)
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(AppState {
            config: Arc::new(config),
            http,
            extractor,
        })
    }
}
