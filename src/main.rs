use tokio::net::TcpListener;
use news_digest::{
    config::Config,
    api::routes::create_router,
    telemetry::init_tracing,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(config.log_format);

    let server_addr = config.server_addr;
    if config.allow_client_api_keys {
        tracing::warn!("Accepting provider API keys from request bodies");
    }

    let app_state = AppState::new(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;

    tracing::info!(%server_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
