use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use parkcheck_chat::ChatBackend;
use parkcheck_chat::cohere::CohereClient;
use parkcheck_model::adapter::ClassifierAdapter;
use parkcheck_server::config::ServerConfig;
use parkcheck_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let config = ServerConfig::load()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // A missing model leaves the clinical panel unavailable; the rest still works.
    let classifier = ClassifierAdapter::load(&config.model_path, &config.scaler_path);

    let chat = CohereClient::from_env()
        .with_endpoint(&config.chat.endpoint)
        .with_model(&config.chat.model)
        .with_temperature(config.chat.temperature);
    if !chat.is_configured() {
        tracing::warn!("COHERE_API_KEY not set, chat requests will fail");
    }

    let state = AppState::new(classifier, Arc::new(chat)).with_session_ttl(config.session_ttl());

    let sweeper = state.sessions.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        loop {
            tick.tick().await;
            sweeper.evict_idle().await;
        }
    });
    let app = parkcheck_server::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(bind = %config.bind, "parkcheck listening");
    axum::serve(listener, app).await?;

    Ok(())
}
