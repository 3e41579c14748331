use anyhow::Result;
use gemini_chat::{web, AppState, Config, GeneratorFactory};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_chat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting gemini-chat");

    // Configuration is read once; changing it requires a restart
    let config = Config::from_env()?;
    tracing::info!(
        model = %config.model,
        provider = ?config.provider.provider_type,
        timeout_secs = config.request_timeout.as_secs(),
        "configuration loaded"
    );

    let generator =
        GeneratorFactory::create(&config.provider, &config.model, config.request_timeout).await?;

    let listener = TcpListener::bind(config.socket_addr()).await?;
    web::serve(listener, AppState::new(generator)).await?;

    Ok(())
}
