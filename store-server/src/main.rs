use store_server::{api, Config, ServerState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; environment variables win
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("store_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        port = config.http_port,
        db = %config.database_path,
        environment = %config.environment,
        "Store server starting"
    );

    let state = ServerState::initialize(&config).await?;
    let app = api::app_router().with_state(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
