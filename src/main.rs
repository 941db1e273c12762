use secret_vault_api::app::{app, AppState};
use secret_vault_api::{config, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Secret Vault API in {:?} mode", config.environment);

    let repository = database::repository_from_config().await?;
    let state = AppState { repository };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("🚀 Secret Vault API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
