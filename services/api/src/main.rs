use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use health_api::{
    AppState, assistant::AssistantGateway, config::AppConfig, routes::create_router,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting health assistant service");

    let config = AppConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let gateway = AssistantGateway::from_settings(&config.assistant)?;
    if !gateway.is_configured() {
        info!("Questions will be answered with a configuration notice");
    }

    let app_state = AppState::new(pool, gateway);

    // Start the web server
    let app = create_router(app_state);

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Health assistant service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down health assistant service");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
