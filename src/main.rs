use splitledger::api;
use splitledger::config::CONFIG;
use splitledger::{ExpenseRepository, InMemoryLedgerStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let repository = Arc::new(ExpenseRepository::new(InMemoryLedgerStore::new()));
    let app = api::app(repository);

    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Ledger store running at http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
