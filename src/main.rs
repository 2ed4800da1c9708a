mod application;
mod domain;
mod infrastructure;
mod presentation;

use infrastructure::config::AppConfig;
use infrastructure::container::AppContainer;
use presentation::http::server::HttpServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        port = config.server_port,
        workers = config.ingest_workers,
        embedding_dimension = config.embedding_dimension,
        "starting docsage"
    );

    let container = AppContainer::new(&config)?;

    HttpServer::new(
        container.document_handler.clone(),
        container.ask_handler.clone(),
        container.background_processor.clone(),
        config.server_port,
    )
    .run()
    .await
}
