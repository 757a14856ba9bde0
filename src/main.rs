use std::sync::Arc;

use clap::Parser;
use tonic::transport::Server;
use tracing_subscriber::EnvFilter;

use gentree::cli::Args;
use gentree::proto::gen_tree_server::GenTreeServer;
use gentree::service::GenTreeService;
use gentree::store::memory::InMemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = Arc::new(InMemoryStore::new());

    tracing::info!("gentree server listening on {}", config.listen_addr);

    Server::builder()
        .add_service(GenTreeServer::new(GenTreeService::new(
            store,
            config.pagination,
        )))
        .serve(config.listen_addr)
        .await?;

    Ok(())
}
