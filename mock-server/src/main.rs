use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use ukg_mock_server::config::ServerConfig;
use ukg_mock_server::{run, run_entitlements, seed, telemetry, AppState, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();
    telemetry::init(&config.log_level)?;

    let mut store = Store::default();
    if config.seed {
        seed::seed(&mut store);
    }
    let state = AppState::new(store, config.token_ttl());

    let api = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let service = TcpListener::bind((config.host.as_str(), config.entitlements_port)).await?;
    info!(addr = %api.local_addr()?, "UKG API listening");
    info!(addr = %service.local_addr()?, "entitlements service listening");

    tokio::try_join!(run(api, state), run_entitlements(service))?;
    Ok(())
}
