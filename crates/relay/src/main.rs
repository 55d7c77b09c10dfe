use relay::RelayConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_env()?;
    let listener = TcpListener::bind(config.addr()?).await?;
    info!("relay listening on {}", listener.local_addr()?);

    relay::serve(listener).await?;
    Ok(())
}
