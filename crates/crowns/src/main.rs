//! Server binary: logging, bind, run.

use crowns::CrownsServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:3000".to_string());

    let server = CrownsServer::builder().bind(&addr).build().await?;
    tracing::info!(addr = %server.local_addr()?, "serving crowns");
    server.run().await?;
    Ok(())
}
