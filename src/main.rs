// Amber Alerts - reads the current Amber Alert feed aloud and offers to open the official site

use anyhow::Result;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match dotenv::dotenv() {
        Ok(path) => info!("📄 Loaded .env from {:?}", path),
        Err(e) => warn!("⚠️  Could not load .env file: {}", e),
    }

    info!("🚨 Starting Amber Alerts");
    amber_alerts::run().await
}
