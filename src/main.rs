use portlog::config::AppConfig;
use portlog::{db, kafka};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting PortLog voyage service...");

    // Init DB
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    info!("Connected to database");

    // Start Kafka
    kafka::start_kafka_consumer(&config, pool).await?;

    Ok(())
}
