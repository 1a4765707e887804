//! Executor agent binary
//!
//! Registers an executor with the coordinator and keeps heartbeating until
//! interrupted.

use std::sync::Arc;
use std::time::Duration;

use dingo_sdk::common::{Executor, ExecutorUser, Location};
use dingo_sdk::runtime::ShutdownSignal;
use dingo_sdk::service::{ClusterServiceClient, ConnectorConfig, ExecutorHeartbeater, HeartbeatConfig};
use dingo_sdk::{DEFAULT_HEARTBEAT_INTERVAL_SECS, DEFAULT_RETRY_TIMES};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| format!("{} has invalid value {:?}", key, raw).into()),
        Err(_) => Ok(default),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Dingo executor agent");

    // Load configuration from environment
    let mut connector_config = ConnectorConfig::from_targets(&env_or("COORDINATOR_ADDRS", "127.0.0.1:22001"))?;
    connector_config.retry_times = env_parse("RETRY_TIMES", DEFAULT_RETRY_TIMES)?;

    let executor_id = std::env::var("EXECUTOR_ID").unwrap_or_else(|_| uuid::Uuid::new_v4().to_string());
    let location = Location::new(env_or("EXECUTOR_HOST", "127.0.0.1"), env_parse("EXECUTOR_PORT", 8765u16)?);
    let user = ExecutorUser::new(env_or("EXECUTOR_USER", "root"), env_or("EXECUTOR_KEYRING", ""));
    let executor = Executor::new(executor_id, location, user).with_cluster_name(env_or("CLUSTER_NAME", ""));

    let interval_secs = env_parse("HEARTBEAT_INTERVAL_SECS", DEFAULT_HEARTBEAT_INTERVAL_SECS)?;
    if interval_secs == 0 {
        return Err("HEARTBEAT_INTERVAL_SECS must be at least 1".into());
    }
    let heartbeat_config = HeartbeatConfig {
        interval: Duration::from_secs(interval_secs),
        ..Default::default()
    };

    info!(
        "Executor {} at {} reporting to {:?}",
        executor.id, executor.server_location, connector_config.targets
    );

    let client = ClusterServiceClient::from_config(connector_config);
    let heartbeater = Arc::new(ExecutorHeartbeater::new(client, executor, heartbeat_config));

    let shutdown = ShutdownSignal::new();
    let handle = tokio::spawn(heartbeater.clone().run(shutdown.clone()));

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received, stopping");
    shutdown.shutdown();

    match handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Heartbeat loop ended with error: {}", e),
        Err(e) => error!("Heartbeat task panicked: {}", e),
    }

    info!(
        "Last executor map epoch {} with {} normal executors",
        heartbeater.epoch(),
        heartbeater.peers().await.len()
    );
    Ok(())
}
