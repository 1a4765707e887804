//! Periodic executor heartbeat
//!
//! Keeps an executor registered with the coordinator and tracks the
//! executor-map epoch and the set of normal peers it reports.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::cluster::{ClusterServiceClient, CoordinatorApi};
use super::connector::Connect;
use crate::common::Executor;
use crate::error::{Result, SdkError};
use crate::runtime::ShutdownSignal;
use crate::DEFAULT_HEARTBEAT_INTERVAL_SECS;

/// Configuration for the heartbeat loop
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Time between heartbeats
    pub interval: Duration,
    /// Executor-map epoch to start from
    pub initial_epoch: i64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_HEARTBEAT_INTERVAL_SECS),
            initial_epoch: 0,
        }
    }
}

/// Sends heartbeats for one executor and follows the executor map
pub struct ExecutorHeartbeater<S, C> {
    client: ClusterServiceClient<S, C>,
    executor: Executor,
    interval: Duration,
    epoch: AtomicI64,
    peers: RwLock<Vec<Executor>>,
}

impl<S, C> ExecutorHeartbeater<S, C>
where
    S: CoordinatorApi,
    C: Connect<S>,
{
    pub fn new(client: ClusterServiceClient<S, C>, executor: Executor, config: HeartbeatConfig) -> Self {
        Self {
            client,
            executor,
            interval: config.interval,
            epoch: AtomicI64::new(config.initial_epoch),
            peers: RwLock::new(Vec::new()),
        }
    }

    /// Last executor-map epoch seen
    pub fn epoch(&self) -> i64 {
        self.epoch.load(Ordering::Relaxed)
    }

    /// Normal executors from the last map, this executor included if admitted
    pub async fn peers(&self) -> Vec<Executor> {
        self.peers.read().await.clone()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// One heartbeat followed by an executor-map refresh
    pub async fn tick(&self) -> Result<()> {
        let epoch = self.epoch();
        self.client.executor_heartbeat(epoch, &self.executor).await?;

        let map = self.client.get_executor_map_with_epoch(epoch).await?;
        if map.epoch != epoch {
            info!(
                "Executor map advanced from epoch {} to {} ({} normal executors)",
                epoch,
                map.epoch,
                map.executors.len()
            );
            self.epoch.store(map.epoch, Ordering::Relaxed);
        }
        *self.peers.write().await = map.executors;
        Ok(())
    }

    /// Tick every interval until `shutdown` fires
    ///
    /// Failed ticks are logged; the loop keeps going. A tick in flight is
    /// abandoned when shutdown fires.
    pub async fn run(self: Arc<Self>, shutdown: ShutdownSignal) -> Result<()> {
        if self.interval.is_zero() {
            return Err(SdkError::InvalidConfig {
                reason: "heartbeat interval must be non-zero".into(),
            });
        }

        let mut stop = shutdown.subscribe();
        if shutdown.is_triggered() {
            return Err(SdkError::ShutdownInProgress);
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Heartbeat loop started for executor {} every {:?}",
            self.executor.id, self.interval
        );

        loop {
            tokio::select! {
                _ = stop.recv() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = stop.recv() => break,
                result = self.tick() => {
                    if let Err(e) = result {
                        warn!("Heartbeat for executor {} failed: {}", self.executor.id, e);
                    }
                }
            }
        }

        info!("Heartbeat loop stopped for executor {}", self.executor.id);
        Ok(())
    }
}
