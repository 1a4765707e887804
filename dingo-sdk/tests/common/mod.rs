//! In-memory coordinator doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use dingo_sdk::error::Result;
use dingo_sdk::protocol as pb;
use dingo_sdk::service::{ClusterServiceClient, Connect, ConnectorConfig, CoordinatorApi, ServiceConnector};
use parking_lot::Mutex;
use std::time::Duration;
use tonic::Status;

#[derive(Default)]
pub struct CoordinatorState {
    pub epoch: i64,
    pub executors: Vec<pb::Executor>,
    pub heartbeats: Vec<pb::ExecutorHeartbeatRequest>,
    pub map_requests: Vec<pb::GetExecutorMapRequest>,
    /// Statuses returned, in order, before calls start succeeding
    pub failures: VecDeque<Status>,
    /// Embedded error attached to every response
    pub error: Option<pb::Error>,
    /// Time each call takes before answering
    pub delay: Duration,
}

/// Coordinator stub backed by shared in-memory state
#[derive(Clone, Default)]
pub struct MockCoordinator {
    pub state: Arc<Mutex<CoordinatorState>>,
}

impl MockCoordinator {
    pub fn with_executors(epoch: i64, executors: Vec<pb::Executor>) -> Self {
        let mock = Self::default();
        {
            let mut state = mock.state.lock();
            state.epoch = epoch;
            state.executors = executors;
        }
        mock
    }

    pub fn fail_next(&self, status: Status) {
        self.state.lock().failures.push_back(status);
    }

    /// Make every call take `delay`
    pub fn stall(&self, delay: Duration) {
        self.state.lock().delay = delay;
    }

    async fn wait(&self) {
        let delay = self.state.lock().delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[tonic::async_trait]
impl CoordinatorApi for MockCoordinator {
    async fn executor_heartbeat(
        &mut self,
        request: pb::ExecutorHeartbeatRequest,
    ) -> std::result::Result<pb::ExecutorHeartbeatResponse, Status> {
        self.wait().await;
        let mut state = self.state.lock();
        if let Some(status) = state.failures.pop_front() {
            return Err(status);
        }
        state.heartbeats.push(request);
        Ok(pb::ExecutorHeartbeatResponse {
            error: state.error.clone(),
            executormap_epoch: state.epoch,
            executormap: None,
        })
    }

    async fn get_executor_map(
        &mut self,
        request: pb::GetExecutorMapRequest,
    ) -> std::result::Result<pb::GetExecutorMapResponse, Status> {
        self.wait().await;
        let mut state = self.state.lock();
        if let Some(status) = state.failures.pop_front() {
            return Err(status);
        }
        state.map_requests.push(request);
        Ok(pb::GetExecutorMapResponse {
            error: state.error.clone(),
            executormap: Some(pb::ExecutorMap {
                epoch: state.epoch,
                executors: state.executors.clone(),
            }),
        })
    }
}

/// Always connects to the same mock
pub struct MockConnect(pub MockCoordinator);

#[tonic::async_trait]
impl Connect<MockCoordinator> for MockConnect {
    async fn connect(&self, _target: &str) -> Result<MockCoordinator> {
        Ok(self.0.clone())
    }
}

pub fn client(mock: &MockCoordinator) -> ClusterServiceClient<MockCoordinator, MockConnect> {
    let config = ConnectorConfig {
        retry_backoff: Duration::ZERO,
        ..ConnectorConfig::from_targets("coordinator-1:22001,coordinator-2:22001").unwrap()
    };
    ClusterServiceClient::new(Arc::new(ServiceConnector::new(config, MockConnect(mock.clone()))))
}

pub fn wire_executor(id: &str, state: pb::ExecutorState) -> pb::Executor {
    pb::Executor {
        id: id.into(),
        server_location: Some(pb::Location {
            host: "10.0.0.1".into(),
            port: 8765,
        }),
        executor_user: Some(pb::ExecutorUser {
            user: "root".into(),
            keyring: "keyring".into(),
        }),
        state: state as i32,
        create_timestamp: 1,
        last_seen_timestamp: 2,
        cluster_name: "dingo".into(),
    }
}
