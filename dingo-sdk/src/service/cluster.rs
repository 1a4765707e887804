//! Cluster service client
//!
//! Executor heartbeats and executor-map lookups against the coordinator.

use std::sync::Arc;

use tonic::transport::Channel;
use tonic::Status;
use tracing::debug;

use super::connector::{Connect, ConnectorConfig, GrpcConnect, ServiceConnector};
use crate::common::{Executor, ExecutorMap};
use crate::error::{Result, SdkError};
use crate::metrics::standard;
use crate::protocol::{self as pb, CoordinatorServiceClient};

/// Coordinator RPCs used by the cluster client
#[tonic::async_trait]
pub trait CoordinatorApi: Clone + Send + Sync + 'static {
    async fn executor_heartbeat(
        &mut self,
        request: pb::ExecutorHeartbeatRequest,
    ) -> std::result::Result<pb::ExecutorHeartbeatResponse, Status>;

    async fn get_executor_map(
        &mut self,
        request: pb::GetExecutorMapRequest,
    ) -> std::result::Result<pb::GetExecutorMapResponse, Status>;
}

#[tonic::async_trait]
impl CoordinatorApi for CoordinatorServiceClient<Channel> {
    async fn executor_heartbeat(
        &mut self,
        request: pb::ExecutorHeartbeatRequest,
    ) -> std::result::Result<pb::ExecutorHeartbeatResponse, Status> {
        CoordinatorServiceClient::<Channel>::executor_heartbeat(self, request)
            .await
            .map(tonic::Response::into_inner)
    }

    async fn get_executor_map(
        &mut self,
        request: pb::GetExecutorMapRequest,
    ) -> std::result::Result<pb::GetExecutorMapResponse, Status> {
        CoordinatorServiceClient::<Channel>::get_executor_map(self, request)
            .await
            .map(tonic::Response::into_inner)
    }
}

/// Fail on a non-zero embedded error
fn check_error(method: &str, error: Option<&pb::Error>) -> Result<()> {
    match error {
        Some(err) if err.errcode != 0 => Err(SdkError::Remote {
            method: method.into(),
            errcode: err.errcode,
            errmsg: err.errmsg.clone(),
        }),
        _ => Ok(()),
    }
}

/// Client for the coordinator's cluster service
pub struct ClusterServiceClient<S = CoordinatorServiceClient<Channel>, C = GrpcConnect> {
    connector: Arc<ServiceConnector<S, C>>,
}

impl<S, C> Clone for ClusterServiceClient<S, C> {
    fn clone(&self) -> Self {
        Self {
            connector: self.connector.clone(),
        }
    }
}

impl ClusterServiceClient {
    /// Client over gRPC; connects lazily on first call
    pub fn from_config(config: ConnectorConfig) -> Self {
        Self::new(Arc::new(ServiceConnector::grpc(config)))
    }
}

impl<S, C> ClusterServiceClient<S, C>
where
    S: CoordinatorApi,
    C: Connect<S>,
{
    pub fn new(connector: Arc<ServiceConnector<S, C>>) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &ServiceConnector<S, C> {
        &self.connector
    }

    /// Report `executor` as alive, along with the executor-map epoch the
    /// caller currently holds
    pub async fn executor_heartbeat(&self, epoch: i64, executor: &Executor) -> Result<()> {
        let request = pb::ExecutorHeartbeatRequest {
            self_executormap_epoch: epoch,
            executor: Some(executor.into()),
        };

        let response = self
            .connector
            .exec("ExecutorHeartbeat", |mut stub| {
                let request = request.clone();
                async move { stub.executor_heartbeat(request).await }
            })
            .await?;
        check_error("ExecutorHeartbeat", response.error.as_ref())?;

        debug!(
            "Heartbeat for executor {} acknowledged, coordinator epoch {}",
            executor.id, response.executormap_epoch
        );
        Ok(())
    }

    /// Executors in normal state
    pub async fn get_executor_map(&self, epoch: i64) -> Result<Vec<Executor>> {
        Ok(self.get_executor_map_with_epoch(epoch).await?.executors)
    }

    /// Executors in normal state, plus the epoch of the map they came from
    pub async fn get_executor_map_with_epoch(&self, epoch: i64) -> Result<ExecutorMap> {
        let request = pb::GetExecutorMapRequest {
            epoch,
            ..Default::default()
        };

        let response = self
            .connector
            .exec("GetExecutorMap", |mut stub| {
                let request = request.clone();
                async move { stub.get_executor_map(request).await }
            })
            .await?;
        check_error("GetExecutorMap", response.error.as_ref())?;

        let map = response.executormap.unwrap_or_default();
        let executors = map
            .executors
            .into_iter()
            .filter(|executor| executor.state() == pb::ExecutorState::ExecutorNormal)
            .map(Executor::try_from)
            .collect::<Result<Vec<_>>>()?;

        standard::EXECUTOR_MAP_EPOCH.set(map.epoch);
        standard::NORMAL_EXECUTORS.set(executors.len() as i64);
        debug!(
            "Executor map at epoch {} has {} normal executors",
            map.epoch,
            executors.len()
        );

        Ok(ExecutorMap {
            epoch: map.epoch,
            executors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_error() {
        assert!(check_error("M", None).is_ok());

        let ok = pb::Error {
            errcode: 0,
            errmsg: String::new(),
        };
        assert!(check_error("M", Some(&ok)).is_ok());

        let not_leader = pb::Error {
            errcode: 10001,
            errmsg: "not leader".into(),
        };
        match check_error("GetExecutorMap", Some(&not_leader)) {
            Err(SdkError::Remote { method, errcode, errmsg }) => {
                assert_eq!(method, "GetExecutorMap");
                assert_eq!(errcode, 10001);
                assert_eq!(errmsg, "not leader");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
