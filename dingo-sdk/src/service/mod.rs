//! Coordinator service clients
//!
//! Connection handling, the cluster client and the executor heartbeat loop.

pub mod cluster;
pub mod connector;
pub mod heartbeat;

pub use cluster::{ClusterServiceClient, CoordinatorApi};
pub use connector::{Connect, ConnectorConfig, GrpcConnect, ServiceConnector};
pub use heartbeat::{ExecutorHeartbeater, HeartbeatConfig};
