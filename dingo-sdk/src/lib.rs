//! DingoDB SDK - coordinator cluster client
//!
//! This crate provides:
//! - Composite entity identifiers (`CommonId`)
//! - Executor heartbeats and executor-map lookups against the coordinator
//! - Connection management with target rotation and retry
//! - A periodic executor heartbeat loop

pub mod common;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod runtime;
pub mod service;

pub use common::{CommonId, EntityType, Executor, ExecutorMap, ExecutorState};
pub use error::SdkError;
pub use service::{ClusterServiceClient, ServiceConnector};

/// Default heartbeat interval in seconds
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 5;

/// Default number of retries after a failed coordinator call
pub const DEFAULT_RETRY_TIMES: u32 = 3;
