//! Cluster entities reported by the coordinator

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network address of a cluster member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub host: String,
    pub port: u16,
}

impl Location {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Credentials an executor presents to the coordinator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorUser {
    pub user: String,
    pub keyring: String,
}

impl ExecutorUser {
    pub fn new(user: impl Into<String>, keyring: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            keyring: keyring.into(),
        }
    }
}

/// Executor lifecycle state as tracked by the coordinator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorState {
    /// Announced but not yet admitted
    #[default]
    New,
    /// Serving
    Normal,
    /// Missed heartbeats or left the cluster
    Offline,
}

/// An executor (compute node) in the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executor {
    pub id: String,
    pub server_location: Location,
    pub executor_user: ExecutorUser,
    pub state: ExecutorState,
    pub cluster_name: String,
    /// Epoch millis, 0 when unknown
    pub create_timestamp: u64,
    /// Epoch millis, 0 when unknown
    pub last_seen_timestamp: u64,
}

impl Executor {
    /// Create a freshly announced executor
    pub fn new(id: impl Into<String>, server_location: Location, executor_user: ExecutorUser) -> Self {
        Self {
            id: id.into(),
            server_location,
            executor_user,
            state: ExecutorState::New,
            cluster_name: String::new(),
            create_timestamp: 0,
            last_seen_timestamp: 0,
        }
    }

    /// Set the cluster this executor belongs to
    pub fn with_cluster_name(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = cluster_name.into();
        self
    }

    pub fn is_normal(&self) -> bool {
        self.state == ExecutorState::Normal
    }
}

/// Executors known to the coordinator at a given epoch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorMap {
    pub epoch: i64,
    pub executors: Vec<Executor>,
}
