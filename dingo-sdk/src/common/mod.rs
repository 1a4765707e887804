//! Common SDK value types
//!
//! Entity identifiers and the cluster entities exchanged with the coordinator.

pub mod cluster;
mod conversion;
pub mod id;

pub use cluster::{Executor, ExecutorMap, ExecutorState, ExecutorUser, Location};
pub use id::{CommonId, EntityType};
