//! Coordinator wire protocol
//!
//! Message types and the gRPC client stub for the coordinator service.

mod messages;
pub mod coordinator_service_client;

pub use coordinator_service_client::CoordinatorServiceClient;
pub use messages::*;
