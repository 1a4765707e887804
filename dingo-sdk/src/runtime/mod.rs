//! Runtime helpers shared by background tasks

pub mod shutdown;

pub use shutdown::ShutdownSignal;
