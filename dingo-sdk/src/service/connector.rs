//! Connection management for coordinator stubs
//!
//! A [`ServiceConnector`] owns a lazily created stub for one of several
//! coordinator targets and runs calls against it, reconnecting to the next
//! target when a call fails in a retryable way.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::{debug, info, warn};

use crate::error::{Result, SdkError};
use crate::metrics::standard;
use crate::protocol::CoordinatorServiceClient;
use crate::DEFAULT_RETRY_TIMES;

/// Configuration for a service connector
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Coordinator targets (`host:port`), tried in order
    pub targets: Vec<String>,
    /// Extra attempts after the first one
    pub retry_times: u32,
    /// Pause between attempts
    pub retry_backoff: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            targets: vec!["127.0.0.1:22001".into()],
            retry_times: DEFAULT_RETRY_TIMES,
            retry_backoff: Duration::from_millis(200),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ConnectorConfig {
    /// Build a config from a comma separated target list
    pub fn from_targets(targets: &str) -> Result<Self> {
        let targets: Vec<String> = targets
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        if targets.is_empty() {
            return Err(SdkError::InvalidConfig {
                reason: "no coordinator targets given".into(),
            });
        }

        Ok(Self {
            targets,
            ..Default::default()
        })
    }
}

/// Creates stubs for a target
#[tonic::async_trait]
pub trait Connect<S>: Send + Sync {
    async fn connect(&self, target: &str) -> Result<S>;
}

/// Connects tonic coordinator clients over HTTP/2 channels
#[derive(Debug, Clone)]
pub struct GrpcConnect {
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl GrpcConnect {
    pub fn new(config: &ConnectorConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
        }
    }
}

#[tonic::async_trait]
impl Connect<CoordinatorServiceClient<Channel>> for GrpcConnect {
    async fn connect(&self, target: &str) -> Result<CoordinatorServiceClient<Channel>> {
        let uri = if target.contains("://") {
            target.to_string()
        } else {
            format!("http://{}", target)
        };

        let failed = |reason: String| SdkError::ConnectionFailed {
            endpoint: target.to_string(),
            reason,
        };

        let channel = Endpoint::from_shared(uri)
            .map_err(|e| failed(e.to_string()))?
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .connect()
            .await
            .map_err(|e| failed(e.to_string()))?;

        Ok(CoordinatorServiceClient::new(channel))
    }
}

/// Whether a failed call should be retried against a fresh connection
pub fn is_retryable_status(status: &Status) -> bool {
    matches!(
        status.code(),
        Code::Unavailable | Code::DeadlineExceeded | Code::Aborted
    )
}

/// Cached stub tagged with the connection it came from
struct Slot<S> {
    generation: u64,
    stub: Option<S>,
}

/// Runs calls against a cached stub, reconnecting and retrying on failure
pub struct ServiceConnector<S, C> {
    config: ConnectorConfig,
    connect: C,
    slot: RwLock<Slot<S>>,
    cursor: AtomicUsize,
}

impl ServiceConnector<CoordinatorServiceClient<Channel>, GrpcConnect> {
    /// Connector for tonic coordinator clients
    pub fn grpc(config: ConnectorConfig) -> Self {
        let connect = GrpcConnect::new(&config);
        Self::new(config, connect)
    }
}

impl<S, C> ServiceConnector<S, C>
where
    S: Clone + Send + Sync,
    C: Connect<S>,
{
    /// Create a connector; no connection is made until the first call
    pub fn new(config: ConnectorConfig, connect: C) -> Self {
        Self {
            config,
            connect,
            slot: RwLock::new(Slot {
                generation: 0,
                stub: None,
            }),
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Target the next connection attempt goes to
    pub fn current_target(&self) -> &str {
        let idx = self.cursor.load(Ordering::Relaxed) % self.config.targets.len().max(1);
        self.config
            .targets
            .get(idx)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Return the cached stub and its generation, connecting first if needed
    ///
    /// A failed connect moves the cursor to the next target.
    async fn stub(&self) -> Result<(u64, S)> {
        {
            let slot = self.slot.read().await;
            if let Some(stub) = slot.stub.as_ref() {
                return Ok((slot.generation, stub.clone()));
            }
        }

        let mut slot = self.slot.write().await;
        if let Some(stub) = slot.stub.as_ref() {
            return Ok((slot.generation, stub.clone()));
        }

        let target = self.current_target().to_string();
        if target.is_empty() {
            return Err(SdkError::InvalidConfig {
                reason: "no coordinator targets given".into(),
            });
        }

        info!("Connecting to coordinator at {}", target);
        match self.connect.connect(&target).await {
            Ok(stub) => {
                slot.generation += 1;
                slot.stub = Some(stub.clone());
                Ok((slot.generation, stub))
            }
            Err(e) => {
                self.cursor.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Drop the stub of `generation` and move on to the next target
    ///
    /// No-op when that stub was already replaced or dropped by another caller.
    async fn invalidate(&self, generation: u64) -> bool {
        let mut slot = self.slot.write().await;
        if slot.generation != generation || slot.stub.is_none() {
            return false;
        }
        slot.stub = None;
        self.cursor.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Run `call` against the stub
    ///
    /// Retryable statuses and connection failures are retried up to
    /// `retry_times` more times, each against a fresh connection to the next
    /// target. Other statuses are returned at once.
    pub async fn exec<R, F, Fut>(&self, method: &'static str, mut call: F) -> Result<R>
    where
        F: FnMut(S) -> Fut,
        Fut: Future<Output = std::result::Result<R, Status>>,
    {
        let attempts = self.config.retry_times + 1;
        let mut last_reason = String::new();

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.config.retry_backoff).await;
            }

            let (generation, stub) = match self.stub().await {
                Ok(slot) => slot,
                Err(e) if e.is_retryable() => {
                    warn!("{} attempt {}/{}: {}", method, attempt, attempts, e);
                    standard::RPC_RETRIES.inc();
                    last_reason = e.to_string();
                    continue;
                }
                Err(e) => return Err(e),
            };

            standard::RPC_CALLS.inc();
            let start = Instant::now();
            let outcome = call(stub).await;
            standard::RPC_DURATION.observe(start.elapsed().as_secs_f64());

            match outcome {
                Ok(response) => {
                    debug!("{} succeeded on attempt {}", method, attempt);
                    return Ok(response);
                }
                Err(status) if is_retryable_status(&status) => {
                    warn!(
                        "{} attempt {}/{} failed with {:?}: {}",
                        method,
                        attempt,
                        attempts,
                        status.code(),
                        status.message()
                    );
                    standard::RPC_RETRIES.inc();
                    last_reason = status.message().to_string();
                    self.invalidate(generation).await;
                }
                Err(status) => {
                    standard::RPC_FAILURES.inc();
                    return Err(SdkError::Rpc {
                        method: method.into(),
                        code: status.code(),
                        message: status.message().into(),
                    });
                }
            }
        }

        standard::RPC_FAILURES.inc();
        Err(SdkError::RetriesExhausted {
            method: method.into(),
            attempts,
            reason: last_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Hands out sequential stub ids and records the targets it was asked for
    #[derive(Default, Clone)]
    struct RecordingConnect {
        targets: Arc<Mutex<Vec<String>>>,
        refuse: Arc<Mutex<u32>>,
    }

    #[tonic::async_trait]
    impl Connect<usize> for RecordingConnect {
        async fn connect(&self, target: &str) -> Result<usize> {
            let mut targets = self.targets.lock();
            targets.push(target.to_string());

            let mut refuse = self.refuse.lock();
            if *refuse > 0 {
                *refuse -= 1;
                return Err(SdkError::ConnectionFailed {
                    endpoint: target.to_string(),
                    reason: "refused".into(),
                });
            }
            Ok(targets.len())
        }
    }

    fn config(targets: &str, retry_times: u32) -> ConnectorConfig {
        ConnectorConfig {
            retry_times,
            retry_backoff: Duration::ZERO,
            ..ConnectorConfig::from_targets(targets).unwrap()
        }
    }

    #[test]
    fn test_from_targets() {
        let config = ConnectorConfig::from_targets(" a:1, b:2 ,,").unwrap();
        assert_eq!(config.targets, vec!["a:1", "b:2"]);
        assert_eq!(config.retry_times, DEFAULT_RETRY_TIMES);

        assert!(matches!(
            ConnectorConfig::from_targets(" , "),
            Err(SdkError::InvalidConfig { .. })
        ));
    }

    #[tokio::test]
    async fn test_stub_is_reused() {
        let connect = RecordingConnect::default();
        let connector = ServiceConnector::new(config("a:1", 0), connect.clone());

        for _ in 0..3 {
            let stub = connector
                .exec("Echo", |stub| async move { Ok::<_, Status>(stub) })
                .await
                .unwrap();
            assert_eq!(stub, 1);
        }
        assert_eq!(connect.targets.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_rotates_targets() {
        let connect = RecordingConnect::default();
        let connector = ServiceConnector::new(config("a:1,b:2", 3), connect.clone());

        let mut failures = 2;
        let stub = connector
            .exec("Flaky", |stub| {
                let fail = failures > 0;
                failures -= 1;
                async move {
                    if fail {
                        Err(Status::unavailable("leader moved"))
                    } else {
                        Ok(stub)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(stub, 3);
        assert_eq!(*connect.targets.lock(), vec!["a:1", "b:2", "a:1"]);
    }

    #[tokio::test]
    async fn test_non_retryable_status_fails_fast() {
        let connector = ServiceConnector::new(config("a:1", 3), RecordingConnect::default());

        let mut calls = 0;
        let err = connector
            .exec("Bad", |_| {
                calls += 1;
                async { Err::<(), _>(Status::invalid_argument("epoch")) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls, 1);
        assert_eq!(err.code(), Some(Code::InvalidArgument));
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let connector = ServiceConnector::new(config("a:1", 2), RecordingConnect::default());

        let err = connector
            .exec("Down", |_| async {
                Err::<(), _>(Status::deadline_exceeded("slow"))
            })
            .await
            .unwrap_err();

        match err {
            SdkError::RetriesExhausted { method, attempts, reason } => {
                assert_eq!(method, "Down");
                assert_eq!(attempts, 3);
                assert_eq!(reason, "slow");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_stale_invalidate_keeps_fresh_stub() {
        let connect = RecordingConnect::default();
        let connector = ServiceConnector::new(config("a:1,b:2,c:3", 0), connect.clone());

        let (first, _) = connector.stub().await.unwrap();

        // Two callers fail on the same stub; only the first one rotates
        assert!(connector.invalidate(first).await);
        assert!(!connector.invalidate(first).await);
        assert_eq!(connector.current_target(), "b:2");

        // A late failure report for the old stub leaves the new one alone
        let (second, stub) = connector.stub().await.unwrap();
        assert_ne!(first, second);
        assert!(!connector.invalidate(first).await);
        assert_eq!(connector.stub().await.unwrap(), (second, stub));
        assert_eq!(connector.current_target(), "b:2");
        assert_eq!(*connect.targets.lock(), vec!["a:1", "b:2"]);
    }

    #[tokio::test]
    async fn test_concurrent_failures_rotate_once() {
        let connect = RecordingConnect::default();
        let connector = ServiceConnector::new(config("a:1,b:2,c:3", 0), connect.clone());
        connector.stub().await.unwrap();

        let barrier = tokio::sync::Barrier::new(2);
        let (connector, barrier) = (&connector, &barrier);
        let fail = || async move {
            connector
                .exec("Shared", move |_| async move {
                    barrier.wait().await;
                    Err::<(), _>(Status::unavailable("leader moved"))
                })
                .await
        };

        let (a, b) = tokio::join!(fail(), fail());
        assert!(a.is_err() && b.is_err());
        assert_eq!(connector.current_target(), "b:2");
    }

    #[tokio::test]
    async fn test_connection_failure_is_retried() {
        let connect = RecordingConnect::default();
        *connect.refuse.lock() = 1;
        let connector = ServiceConnector::new(config("a:1,b:2", 1), connect.clone());

        let stub = connector
            .exec("Echo", |stub| async move { Ok::<_, Status>(stub) })
            .await
            .unwrap();

        assert_eq!(stub, 2);
        assert_eq!(connector.current_target(), "b:2");
    }
}
