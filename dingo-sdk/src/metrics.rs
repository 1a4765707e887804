//! Client-side metrics
//!
//! Counters, gauges and histograms rendered in Prometheus text format.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Counter metric (monotonically increasing)
pub struct Counter {
    value: AtomicU64,
    name: String,
    help: String,
}

impl Counter {
    /// Create a new counter
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            value: AtomicU64::new(0),
            name: name.into(),
            help: help.into(),
        }
    }

    /// Increment by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP {} {}\n# TYPE {} counter\n{} {}\n",
            self.name, self.help, self.name, self.name, self.get()
        )
    }
}

/// Gauge metric (can go up or down)
pub struct Gauge {
    value: AtomicI64,
    name: String,
    help: String,
}

impl Gauge {
    /// Create a new gauge
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            value: AtomicI64::new(0),
            name: name.into(),
            help: help.into(),
        }
    }

    /// Set value
    pub fn set(&self, val: i64) {
        self.value.store(val, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP {} {}\n# TYPE {} gauge\n{} {}\n",
            self.name, self.help, self.name, self.name, self.get()
        )
    }
}

/// Histogram for latency measurements
pub struct Histogram {
    buckets: Vec<(f64, AtomicU64)>,
    sum: AtomicU64,
    count: AtomicU64,
    name: String,
    help: String,
}

/// Upper bounds (seconds) of the RPC latency buckets
const LATENCY_BUCKETS: [f64; 12] = [
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

impl Histogram {
    /// Create with the RPC latency buckets
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            buckets: LATENCY_BUCKETS
                .iter()
                .map(|&b| (b, AtomicU64::new(0)))
                .collect(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
            name: name.into(),
            help: help.into(),
        }
    }

    /// Observe a value
    pub fn observe(&self, value: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);

        // Sum kept as micros
        let micros = (value * 1_000_000.0) as u64;
        self.sum.fetch_add(micros, Ordering::Relaxed);

        for (bound, count) in &self.buckets {
            if value <= *bound {
                count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        let mut output = format!(
            "# HELP {} {}\n# TYPE {} histogram\n",
            self.name, self.help, self.name
        );

        for (bound, count) in &self.buckets {
            output.push_str(&format!(
                "{}_bucket{{le=\"{}\"}} {}\n",
                self.name,
                bound,
                count.load(Ordering::Relaxed)
            ));
        }
        output.push_str(&format!(
            "{}_bucket{{le=\"+Inf\"}} {}\n",
            self.name,
            self.count()
        ));

        let sum_secs = self.sum.load(Ordering::Relaxed) as f64 / 1_000_000.0;
        output.push_str(&format!("{}_sum {}\n", self.name, sum_secs));
        output.push_str(&format!("{}_count {}\n", self.name, self.count()));

        output
    }
}

/// Standard client metrics
pub mod standard {
    use super::*;
    use std::sync::LazyLock;

    pub static RPC_CALLS: LazyLock<Counter> = LazyLock::new(|| {
        Counter::new("dingo_sdk_rpc_calls_total", "Coordinator RPC attempts")
    });

    pub static RPC_RETRIES: LazyLock<Counter> = LazyLock::new(|| {
        Counter::new("dingo_sdk_rpc_retries_total", "Coordinator RPC attempts that were retried")
    });

    pub static RPC_FAILURES: LazyLock<Counter> = LazyLock::new(|| {
        Counter::new("dingo_sdk_rpc_failures_total", "Coordinator RPCs that failed for good")
    });

    pub static EXECUTOR_MAP_EPOCH: LazyLock<Gauge> = LazyLock::new(|| {
        Gauge::new("dingo_sdk_executor_map_epoch", "Last executor map epoch seen")
    });

    pub static NORMAL_EXECUTORS: LazyLock<Gauge> = LazyLock::new(|| {
        Gauge::new("dingo_sdk_normal_executors", "Executors in normal state in the last map")
    });

    pub static RPC_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
        Histogram::new("dingo_sdk_rpc_duration_seconds", "Coordinator RPC latency")
    });
}

/// Render all standard client metrics
pub fn gather_client_metrics() -> String {
    let mut output = String::new();

    output.push_str(&standard::RPC_CALLS.to_prometheus());
    output.push_str(&standard::RPC_RETRIES.to_prometheus());
    output.push_str(&standard::RPC_FAILURES.to_prometheus());

    output.push_str(&standard::EXECUTOR_MAP_EPOCH.to_prometheus());
    output.push_str(&standard::NORMAL_EXECUTORS.to_prometheus());

    output.push_str(&standard::RPC_DURATION.to_prometheus());

    output
}
