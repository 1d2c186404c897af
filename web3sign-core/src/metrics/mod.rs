//! Metrics for lifecycle flows
//!
//! Counters and histograms go through the `metrics` facade. Nothing is
//! exported unless the embedding application installs a recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

pub const FLOWS_COMPLETED: &str = "lifecycle.flows.completed";
pub const FLOWS_FAILED: &str = "lifecycle.flows.failed";
pub const FLOW_DURATION_MS: &str = "lifecycle.flow.duration_ms";
pub const SYNCS_PUBLISHED: &str = "sync.snapshots.published";

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(FLOWS_COMPLETED, "Lifecycle flows that finished successfully");
    describe_counter!(FLOWS_FAILED, "Lifecycle flows that returned an error");
    describe_histogram!(FLOW_DURATION_MS, "Lifecycle flow duration in milliseconds");
    describe_counter!(SYNCS_PUBLISHED, "Store snapshots published to subscribers");
}

/// Count one finished flow, labelled by flow name
pub fn record_flow(flow: &'static str, ok: bool) {
    if ok {
        counter!(FLOWS_COMPLETED, "flow" => flow).increment(1);
    } else {
        counter!(FLOWS_FAILED, "flow" => flow).increment(1);
    }
}

/// Count one published snapshot
pub fn record_sync() {
    counter!(SYNCS_PUBLISHED).increment(1);
}

/// Timer for measuring flow duration
pub struct Timer {
    flow: &'static str,
    start: Instant,
}

impl Timer {
    pub fn new(flow: &'static str) -> Self {
        Self {
            flow,
            start: Instant::now(),
        }
    }

    /// Stop the timer and record the duration
    pub fn stop(self) {
        let duration = self.start.elapsed();
        histogram!(FLOW_DURATION_MS, "flow" => self.flow).record(duration.as_secs_f64() * 1000.0);
    }
}
