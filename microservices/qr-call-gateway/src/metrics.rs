//! Gateway counters

use qrcall_telemetry::{Counter, Histogram, HistogramSnapshot};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct GatewayMetrics {
    pub tokens_generated: Counter,
    pub redemptions: Counter,
    pub invalid_tokens: Counter,
    pub dispatch_simulated: Counter,
    pub dispatch_connected: Counter,
    pub dispatch_failed: Counter,
    pub dispatch_latency_ms: Histogram,
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub tokens_generated: u64,
    pub redemptions: u64,
    pub invalid_tokens: u64,
    pub dispatch_simulated: u64,
    pub dispatch_connected: u64,
    pub dispatch_failed: u64,
    pub dispatch_latency_ms: HistogramSnapshot,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self {
            tokens_generated: Counter::new("tokens_generated_total"),
            redemptions: Counter::new("redemptions_total"),
            invalid_tokens: Counter::new("invalid_tokens_total"),
            dispatch_simulated: Counter::new("dispatch_simulated_total"),
            dispatch_connected: Counter::new("dispatch_connected_total"),
            dispatch_failed: Counter::new("dispatch_failed_total"),
            dispatch_latency_ms: Histogram::new("dispatch_latency_ms"),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tokens_generated: self.tokens_generated.get(),
            redemptions: self.redemptions.get(),
            invalid_tokens: self.invalid_tokens.get(),
            dispatch_simulated: self.dispatch_simulated.get(),
            dispatch_connected: self.dispatch_connected.get(),
            dispatch_failed: self.dispatch_failed.get(),
            dispatch_latency_ms: self.dispatch_latency_ms.snapshot(),
        }
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}
