//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    Counter, CounterVec, Histogram, Opts, Registry,
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_with_registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Webhook metrics
    pub webhook_events: CounterVec,
    pub webhook_rejections: CounterVec,

    // Trigger metrics
    pub trigger_classifications: CounterVec,

    // Summarization metrics
    pub digest_requests: CounterVec,
    pub digest_duration: Histogram,

    // Store metrics
    pub buffer_evictions: Counter,
    pub buffer_resets: Counter,

    // Reply delivery metrics
    pub replies: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let webhook_events = register_counter_vec_with_registry!(
            Opts::new("webhook_events_total", "Total inbound webhook events"),
            &["kind"],
            registry
        )?;

        let webhook_rejections = register_counter_vec_with_registry!(
            Opts::new("webhook_rejections_total", "Total rejected webhook deliveries"),
            &["reason"],
            registry
        )?;

        let trigger_classifications = register_counter_vec_with_registry!(
            Opts::new(
                "trigger_classifications_total",
                "Total message classifications"
            ),
            &["kind"],
            registry
        )?;

        let digest_requests = register_counter_vec_with_registry!(
            Opts::new("digest_requests_total", "Total summarization dispatches"),
            &["status"],
            registry
        )?;

        let digest_duration = register_histogram_with_registry!(
            "digest_duration_seconds",
            "Summarization dispatch duration in seconds",
            registry
        )?;

        let buffer_evictions = register_counter_with_registry!(
            Opts::new("buffer_evictions_total", "Total messages evicted at capacity"),
            registry
        )?;

        let buffer_resets = register_counter_with_registry!(
            Opts::new("buffer_resets_total", "Total conversation buffer clears"),
            registry
        )?;

        let replies = register_counter_vec_with_registry!(
            Opts::new("replies_total", "Total outgoing reply deliveries"),
            &["status"],
            registry
        )?;

        Ok(Self {
            registry,
            webhook_events,
            webhook_rejections,
            trigger_classifications,
            digest_requests,
            digest_duration,
            buffer_evictions,
            buffer_resets,
            replies,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record an inbound webhook event by kind
    pub fn record_event(&self, kind: &str) {
        self.webhook_events.with_label_values(&[kind]).inc();
    }

    /// Record a rejected webhook delivery
    pub fn record_rejection(&self, reason: &str) {
        self.webhook_rejections.with_label_values(&[reason]).inc();
    }

    /// Record a trigger classification
    pub fn record_classification(&self, kind: &str) {
        self.trigger_classifications.with_label_values(&[kind]).inc();
    }

    /// Record a summarization dispatch outcome
    pub fn record_digest(&self, status: &str, duration_secs: f64) {
        self.digest_requests.with_label_values(&[status]).inc();
        self.digest_duration.observe(duration_secs);
    }

    /// Record a capacity eviction
    pub fn record_eviction(&self) {
        self.buffer_evictions.inc();
    }

    /// Record a buffer clear
    pub fn record_reset(&self) {
        self.buffer_resets.inc();
    }

    /// Record a reply delivery attempt
    pub fn record_reply(&self, success: bool) {
        let status = if success { "sent" } else { "failed" };
        self.replies.with_label_values(&[status]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
