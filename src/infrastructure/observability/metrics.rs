//! Prometheus metrics definitions for the rating classifier
//!
//! All metrics use the `rating_` prefix.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the HTTP service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Requests by endpoint and HTTP status
    pub requests_total: CounterVec,
    /// Predictions served by category
    pub predictions_total: CounterVec,
    /// Time spent in the model per batch
    pub inference_latency_seconds: HistogramVec,
    /// Model readiness (0=not loaded, 1=ready)
    pub model_ready: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("rating_requests_total", "Total HTTP requests by endpoint and status"),
            &["endpoint", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let predictions_total = CounterVec::new(
            Opts::new("rating_predictions_total", "Total predictions by rating category"),
            &["category"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let inference_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "rating_inference_latency_seconds",
                "Model inference latency per batch in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0,
            ]),
            &["model"],
        )?;
        registry.register(Box::new(inference_latency_seconds.clone()))?;

        let model_ready = Gauge::with_opts(Opts::new(
            "rating_model_ready",
            "Model readiness (0=not loaded, 1=ready)",
        ))?;
        registry.register(Box::new(model_ready.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            predictions_total,
            inference_latency_seconds,
            model_ready,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_requests(&self, endpoint: &str, status: u16) {
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[endpoint, status.as_str()])
            .inc();
    }

    pub fn inc_predictions(&self, category: &str) {
        self.predictions_total.with_label_values(&[category]).inc();
    }

    pub fn observe_inference(&self, model: &str, seconds: f64) {
        self.inference_latency_seconds
            .with_label_values(&[model])
            .observe(seconds);
    }

    pub fn set_model_ready(&self, ready: bool) {
        self.model_ready.set(if ready { 1.0 } else { 0.0 });
    }
}
