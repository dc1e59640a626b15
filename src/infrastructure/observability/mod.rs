//! Observability for the rating classifier
//!
//! Metrics are kept in a Prometheus registry and scraped from `GET /metrics`.
//! Logs go through `tracing`.

pub mod metrics;

pub use metrics::Metrics;
