// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_items_total", "Candidate items entering the pipeline.");
        describe_counter!("feed_kept_total", "Items surviving the full pipeline.");
        describe_counter!(
            "feed_no_provider_total",
            "Items dropped because no provider keyword matched."
        );
        describe_counter!(
            "feed_rejected_total",
            "Items dropped by the feature classifier."
        );
        describe_counter!(
            "feed_dedup_topic_total",
            "Items dropped by exact topic-key dedup."
        );
        describe_counter!(
            "feed_dedup_overlap_total",
            "Items dropped by fuzzy headline overlap."
        );
        describe_counter!("feed_source_errors_total", "Item source fetch errors.");
        describe_gauge!("feed_last_run_ts", "Unix ts of the last pipeline run.");
        describe_gauge!("feed_max_items", "Configured output cap per run.");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and expose a static gauge for the
    /// configured feed cap.
    pub fn init(max_items: u64) -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        ensure_described();
        gauge!("feed_max_items").set(max_items as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
