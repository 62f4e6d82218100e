use anyhow::Context;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Installs the global Prometheus recorder and returns the `/metrics`
/// exposition route. Call once at startup.
pub fn setup_metrics() -> anyhow::Result<Router> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;

    Ok(Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    ))
}
