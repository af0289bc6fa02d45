//! Logging, tracing, and metrics for accessd.
//!
//! Logs go to stdout through `tracing_subscriber::fmt`, filtered by
//! `RUST_LOG` (default `info`). Spans are exported over OTLP only when
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set. Incoming `traceparent` headers become
//! the parent of the request span so decisions show up inside the caller's
//! trace.
//!
//! Metrics:
//! - `pagegate_decisions_total{outcome}`: every facade decision.
//! - `pagegate_access_upserts_total{kind}`: stored page rows, by `page` or
//!   `module` write.
//! - `pagegate_identities_total`: gauge kept by the stores.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

static METRICS: OnceLock<PrometheusHandle> = OnceLock::new();
static TRACING: OnceLock<()> = OnceLock::new();

/// Install the subscriber, propagator, and Prometheus recorder once per
/// process; later calls only return the metrics handle.
pub fn init_observability(service_name: &str) -> PrometheusHandle {
    TRACING.get_or_init(|| {
        global::set_text_map_propagator(TraceContextPropagator::new());
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer());
        match otlp_provider(service_name) {
            Some(provider) => {
                let tracer = provider.tracer(service_name.to_string());
                let _ = registry
                    .with(tracing_opentelemetry::layer().with_tracer(tracer))
                    .try_init();
            }
            None => {
                let _ = registry.try_init();
            }
        }
    });
    metrics_handle()
}

fn otlp_provider(service_name: &str) -> Option<SdkTracerProvider> {
    std::env::var(OTLP_ENDPOINT_ENV).ok()?;
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .ok()?;
    let resource = Resource::builder_empty()
        .with_attributes([
            KeyValue::new("service.name", service_name.to_string()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build();
    Some(
        SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource)
            .build(),
    )
}

/// W3C trace context carried by `headers`; empty when none is present.
pub fn trace_context_from_headers(headers: &axum::http::HeaderMap) -> opentelemetry::Context {
    global::get_text_map_propagator(|propagator| propagator.extract(&Headers(headers)))
}

struct Headers<'a>(&'a axum::http::HeaderMap);

impl Extractor for Headers<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.to_str().ok()
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

fn metrics_handle() -> PrometheusHandle {
    METRICS
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::debug!("global metrics recorder already set");
            }
            handle
        })
        .clone()
}

/// Serve `GET /metrics` on `listener` until the task is dropped.
pub async fn serve_metrics(
    handle: PrometheusHandle,
    listener: tokio::net::TcpListener,
) -> std::io::Result<()> {
    let app = axum::Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    );
    axum::serve(listener, app.into_make_service()).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Allow,
    Deny,
    Error,
}

impl DecisionOutcome {
    fn label(self) -> &'static str {
        match self {
            DecisionOutcome::Allow => "allow",
            DecisionOutcome::Deny => "deny",
            DecisionOutcome::Error => "error",
        }
    }
}

pub fn record_decision(outcome: DecisionOutcome) {
    metrics::counter!("pagegate_decisions_total", "outcome" => outcome.label()).increment(1);
}

pub fn record_access_upsert(kind: &'static str, pages: usize) {
    metrics::counter!("pagegate_access_upserts_total", "kind" => kind).increment(pages as u64);
}
