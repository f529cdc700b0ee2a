//! Logging setup and per-request storage metrics.
//!
//! Console logging is always on. OpenTelemetry export is added when an OTLP
//! endpoint is configured and reachable. A tracing Layer counts `db.query`
//! spans per HTTP request so responses can report how many statements they ran.

use crate::config::Config;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use std::time::Duration;
use tracing::{span::Id, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::Context, registry::LookupSpan, EnvFilter, Layer};

pub const DB_QUERY_COUNT_HEADER: &str = "X-DB-Query-Count";

tokio::task_local! {
    /// Task-local counter for storage statements in the current request.
    static DB_QUERY_COUNTER: Arc<AtomicU32>;
}

/// Initialize console logging plus OpenTelemetry export when configured.
///
/// Returns the providers that must be shut down on exit so batched spans and
/// logs get flushed.
pub fn init(config: &Config) -> Option<(SdkTracerProvider, SdkLoggerProvider)> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer();

    let Some(endpoint) = config.otel_endpoint.as_deref() else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(DbQueryCountingLayer)
            .init();
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return None;
    };

    match build_otel(endpoint, &config.service_name) {
        Ok((trace_provider, log_provider)) => {
            let tracer = trace_provider.tracer(config.service_name.clone());
            opentelemetry::global::set_tracer_provider(trace_provider.clone());

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .with(DbQueryCountingLayer)
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .with(OpenTelemetryTracingBridge::new(&log_provider))
                .init();

            tracing::info!(
                "OpenTelemetry enabled, exporting traces and logs to {} as {}",
                endpoint,
                config.service_name
            );
            Some((trace_provider, log_provider))
        }
        Err(reason) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .with(DbQueryCountingLayer)
                .init();

            tracing::info!(
                "OpenTelemetry endpoint {} unusable ({}), using console logging only",
                endpoint,
                reason
            );
            None
        }
    }
}

fn build_otel(
    endpoint: &str,
    service_name: &str,
) -> Result<(SdkTracerProvider, SdkLoggerProvider), String> {
    if !is_reachable(endpoint) {
        return Err("not reachable".to_string());
    }

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| format!("trace exporter: {}", e))?;

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| format!("log exporter: {}", e))?;

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    Ok((trace_provider, log_provider))
}

/// Quick TCP check so a missing collector doesn't stall startup.
fn is_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

/// Get the storage statement count for this request, if available.
pub fn get_query_count() -> Option<u32> {
    DB_QUERY_COUNTER
        .try_with(|counter| counter.load(Ordering::Relaxed))
        .ok()
}

/// A tracing Layer that counts db.query spans per HTTP request.
///
/// The store opens each `db.query` span on the request task before handing
/// the statement to the blocking pool, so the task-local counter is in scope.
pub struct DbQueryCountingLayer;

impl<S> Layer<S> for DbQueryCountingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, _attrs: &tracing::span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        if span.name() == "db.query" {
            let _ = DB_QUERY_COUNTER.try_with(|counter| {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
    }
}

/// Middleware that initializes the per-request query counter.
///
/// Must wrap the whole request, so it is layered outside the TraceLayer.
pub async fn query_counting_middleware(request: Request<Body>, next: Next) -> Response {
    let counter = Arc::new(AtomicU32::new(0));
    DB_QUERY_COUNTER.scope(counter, next.run(request)).await
}

/// Middleware that adds the X-DB-Query-Count header to responses.
pub async fn db_query_count_header_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    if let Some(count) = get_query_count() {
        if let Ok(value) = axum::http::header::HeaderValue::from_str(&count.to_string()) {
            response.headers_mut().insert(DB_QUERY_COUNT_HEADER, value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_count_outside_request_is_none() {
        assert_eq!(get_query_count(), None);
    }

    #[tokio::test]
    async fn test_query_count_is_scoped_per_task() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = DB_QUERY_COUNTER
            .scope(counter.clone(), async {
                counter.fetch_add(2, Ordering::Relaxed);
                get_query_count()
            })
            .await;
        assert_eq!(seen, Some(2));
    }

    #[test]
    fn test_unreachable_endpoint() {
        assert!(!is_reachable("http://"));
        assert!(!is_reachable("not a host"));
    }
}
