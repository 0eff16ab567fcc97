//! Logging, tracing and metrics setup
//!
//! Console output always goes through `tracing-subscriber`. When
//! `telemetry.otlp_enabled` is set, spans, log events and delivery counters
//! are also exported over OTLP/HTTP, using the standard `OTEL_EXPORTER_OTLP_*`
//! environment variables for the endpoint.

use anyhow::{Context, Result};
use opentelemetry::metrics::Counter;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, MetricExporter, SpanExporter};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LoggingConfig, TelemetryConfig};
use crate::error::ErrorCode;

const METER_NAME: &str = "weathermail";

/// Keeps exporters alive; flushes and shuts them down on drop
#[derive(Default)]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down tracer provider: {e}");
            }
        }
        if let Some(provider) = self.logger_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down logger provider: {e}");
            }
        }
        if let Some(provider) = self.meter_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down meter provider: {e}");
            }
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{level},hyper=warn,h2=warn,reqwest=warn,opentelemetry=warn"))
    })
}

/// Install the global subscriber. Call once at startup.
pub fn init(logging: &LoggingConfig, telemetry: &TelemetryConfig) -> Result<TelemetryGuard> {
    let fmt_layer = if logging.format == "json" {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    let mut guard = TelemetryGuard::default();

    let (otel_layer, log_bridge) = if telemetry.otlp_enabled {
        let resource = Resource::builder()
            .with_service_name(telemetry.service_name.clone())
            .with_attribute(KeyValue::new(SERVICE_VERSION, crate::VERSION))
            .build();

        let span_exporter = SpanExporter::builder()
            .with_http()
            .build()
            .context("Failed to create OTLP span exporter")?;
        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .with_resource(resource.clone())
            .build();
        let tracer = tracer_provider.tracer(telemetry.service_name.clone());
        global::set_tracer_provider(tracer_provider.clone());

        let log_exporter = LogExporter::builder()
            .with_http()
            .build()
            .context("Failed to create OTLP log exporter")?;
        let logger_provider = SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource.clone())
            .build();
        let log_bridge = OpenTelemetryTracingBridge::new(&logger_provider);

        let metric_exporter = MetricExporter::builder()
            .with_http()
            .build()
            .context("Failed to create OTLP metric exporter")?;
        let meter_provider = SdkMeterProvider::builder()
            .with_periodic_exporter(metric_exporter)
            .with_resource(resource)
            .build();
        global::set_meter_provider(meter_provider.clone());

        guard.tracer_provider = Some(tracer_provider);
        guard.logger_provider = Some(logger_provider);
        guard.meter_provider = Some(meter_provider);

        (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Some(log_bridge),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(log_bridge)
        .with(build_filter(&logging.level))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Per-recipient delivery counters
#[derive(Clone)]
pub struct DeliveryMetrics {
    dispatched: Counter<u64>,
    failed: Counter<u64>,
    weather_skipped: Counter<u64>,
}

impl DeliveryMetrics {
    /// Counters on the global meter; no-ops unless a meter provider is installed
    #[must_use]
    pub fn new() -> Self {
        let meter = global::meter(METER_NAME);
        Self {
            dispatched: meter
                .u64_counter("notifications.dispatched")
                .with_description("Emails accepted by the mail transport")
                .build(),
            failed: meter
                .u64_counter("notifications.failed")
                .with_description("Recipients whose notification chain failed")
                .build(),
            weather_skipped: meter
                .u64_counter("notifications.weather_skipped")
                .with_description("Emails sent without weather")
                .build(),
        }
    }

    pub fn record_dispatched(&self, with_weather: bool) {
        self.dispatched.add(1, &[]);
        if !with_weather {
            self.weather_skipped.add(1, &[]);
        }
    }

    pub fn record_failed(&self, code: ErrorCode) {
        self.failed.add(1, &[KeyValue::new("reason", code.as_str())]);
    }
}

impl Default for DeliveryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_provider_are_noops() {
        let metrics = DeliveryMetrics::new();
        metrics.record_dispatched(true);
        metrics.record_dispatched(false);
        metrics.record_failed(ErrorCode::MissingContactInfo);
    }

    #[test]
    fn test_build_filter_accepts_configured_level() {
        let filter = build_filter("debug");
        assert!(!filter.to_string().is_empty());
    }
}
