use std::{collections::HashMap, io};

use anyhow::{anyhow, Context, Result};
use opentelemetry::{
    global,
    propagation::TextMapPropagator,
    sdk::{
        propagation::{BaggagePropagator, TextMapCompositePropagator, TraceContextPropagator},
        trace as sdktrace, Resource,
    },
    KeyValue,
};
use opentelemetry_otlp::WithExportConfig;
use tracing_subscriber::{
    fmt::{format::FmtSpan, time::UtcTime},
    prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};
use url::Url;

const ENDPOINT: &str = "OTLP_ENDPOINT";
const HEADER_PREFIX: &str = "OTLP_";

/// Sets up the fmt subscriber, and an OTLP export layer when an endpoint is
/// configured in the environment.
pub(crate) fn init() -> Result<()> {
    let fmt_env_filter = env_filter_merge_from_environment("info", "SILVER_HALIDE_LOG_LEVEL")?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_filter(fmt_env_filter);

    let registry = tracing_subscriber::registry().with(fmt_layer);

    if std::env::var(ENDPOINT).is_ok() {
        global::set_text_map_propagator(new_propagator());

        let tracer = new_tracer().context("Failed to create tracer")?;
        let otel_env_filter =
            env_filter_merge_from_environment("trace,polling=off", "SILVER_HALIDE_TRACE_LEVEL")?;
        let otel_layer = tracing_opentelemetry::layer()
            .with_tracer(tracer)
            .with_filter(otel_env_filter);

        registry
            .with(otel_layer)
            .try_init()
            .context("Failed to set global default tracing subscriber")?;
    } else {
        registry
            .try_init()
            .context("Failed to set global default tracing subscriber")?;
    }

    Ok(())
}

fn env_filter_merge_from_environment(
    default_directives: &'static str,
    env_var: &'static str,
) -> Result<EnvFilter> {
    let mut filter = EnvFilter::builder()
        .parse(default_directives)
        .with_context(|| anyhow!("Default directives were invalid: {default_directives}"))?;

    if let Ok(env_value) = std::env::var(env_var) {
        for env_directive in env_value.split(',') {
            match env_directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => eprintln!("WARN ignoring log directive: {env_directive:?}: {err}"),
            }
        }
    }

    Ok(filter)
}

fn new_propagator() -> impl TextMapPropagator {
    let baggage_propagator = BaggagePropagator::new();
    let trace_context_propagator = TraceContextPropagator::new();

    TextMapCompositePropagator::new(vec![
        Box::new(baggage_propagator),
        Box::new(trace_context_propagator),
    ])
}

fn new_tracer() -> Result<sdktrace::Tracer> {
    let endpoint = std::env::var(ENDPOINT).context("OTLP endpoint not set")?;
    let endpoint = Url::parse(&endpoint).context("OTLP endpoint is not a valid URL")?;
    std::env::remove_var(ENDPOINT);

    let headers: HashMap<_, _> = std::env::vars()
        .filter(|(name, _)| name.starts_with(HEADER_PREFIX))
        .map(|(name, value)| {
            let header_name = name
                .strip_prefix(HEADER_PREFIX)
                .unwrap()
                .replace('_', "-")
                .to_ascii_lowercase();
            (header_name, value)
        })
        .collect();

    let endpoint = format!(
        "{}:{}",
        endpoint
            .host_str()
            .context("OTLP endpoint is missing a host")?,
        endpoint
            .port_or_known_default()
            .context("OTLP endpoint is missing a port")?,
    );

    let exporter = opentelemetry_otlp::new_exporter()
        .grpcio()
        .with_endpoint(endpoint)
        .with_headers(headers)
        .with_tls(true);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(
            sdktrace::config().with_resource(Resource::new(vec![KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                "silver-halide",
            )])),
        )
        .install_batch(opentelemetry::runtime::AsyncStd)
        .context("Failed to install OTLP pipeline")
}
