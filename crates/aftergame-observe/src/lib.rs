//! Observability setup for Aftergame: the global tracing subscriber with
//! optional JSON output and OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{
    TracingOptions, init_tracing, json_from_env, shutdown_tracing, verbosity_filter,
};
