// Frameworks layer: configuration, tracing bootstrap and the binary entrypoint.

pub mod config;
pub mod runner;
pub mod telemetry;
