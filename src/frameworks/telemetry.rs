use crate::frameworks::config::LogFormat;

// Installs the global subscriber. RUST_LOG filters, defaulting to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().with_current_span(true).init(),
        LogFormat::Compact => builder.compact().init(),
    }

    // Panics inside poller tasks would otherwise only reach stderr.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "client panicked");
    }));
}
