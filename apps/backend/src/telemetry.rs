use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber: JSON lines to stdout, level from
/// `RUST_LOG` with an info default.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,backend=info"));

    let json_layer = fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(false)
        .with_span_list(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .init();
}
