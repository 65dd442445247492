use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Logs go to stderr so `--json` output on stdout
/// stays machine-readable.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "tabnorm=info" } else { "tabnorm=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}
