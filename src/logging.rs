use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,urlgate=debug";

/// Initialize structured logging to stderr.
///
/// `RUST_LOG` overrides the default filter. `quiet` drops urlgate's own
/// per-URL events down to warnings.
pub fn init_logging(quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
