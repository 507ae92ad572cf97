use tracing_subscriber::EnvFilter;

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Logs go to stderr so stdout only carries command output. `-v` overrides
/// `RUST_LOG`; without it `RUST_LOG` is honored and falls back to `warn`.
pub fn init(verbosity: u8) {
    let env_filter = if verbosity > 0 {
        EnvFilter::new(default_directive(verbosity))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
