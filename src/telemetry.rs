use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "job_agent=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter;
/// `LOG_FORMAT=json` switches to JSON lines. Calling it twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Err only when a subscriber is already installed
    let _ = if json_requested(std::env::var("LOG_FORMAT").ok().as_deref()) {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn json_requested(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}
