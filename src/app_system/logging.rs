/// Filter used when `RUST_LOG` is unset. The HTTP stack only reports
/// warnings so catalog calls show up through our own spans.
pub const DEFAULT_LOG_FILTER: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn";

/// Configure tracing once at application startup for the entire process.
///
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`]:
///
/// ```bash
/// RUST_LOG=debug cargo run
/// RUST_LOG=cart_state::actors=debug,info cargo run
/// ```
///
/// Calling it again after a subscriber is installed does nothing.
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_target(false)
        .compact()
        .try_init();

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
