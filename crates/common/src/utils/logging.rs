use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber for the api and its tests.
/// `RUST_LOG` wins when set; the fallback keeps request logs visible while
/// silencing sqlx statement noise.
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(|| io::stdout())
        .try_init();
}
