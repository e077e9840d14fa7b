use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Loads `.env` from the working directory or its parents so its variables
/// can feed the command-line defaults. The outcome is reported once logging
/// is up.
pub fn load_env() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

/// Initialize logging and tracing. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn report_env(loaded: &Result<PathBuf, dotenvy::Error>) {
    match loaded {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "Failed to load environment file"),
    }
}
