use tracing_subscriber::{EnvFilter, fmt};

/// Install a fmt subscriber filtered by `RUST_LOG`, `info` when unset
///
/// Only the first call installs anything.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[uniffi::export]
fn init_tag_logging() {
    init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
        tracing::info!("logging initialized");
    }
}
