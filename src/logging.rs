use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stderr subscriber once; later calls are no-ops.
///
/// Fails when the host already installed its own global subscriber.
pub fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow!("installing tracing subscriber: {err}"))
    })
    .map(|_| ())
}
