pub mod core;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::config::LauncherConfig;
use crate::core::downloader::Downloader;
use crate::core::error::LauncherResult;
use crate::core::launch::LaunchCommand;
use crate::core::resolve::Resolver;

/// Install the stderr subscriber. `RUST_LOG` wins over `verbosity`.
pub fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "info",
        1 => "info,espresso_lib=debug",
        _ => "debug,espresso_lib=trace",
    };

    // Ignore the error when a subscriber is already installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init();
}

/// Resolve the descriptor at `url` and launch it.
///
/// Nothing is launched when resolution reports any error.
pub async fn run(config: LauncherConfig, url: &str, wait: bool) -> LauncherResult<()> {
    info!("Espresso {} starting for {}", env!("CARGO_PKG_VERSION"), url);
    config.ensure_cache_dir().await?;

    let resolver = Resolver::new(config, Downloader::new()?);
    let app = resolver.resolve(url).await?;

    let command = LaunchCommand::assemble(&app, resolver.config())?;
    command.spawn(wait).await
}
