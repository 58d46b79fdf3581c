use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use espresso_lib::core::config::{default_cache_dir, load_settings_from_disk, LauncherConfig};

/// Launch a JNLP application from its descriptor URL.
#[derive(Debug, Parser)]
#[command(name = "espresso", version, about)]
struct Cli {
    /// Descriptor URL.
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Descriptor URL; takes precedence over the positional argument.
    #[arg(long = "url", value_name = "URL")]
    url_flag: Option<String>,

    /// Architecture matched against descriptor filters.
    #[arg(long)]
    arch: Option<String>,

    /// Runtime executable to launch with.
    #[arg(long, value_name = "PATH")]
    jre: Option<PathBuf>,

    /// Artifact cache directory.
    #[arg(long, value_name = "DIR")]
    cache: Option<PathBuf>,

    /// Wait for the launched process and report its exit status.
    #[arg(long)]
    wait: bool,

    /// Raise log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Option<(LauncherConfig, String, bool)> {
        let url = self.url_flag.or(self.url)?;
        let cache_dir = self.cache.unwrap_or_else(default_cache_dir);
        let settings = load_settings_from_disk(&cache_dir);

        let mut config = LauncherConfig::with_cache_dir(cache_dir);
        let arch_from_cli = self.arch.is_some();
        if let Some(arch) = self.arch {
            config.arch = arch;
        }
        config.java_path = self.jre;

        Some((config.apply_settings(settings, arch_from_cli), url, self.wait))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    espresso_lib::init_logging(cli.verbose);

    let Some((config, url, wait)) = cli.into_config() else {
        error!("No descriptor URL given (pass URL or --url <URL>)");
        return ExitCode::FAILURE;
    };

    match espresso_lib::run(config, &url, wait).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
