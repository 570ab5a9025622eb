//! downspeeds: security errata publication lag of RHEL rebuilds
//!
//! Downloads the security advisories of RHEL, AlmaLinux and Rocky Linux and
//! writes one result file per release for the static viewer.

use anyhow::Result;
use clap::Parser;
use downspeeds::{
    cli::{self, GatherConfig},
    config::{self, CliOverrides},
    model::Release,
    pipeline::exit_codes,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "downspeeds")]
#[command(version)]
#[command(about = "Compare security errata publication lag between RHEL and its rebuilds", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  All sources fetched
    1  At least one errata source could not be fetched
    3  Invalid configuration or other error

EXAMPLES:
    # Both releases
    downspeeds

    # Release 8 only, from the raw cache when available
    downspeeds -r8 -c

    # Write result files for the viewer
    downspeeds -o /var/www/downspeeds")]
struct Cli {
    /// Only process one release (8 or 9), e.g. -r8
    #[arg(short, long, value_name = "RELEASE")]
    release: Option<Release>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Use cached raw errata instead of downloading when available
    #[arg(short = 'c', long)]
    use_cache: bool,

    /// Directory receiving downspeeds-<release>.json
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, env = "DOWNSPEEDS_CONFIG")]
    config: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if cli.print_config {
        println!("{}", config::generate_example_config());
        return Ok(());
    }

    let (mut app, loaded_from) = config::load_or_default(cli.config.as_deref());
    if let Some(path) = loaded_from {
        tracing::debug!("Loaded configuration from {}", path.display());
    }
    app.apply_overrides(&CliOverrides {
        output_dir: cli.output_dir,
        use_cache: cli.use_cache,
    });

    let exit_code = match cli::run_gather(&GatherConfig::new(cli.release, app)) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            exit_codes::ERROR
        }
    };
    if exit_code != exit_codes::SUCCESS {
        std::process::exit(exit_code);
    }
    Ok(())
}
