mod display;
mod exporter;

use clap::{Parser, ValueEnum};
use exporter::{ExporterOptions, OutputFormat};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use zfs_kstat_exporter::config::{CollectorConfig, DEFAULT_NAMESPACE, DEFAULT_PROCFS};
use zfs_kstat_exporter::system::Platform;
use zfs_kstat_exporter::zfs::{ZfsCollector, ZfsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlatformArg {
    /// Detect from uname(2)
    Auto,
    /// Read /proc/spl/kstat/zfs
    Linux,
    /// Run `kstat -j`
    Solaris,
}

/// Export ZFS kernel statistics as metrics
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// procfs mount point
    #[arg(long = "path.procfs", env = "ZFS_EXPORTER_PROCFS", default_value = DEFAULT_PROCFS)]
    procfs: PathBuf,

    /// Prefix for every metric name
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    #[arg(long, value_enum, default_value_t = PlatformArg::Auto)]
    platform: PlatformArg,

    #[arg(long, value_enum, default_value_t = OutputFormat::Prometheus)]
    format: OutputFormat,

    /// Seconds between passes; runs a single pass when omitted
    #[arg(long)]
    interval: Option<u64>,

    /// Seconds after which a pass is abandoned
    #[arg(long)]
    timeout: Option<u64>,

    /// Use canned kstat data instead of the host
    #[arg(long, env = "DEMO_MODE")]
    demo: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Cannot start runtime: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(async_main(args)) {
        error!("{}", e);
        process::exit(1);
    }
}

async fn async_main(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let platform = resolve_platform(args.platform, args.demo)?;
    let config = CollectorConfig::default()
        .with_namespace(&args.namespace)
        .with_procfs_root(args.procfs);

    let collector = ZfsCollector::for_platform(platform, &config, args.demo);
    info!(
        "Reading ZFS statistics on {} via {}{}",
        platform,
        collector.source_name(),
        if args.demo { " (demo)" } else { "" }
    );

    let options = ExporterOptions {
        format: args.format,
        interval: args.interval.map(Duration::from_secs),
        timeout: args.timeout.map(Duration::from_secs),
    };
    exporter::run(&collector, &options).await
}

fn resolve_platform(arg: PlatformArg, demo: bool) -> ZfsResult<Platform> {
    match arg {
        PlatformArg::Linux => Ok(Platform::Linux),
        PlatformArg::Solaris => Ok(Platform::Solaris),
        // Demo data does not depend on the host kernel
        PlatformArg::Auto if demo => Ok(Platform::Linux),
        PlatformArg::Auto => Platform::detect(),
    }
}

/// Logs go to stderr so stdout carries only metrics
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
