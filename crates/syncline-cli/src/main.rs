//! Syncline - one-way directory-to-HTTP synchronization
//!
//! Watches a local directory and mirrors file changes to a remote endpoint
//! as debounced, deduplicated, size-bounded multipart batch uploads.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use syncline_config::{Config, ConfigLoader, LoggingConfig};
use syncline_engine::{EngineConfig, FlushReport, SyncEngine};
use syncline_monitor::{scan_files, DirectoryMonitor};
use syncline_net::HttpUploader;
use syncline_types::SyncStats;
use tracing::{info, warn};

/// Syncline - one-way directory-to-HTTP synchronization
#[derive(Parser)]
#[command(
    name = "syncline",
    version = env!("CARGO_PKG_VERSION"),
    about = "Watch a directory and upload changed files in batches",
    long_about = "Syncline watches a local directory tree and transmits changed files\n\
                  to a remote endpoint as multipart HTTP batch uploads. Rapid change\n\
                  bursts are coalesced by a quiet-period debounce, duplicates are\n\
                  uploaded once, and failed batches are retried on later flushes."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a directory and upload changes as they happen
    Watch {
        /// Directory to watch
        #[arg(short, long)]
        directory: Option<PathBuf>,
        /// Upload target URL
        #[arg(short, long)]
        url: Option<String>,
        /// Quiet period before a flush, in milliseconds
        #[arg(short = 'b', long)]
        debounce: Option<u64>,
        /// Upload every file already present before watching
        #[arg(long)]
        upload_existing: bool,
        /// Skip TLS certificate validation
        #[arg(long)]
        insecure: bool,
    },
    /// Upload everything currently present, then exit
    Upload {
        /// Directory to upload
        #[arg(short, long)]
        directory: Option<PathBuf>,
        /// Upload target URL
        #[arg(short, long)]
        url: Option<String>,
        /// Skip TLS certificate validation
        #[arg(long)]
        insecure: bool,
    },
    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            directory,
            url,
            debounce,
            upload_existing,
            insecure,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, directory, url, insecure);
            if let Some(interval) = debounce {
                config.debounce.interval_ms = interval;
            }
            if upload_existing {
                config.watch.upload_existing = true;
            }
            init_logging(cli.debug, cli.quiet, cli.verbose, Some(&config.logging));
            info!("Syncline v{} starting", env!("CARGO_PKG_VERSION"));
            watch_command(config, cli.quiet).await?;
        }
        Commands::Upload {
            directory,
            url,
            insecure,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, directory, url, insecure);
            init_logging(cli.debug, cli.quiet, cli.verbose, Some(&config.logging));
            info!("Syncline v{} starting", env!("CARGO_PKG_VERSION"));
            upload_command(config, cli.quiet).await?;
        }
        Commands::Config { default } => {
            init_logging(cli.debug, cli.quiet, cli.verbose, None);
            config_command(cli.config.as_deref(), default)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config = match path {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("failed to load configuration from '{}'", path.display()))?,
        None => ConfigLoader::load_default().context("failed to load configuration")?,
    };
    Ok(config)
}

fn apply_overrides(
    config: &mut Config,
    directory: Option<PathBuf>,
    url: Option<String>,
    insecure: bool,
) {
    if let Some(directory) = directory {
        config.watch.root = directory;
    }
    if let Some(url) = url {
        config.upload.url = url;
    }
    if insecure {
        config.upload.accept_invalid_certs = true;
    }
}

/// Validate the merged configuration; failures here are startup-fatal
fn check_startup(config: &Config) -> Result<()> {
    config.validate().context("invalid configuration")?;
    if !config.watch.root.is_dir() {
        bail!(
            "watched root '{}' does not exist or is not a directory",
            config.watch.root.display()
        );
    }
    Ok(())
}

async fn watch_command(config: Config, quiet: bool) -> Result<()> {
    check_startup(&config)?;

    let transport = Arc::new(HttpUploader::from_config(&config.upload)?);
    let (mut engine, handle) = SyncEngine::new(EngineConfig::from_config(&config), transport)?;

    if config.watch.upload_existing {
        let report = upload_existing_pass(&mut engine, &config, quiet).await;
        if report.failed_batches > 0 {
            warn!(
                failed_batches = report.failed_batches,
                "startup upload left batches pending; they will be retried while watching"
            );
        }
    }

    let engine_task = tokio::spawn(engine.run());

    let monitor_handle = handle.clone();
    let monitor = DirectoryMonitor::start(
        &config.watch.root,
        config.watch.recursive,
        move |event| {
            if monitor_handle.send(event).is_err() {
                warn!("sync engine stopped; dropping change event");
            }
        },
    )?;

    if !quiet {
        println!(
            "{} Watching {} -> {}",
            style("⟲").blue().bold(),
            style(config.watch.root.display()).cyan(),
            style(&config.upload.url).cyan()
        );
    }
    info!(root = %config.watch.root.display(), "watching for changes, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown requested, draining pending uploads");

    // Dropping the watcher and every handle lets the engine drain and stop
    drop(monitor);
    drop(handle);
    let stats = engine_task.await.context("sync engine panicked")??;

    if !quiet {
        print_stats(&stats);
    }
    Ok(())
}

async fn upload_command(config: Config, quiet: bool) -> Result<()> {
    check_startup(&config)?;

    let transport = Arc::new(HttpUploader::from_config(&config.upload)?);
    let (mut engine, _handle) = SyncEngine::new(EngineConfig::from_config(&config), transport)?;

    let report = upload_existing_pass(&mut engine, &config, quiet).await;
    if report.failed_batches > 0 {
        bail!("{} batch(es) failed to upload", report.failed_batches);
    }
    Ok(())
}

async fn upload_existing_pass(
    engine: &mut SyncEngine,
    config: &Config,
    quiet: bool,
) -> FlushReport {
    let files = scan_files(&config.watch.root);
    info!(files = files.len(), "uploading existing files");

    let report = engine.upload_all(files).await;

    if !quiet {
        println!(
            "{} Uploaded {} file(s), {} byte(s); {} rejected, {} batch(es) failed",
            style("→").green().bold(),
            style(report.uploaded_files).cyan(),
            style(report.uploaded_bytes).cyan(),
            report.rejected_files,
            report.failed_batches
        );
    }
    report
}

fn config_command(path: Option<&std::path::Path>, default: bool) -> Result<()> {
    let yaml = if default {
        ConfigLoader::default_config_yaml()?
    } else {
        let config = load_config(path)?;
        serde_yaml::to_string(&config).context("failed to render configuration")?
    };
    println!("{}", yaml);
    Ok(())
}

fn print_stats(stats: &SyncStats) {
    println!("{} Sync session summary", style("✓").green().bold());
    println!("  Events seen:      {}", stats.events_seen);
    println!("  Events rejected:  {}", stats.events_rejected);
    println!("  Flushes:          {}", stats.flushes);
    println!("  Batches sent:     {}", stats.batches_sent);
    println!("  Batches failed:   {}", stats.batches_failed);
    println!("  Files uploaded:   {}", stats.files_uploaded);
    println!("  Bytes uploaded:   {}", stats.bytes_uploaded);
    println!("  Files dropped:    {}", stats.files_dropped);
}

fn init_logging(debug: bool, quiet: bool, verbose: bool, logging: Option<&LoggingConfig>) {
    use tracing_subscriber::{fmt, EnvFilter};

    // CLI flags win over the configured level; RUST_LOG wins over both
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        logging.map_or("warn", |l| l.level.as_str())
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_ansi(logging.map_or(true, |l| l.colored_output))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();
}
