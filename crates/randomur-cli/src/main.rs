//! Randomur - browse the random image gallery from a terminal.
//!
//! Reads commands from stdin and prints each page of thumbnails as it
//! arrives. Connectivity is tracked with a background HTTP probe.

mod commands;
mod console;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{parse_command, HELP};
use console::{ConsoleSurface, MemoryThumbnailCache};
use randomur_core::feed::{load_view_state, save_view_state};
use randomur_core::{
    CancellationToken, ConnectivityMonitor, ConnectivityProbe, FeedCommand, FeedRuntime,
    GalleryClient, GalleryConfig, GalleryDefaults, NetworkConfig, ProbeConfig, Startup,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "randomur")]
#[command(about = "Browse the random image gallery")]
struct Args {
    /// Gallery API client id
    #[arg(long, env = "RANDOMUR_CLIENT_ID")]
    client_id: String,

    /// Gallery API base URL
    #[arg(long, env = "RANDOMUR_API_BASE", default_value = GalleryDefaults::API_BASE)]
    api_base: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = NetworkConfig::REQUEST_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Seconds between connectivity probes
    #[arg(long, default_value_t = NetworkConfig::PROBE_INTERVAL.as_secs())]
    probe_interval_secs: u64,

    /// Where to keep the view flags between runs
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --debug when set
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting Randomur");

    let config = GalleryConfig::new(args.client_id)
        .with_api_base(args.api_base)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let gallery = Arc::new(GalleryClient::new(config).context("invalid gallery configuration")?);

    let probe = ConnectivityProbe::new(ProbeConfig {
        interval: Duration::from_secs(args.probe_interval_secs.max(1)),
        ..ProbeConfig::default()
    })?;
    let monitor = Arc::new(ConnectivityMonitor::new(probe.check().await));
    let probe_token = CancellationToken::new();
    let probe_handle = probe.spawn(monitor.clone(), probe_token.clone());

    let startup = match &args.state_file {
        Some(path) => match load_view_state(path).await {
            Ok(Some(saved)) => {
                info!("Restoring view state from {}", path.display());
                Startup::Restore(saved)
            }
            Ok(None) => Startup::Cold,
            Err(e) => {
                warn!("Ignoring saved view state: {}", e);
                Startup::Cold
            }
        },
        None => Startup::Cold,
    };

    let (runtime, commands) = FeedRuntime::new(
        gallery,
        &monitor,
        ConsoleSurface::new(),
        MemoryThumbnailCache::default(),
    );

    println!("{}", HELP);
    tokio::spawn(read_commands(commands.clone()));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = commands.send(FeedCommand::Shutdown).await;
        }
    });

    let presenter = runtime.run(startup).await;

    probe_token.cancel();
    let _ = probe_handle.await;

    if let Some(path) = &args.state_file {
        save_view_state(path, &presenter.save_state())
            .await
            .with_context(|| format!("failed to save view state to {}", path.display()))?;
    }

    info!("Randomur stopped");
    Ok(())
}

/// Forward stdin lines to the runtime until EOF or `q`.
async fn read_commands(tx: mpsc::Sender<FeedCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(command) => {
                let quit = command == FeedCommand::Shutdown;
                if tx.send(command).await.is_err() || quit {
                    return;
                }
            }
            None => eprintln!("{}", HELP),
        }
    }
    let _ = tx.send(FeedCommand::Shutdown).await;
}
