//! wavemesh node — entry point.
//!
//! ```text
//! wavemesh-node                  Run in the foreground
//! wavemesh-node --config <path>  Load a custom config TOML
//! wavemesh-node --gen-config     Write default config to stdout
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use wavemesh_core::{CaptureService, JsonShareStore, ShareManager, TestPatternDevice, ZstdEncoder};

use wavemesh_node::config::NodeConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wavemesh-node", about = "wavemesh P2P chat node daemon")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "wavemesh-node.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&NodeConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    // Load config.
    let config = NodeConfig::load(&cli.config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("wavemesh-node v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "capture: {}x{} every {} ms",
        config.capture.width, config.capture.height, config.capture.tick_interval_ms
    );

    // ── 1. Share registry ───────────────────────────────────────

    let store = Arc::new(JsonShareStore::new(&config.shares.store_path));
    let mut shares = ShareManager::new(store);
    shares.reload().await?;
    info!(
        "share registry: {} directories ({})",
        shares.len(),
        config.shares.store_path
    );

    // ── 2. Capture pipeline ─────────────────────────────────────

    let device = TestPatternDevice::new(config.capture.width, config.capture.height);
    let mut service = CaptureService::with_config(Box::new(device), config.to_capture_config());
    service.set_encoder(Box::new(ZstdEncoder::new(config.encoder.zstd_level)));

    let mut packets = service
        .take_packet_receiver()
        .ok_or("packet receiver already taken")?;
    let stats = service.stats_receiver();
    let stop = service.stop_handle();

    // Stand-in for the network layer: drain the packet queue.
    let drain_handle = tokio::spawn(async move {
        while let Some(pkt) = packets.recv().await {
            debug!(
                "packet #{} ({} bytes, {}x{})",
                pkt.sequence,
                pkt.byte_len(),
                pkt.width,
                pkt.height
            );
        }
    });

    let capture_handle = tokio::spawn(async move {
        if let Err(e) = service.run().await {
            error!("capture service error: {e}");
        }
    });

    // ── 3. Status loop until Ctrl-C ─────────────────────────────

    let stop_clone = stop.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received, shutting down");
        stop_clone.store(false, Ordering::SeqCst);
    });

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        ticker.tick().await;
        if !capture_handle.is_finished() {
            let snap = stats.borrow().clone();
            info!(
                "bandwidth {:.0} B/s, {} frames ({} skipped, {} dropped)",
                snap.bandwidth_bps, snap.frames_captured, snap.frames_skipped, snap.packets_dropped
            );
        } else {
            break;
        }
    }

    let _ = capture_handle.await;
    drain_handle.abort();
    let _ = drain_handle.await;
    info!("wavemesh-node stopped");

    Ok(())
}
