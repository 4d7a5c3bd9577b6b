use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use riddler_config::Config;
use riddler_core::{CatalogStore, RegionCaptureProvider};
use riddler_ocr::{TesseractRecognizer, XcapCapture};
use riddler_types::{MatchPolicy, PageSegMode, RegionPreset};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

pub mod monitor;
pub mod profile;
pub mod report;


use self::monitor::MonitorLoop;
use self::report::ConsoleReporter;

#[derive(Parser, Debug)]
#[command(name = "riddler")]
#[command(about = "Watch a screen region and print the answer to each riddle clue", long_about = None)]
struct Cli {
    /// Riddle catalog (JSON array of {riddle, answers})
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// JSON config file, replaces environment defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pause between checks, in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Region preset: clue or lower-left
    #[arg(short, long)]
    region: Option<RegionPreset>,

    /// Region width in pixels instead of the preset ratio
    #[arg(long)]
    width: Option<u32>,

    /// Region height in pixels instead of the preset ratio
    #[arg(long)]
    height: Option<u32>,

    /// Only accept exact riddle matches
    #[arg(long)]
    exact_only: bool,

    /// Recognition profile for the live loop
    #[arg(long)]
    mode: Option<PageSegMode>,

    /// Tesseract language
    #[arg(long)]
    lang: Option<String>,

    /// Tesseract executable
    #[arg(long)]
    tesseract: Option<String>,

    /// Give up on a recognition after this many milliseconds
    #[arg(long)]
    ocr_timeout_ms: Option<u64>,

    /// Directory for capture files
    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Keep capture files instead of deleting them
    #[arg(long)]
    retain_artifacts: bool,

    /// Verbose logging; implies --retain-artifacts
    #[arg(short, long)]
    debug: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Print the effective config and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Command line flags win over file and environment
    fn apply(&self, config: &mut Config) {
        if let Some(catalog) = &self.catalog {
            config.catalog_path = catalog.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            config.monitor.interval_ms = interval_ms;
        }
        if let Some(region) = self.region {
            config.capture.preset = region;
            config.capture.ratios = None;
        }
        if self.width.is_some() {
            config.capture.width_px = self.width;
        }
        if self.height.is_some() {
            config.capture.height_px = self.height;
        }
        if self.exact_only {
            config.monitor.match_policy = MatchPolicy::ExactOnly;
        }
        if let Some(mode) = self.mode {
            config.ocr.mode = mode;
        }
        if let Some(lang) = &self.lang {
            config.ocr.language = lang.clone();
        }
        if let Some(tesseract) = &self.tesseract {
            config.ocr.tesseract_path = tesseract.clone();
        }
        if self.ocr_timeout_ms.is_some() {
            config.ocr.timeout_ms = self.ocr_timeout_ms;
        }
        if let Some(dir) = &self.artifact_dir {
            config.capture.artifact_dir = dir.clone();
        }
        if self.retain_artifacts || self.debug {
            config.monitor.retain_artifacts = true;
        }
    }
}

fn init_tracing(debug: bool, json: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.debug, cli.log_json);

    let mut config = profile::base_config(cli.config.as_deref())?;
    cli.apply(&mut config);

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Loading riddles...");
    let store = CatalogStore::load(&config.catalog_path)
        .with_context(|| format!("Failed to load riddles from {}", config.catalog_path.display()))?;
    println!("Loaded {} riddles.\n", store.len());

    let recognizer = TesseractRecognizer::from_config(&config.ocr);
    match recognizer.version() {
        Ok(version) => tracing::info!("Using {}", version),
        Err(e) => tracing::warn!("{}; OCR features may not work", e),
    }

    let capture = XcapCapture::new();
    match capture.screen_size() {
        Ok(size) => tracing::info!("Screen size detected: {}x{}", size.width, size.height),
        Err(e) => {
            let fallback = config.capture.fallback_screen();
            tracing::warn!(
                "Could not detect screen size ({}), using fallback: {}x{}",
                e,
                fallback.width,
                fallback.height
            );
        }
    }
    tracing::debug!("Monitoring region: {:?}", config.capture.region_spec());

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_on_ctrl_c(cancel.clone()));
    // Let the signal handler register before the first blocking cycle
    tokio::task::yield_now().await;

    println!("Waiting for clue...");
    println!("Press Ctrl+C to stop\n");

    let mut monitor = MonitorLoop::new(
        &config,
        store,
        capture,
        recognizer,
        ConsoleReporter::stdout(),
    );
    let summary = monitor.run(&cancel).await;

    println!("\nMonitoring stopped.");
    if summary.cleaned > 0 {
        println!("Cleaned up {} temporary file(s)", summary.cleaned);
    }
    tracing::info!(
        "Ran {} checks, reported {} answers",
        summary.cycles,
        summary.reports
    );

    Ok(())
}

async fn shutdown_on_ctrl_c(cancel: CancellationToken) {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {e}");
        return;
    }
    tracing::debug!("Shutdown requested");
    cancel.cancel();
}
