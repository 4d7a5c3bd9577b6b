//! Run every recognition profile over one image and look the results up in
//! the catalog: `cargo run -p riddler-ocr --bin probe -- riddle.png`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use riddler_config::Config;
use riddler_core::{CatalogStore, MatchKind, TextRecognizer, find_match, normalize};
use riddler_ocr::TesseractRecognizer;
use riddler_types::{MatchPolicy, PageSegMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "probe")]
#[command(about = "Test riddle detection against a saved screenshot", long_about = None)]
struct Cli {
    /// Image to recognize
    image: PathBuf,

    /// Riddle catalog (defaults to RIDDLER_CATALOG or riddles.json)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Tesseract language
    #[arg(short, long)]
    lang: Option<String>,

    /// Tesseract executable
    #[arg(long)]
    tesseract: Option<String>,
}

struct ProbeHit {
    mode: PageSegMode,
    detected: String,
    kind: MatchKind,
    riddle: String,
    answer: String,
}

/// Environment (and .env) first, then command line flags
fn probe_config(cli: &Cli) -> Config {
    let mut config = Config::new();
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(lang) = &cli.lang {
        config.ocr.language = lang.clone();
    }
    if let Some(tesseract) = &cli.tesseract {
        config.ocr.tesseract_path = tesseract.clone();
    }
    config
}

fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = probe_config(&cli);

    let rule = "=".repeat(60);
    let thin = "-".repeat(60);
    println!("{rule}");
    println!("Testing Riddle Match Detection");
    println!("{rule}\n");

    anyhow::ensure!(
        cli.image.exists(),
        "Test image '{}' not found",
        cli.image.display()
    );

    println!("Loading riddles from {}...", config.catalog_path.display());
    let store = CatalogStore::load(&config.catalog_path)
        .with_context(|| format!("Failed to load {}", config.catalog_path.display()))?;
    println!("Loaded {} riddles.\n", store.len());

    let recognizer = TesseractRecognizer::from_config(&config.ocr);
    match recognizer.version() {
        Ok(version) => tracing::info!("Using {}", version),
        Err(e) => anyhow::bail!("Tesseract is not usable: {e}"),
    }

    println!("Extracting text from {}...", cli.image.display());
    println!("{thin}");

    let mut detected = Vec::new();
    for mode in PageSegMode::ALL {
        match recognizer.recognize(&cli.image, mode) {
            Ok(raw) => {
                let text = normalize(&raw);
                if !text.is_empty() {
                    println!("  {mode}: '{text}'");
                    detected.push((mode, text));
                }
            }
            Err(e) => tracing::warn!("{} failed: {}", mode, e),
        }
    }
    println!();

    println!("Searching for matches in riddles...");
    println!("{thin}");

    let hits: Vec<ProbeHit> = detected
        .iter()
        .filter_map(|(mode, text)| {
            find_match(text, &store, MatchPolicy::ExactThenSubstring).map(|m| ProbeHit {
                mode: *mode,
                detected: text.clone(),
                kind: m.kind,
                riddle: m.riddle.to_string(),
                answer: m.answer.to_string(),
            })
        })
        .collect();

    if hits.is_empty() {
        println!("No matches found in riddles database.\n");
        println!("Detected texts were:");
        for (_, text) in &detected {
            println!("  - {text}");
        }
        return Ok(());
    }

    println!("Found {} match(es):\n", hits.len());
    for (idx, hit) in hits.iter().enumerate() {
        println!("Match {}:", idx + 1);
        println!("  OCR Mode: {}", hit.mode);
        println!("  Detected Text: '{}'", hit.detected);
        println!("  Match Type: {}", kind_label(hit.kind));
        println!("  Riddle: '{}'", hit.riddle);
        println!("  Answer: {}\n", hit.answer);
    }

    // Exact hits are preferred over substring hits
    let best = hits
        .iter()
        .find(|hit| hit.kind == MatchKind::Exact)
        .unwrap_or(&hits[0]);

    println!("{rule}");
    println!("BEST MATCH ({}):", kind_label(best.kind));
    if best.kind == MatchKind::Substring {
        println!("  Detected: '{}'", best.detected);
    }
    println!("  Riddle: '{}'", best.riddle);
    println!("  Answer: {}", best.answer);
    println!("{rule}");

    Ok(())
}

fn kind_label(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::Exact => "exact",
        MatchKind::Substring => "partial",
    }
}
