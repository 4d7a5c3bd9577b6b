use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::monitor::MonitorConfig;
use self::ocr::OcrConfig;

pub mod capture;
pub mod monitor;
pub mod ocr;

fn default_catalog_path() -> PathBuf {
    PathBuf::from("riddles.json")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Riddle catalog (JSON array of `{riddle, answers}`)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    pub monitor: MonitorConfig,
    pub capture: CaptureConfig,
    pub ocr: OcrConfig,
}

impl Config {
    /// Defaults overlaid with whatever `RIDDLER_*` variables are set
    pub fn new() -> Self {
        let catalog_path = env::var("RIDDLER_CATALOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_catalog_path());

        Config {
            catalog_path,
            monitor: MonitorConfig::new(),
            capture: CaptureConfig::new(),
            ocr: OcrConfig::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            monitor: MonitorConfig::default(),
            capture: CaptureConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

/// Parsed value of an environment variable, `None` when unset or malformed
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Accepts `1/0`, `true/false`, `yes/no`, `on/off`
pub(crate) fn env_flag(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
