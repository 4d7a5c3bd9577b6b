use std::time::Duration;

use riddler_types::PageSegMode;
use serde::{Deserialize, Serialize};

use crate::env_parse;

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_language() -> String {
    "eng".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Executable name or absolute path
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Profile used by the live loop
    pub mode: PageSegMode,
    /// Kill the engine after this long; no limit when unset
    pub timeout_ms: Option<u64>,
}

impl OcrConfig {
    pub fn new() -> Self {
        let tesseract_path =
            std::env::var("TESSERACT_PATH").unwrap_or_else(|_| default_tesseract_path());
        let language = std::env::var("RIDDLER_OCR_LANG").unwrap_or_else(|_| default_language());
        let timeout_ms = env_parse("RIDDLER_OCR_TIMEOUT_MS");

        Self {
            tesseract_path,
            language,
            mode: PageSegMode::default(),
            timeout_ms,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: default_tesseract_path(),
            language: default_language(),
            mode: PageSegMode::default(),
            timeout_ms: None,
        }
    }
}
