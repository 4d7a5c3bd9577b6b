use std::path::PathBuf;

use riddler_types::{RegionPreset, RegionRatios, RegionSpec, ScreenSize};
use serde::{Deserialize, Serialize};

use crate::env_parse;

fn default_fallback_width() -> u32 {
    ScreenSize::FALLBACK.width
}

fn default_fallback_height() -> u32 {
    ScreenSize::FALLBACK.height
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub preset: RegionPreset,
    /// Custom ratios, replaces the preset when set
    pub ratios: Option<RegionRatios>,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
    /// Used when the screen size cannot be queried
    #[serde(default = "default_fallback_width")]
    pub fallback_width: u32,
    #[serde(default = "default_fallback_height")]
    pub fallback_height: u32,
    /// Where capture files are written
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
}

impl CaptureConfig {
    pub fn new() -> Self {
        let preset = env_parse("RIDDLER_REGION").unwrap_or_default();
        let artifact_dir = std::env::var("RIDDLER_ARTIFACT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_artifact_dir());

        Self {
            preset,
            artifact_dir,
            ..Self::default()
        }
    }

    pub fn region_spec(&self) -> RegionSpec {
        RegionSpec {
            ratios: self.ratios.unwrap_or_else(|| self.preset.ratios()),
            width_px: self.width_px,
            height_px: self.height_px,
        }
    }

    pub fn fallback_screen(&self) -> ScreenSize {
        ScreenSize {
            width: self.fallback_width,
            height: self.fallback_height,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            preset: RegionPreset::default(),
            ratios: None,
            width_px: None,
            height_px: None,
            fallback_width: default_fallback_width(),
            fallback_height: default_fallback_height(),
            artifact_dir: default_artifact_dir(),
        }
    }
}
