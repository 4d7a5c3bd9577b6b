use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rectangle on screen, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const FALLBACK: ScreenSize = ScreenSize {
        width: 1920,
        height: 1080,
    };
}

/// Region geometry as fractions of the screen size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionRatios {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

impl RegionRatios {
    /// Band right of center where the "Clue:" line is drawn
    pub const CLUE: RegionRatios = RegionRatios {
        width: 0.40,
        height: 0.10,
        left: 0.55,
        top: 0.30,
    };

    /// Lower-left quadrant
    pub const LOWER_LEFT: RegionRatios = RegionRatios {
        width: 0.40,
        height: 0.50,
        left: 0.0,
        top: 0.50,
    };
}

/// Named region presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionPreset {
    #[default]
    Clue,
    LowerLeft,
}

impl RegionPreset {
    pub fn ratios(self) -> RegionRatios {
        match self {
            RegionPreset::Clue => RegionRatios::CLUE,
            RegionPreset::LowerLeft => RegionRatios::LOWER_LEFT,
        }
    }
}

impl FromStr for RegionPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clue" => Ok(RegionPreset::Clue),
            "lower-left" | "lower_left" => Ok(RegionPreset::LowerLeft),
            other => Err(format!(
                "unknown region preset '{other}' (expected 'clue' or 'lower-left')"
            )),
        }
    }
}

/// Everything needed to turn a screen size into a capture rectangle.
///
/// Explicit pixel sizes win over the ratio-derived ones; offsets always come
/// from the ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSpec {
    pub ratios: RegionRatios,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

impl RegionSpec {
    pub fn from_ratios(ratios: RegionRatios) -> Self {
        Self {
            ratios,
            width_px: None,
            height_px: None,
        }
    }

    pub fn resolve(&self, screen: ScreenSize) -> CaptureRegion {
        let scale = |total: u32, ratio: f64| (f64::from(total) * ratio).floor() as u32;

        CaptureRegion {
            x: scale(screen.width, self.ratios.left) as i32,
            y: scale(screen.height, self.ratios.top) as i32,
            width: self
                .width_px
                .unwrap_or_else(|| scale(screen.width, self.ratios.width)),
            height: self
                .height_px
                .unwrap_or_else(|| scale(screen.height, self.ratios.height)),
        }
    }
}

impl Default for RegionSpec {
    fn default() -> Self {
        Self::from_ratios(RegionPreset::default().ratios())
    }
}

/// How detected text is matched against the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Exact key first, then first substring hit in catalog order
    #[default]
    ExactThenSubstring,
    ExactOnly,
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact-then-substring" | "substring" => Ok(MatchPolicy::ExactThenSubstring),
            "exact-only" | "exact" => Ok(MatchPolicy::ExactOnly),
            other => Err(format!(
                "unknown match policy '{other}' (expected 'exact-then-substring' or 'exact-only')"
            )),
        }
    }
}

/// Recognition profile. Values mirror tesseract's page segmentation modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSegMode {
    #[default]
    UniformBlock,
    SingleWord,
    SingleLine,
    FullPage,
    SparseText,
}

impl PageSegMode {
    /// Order used by the probe: block first, then the narrower profiles
    pub const ALL: [PageSegMode; 5] = [
        PageSegMode::UniformBlock,
        PageSegMode::SingleWord,
        PageSegMode::SingleLine,
        PageSegMode::FullPage,
        PageSegMode::SparseText,
    ];

    pub fn psm(self) -> u8 {
        match self {
            PageSegMode::UniformBlock => 6,
            PageSegMode::SingleWord => 8,
            PageSegMode::SingleLine => 7,
            PageSegMode::FullPage => 3,
            PageSegMode::SparseText => 11,
        }
    }
}

impl fmt::Display for PageSegMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PageSegMode::UniformBlock => "uniform block",
            PageSegMode::SingleWord => "single word",
            PageSegMode::SingleLine => "single line",
            PageSegMode::FullPage => "automatic",
            PageSegMode::SparseText => "sparse text",
        };
        write!(f, "PSM {} ({})", self.psm(), label)
    }
}

impl FromStr for PageSegMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Ok(psm) = s.parse::<u8>() {
            return PageSegMode::ALL
                .into_iter()
                .find(|mode| mode.psm() == psm)
                .ok_or_else(|| format!("unsupported page segmentation mode {psm}"));
        }

        match s.as_str() {
            "uniform-block" | "block" => Ok(PageSegMode::UniformBlock),
            "single-word" | "word" => Ok(PageSegMode::SingleWord),
            "single-line" | "line" => Ok(PageSegMode::SingleLine),
            "full-page" | "auto" => Ok(PageSegMode::FullPage),
            "sparse-text" | "sparse" => Ok(PageSegMode::SparseText),
            other => Err(format!("unknown recognition mode '{other}'")),
        }
    }
}
