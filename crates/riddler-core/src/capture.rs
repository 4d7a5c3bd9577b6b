use std::path::{Path, PathBuf};

use riddler_types::{CaptureRegion, RegionSpec, ScreenSize};

use crate::artifact::{ArtifactStore, CaptureArtifact};

/// One captured region, alive for a single cycle
#[derive(Debug)]
pub struct CaptureResult {
    pub image: CaptureArtifact,
    /// Offset and size of the captured rectangle
    pub region: CaptureRegion,
    pub screen: ScreenSize,
}

/// Screen grabbing backend
pub trait RegionCaptureProvider {
    /// Size of the display being watched
    fn screen_size(&self) -> Result<ScreenSize, CaptureError>;

    /// Write a PNG of exactly `region` to `target`
    fn capture_region(&self, region: CaptureRegion, target: &Path) -> Result<(), CaptureError>;

    /// Resolve `spec` against the current screen and capture it.
    ///
    /// A failed screen query falls back to `fallback`. The image is checked
    /// to exist and be non-empty; on any error the artifact is released
    /// before returning.
    fn capture(
        &self,
        spec: &RegionSpec,
        fallback: ScreenSize,
        artifacts: &ArtifactStore,
    ) -> Result<CaptureResult, CaptureError> {
        let screen = match self.screen_size() {
            Ok(size) if size.width > 0 && size.height > 0 => size,
            Ok(size) => {
                tracing::debug!(
                    "Screen reported {}x{}, using fallback {}x{}",
                    size.width,
                    size.height,
                    fallback.width,
                    fallback.height
                );
                fallback
            }
            Err(e) => {
                tracing::debug!(
                    "Could not detect screen size ({}), using fallback {}x{}",
                    e,
                    fallback.width,
                    fallback.height
                );
                fallback
            }
        };

        let region = spec.resolve(screen);
        if region.width == 0 || region.height == 0 {
            return Err(CaptureError::EmptyRegion(region));
        }

        tracing::debug!(
            "Capturing {}x{} at ({}, {}) of {}x{}",
            region.width,
            region.height,
            region.x,
            region.y,
            screen.width,
            screen.height
        );

        let image = artifacts.allocate();
        self.capture_region(region, image.path())?;

        if image.byte_len() == 0 {
            return Err(CaptureError::EmptyImage(image.path().to_path_buf()));
        }

        Ok(CaptureResult {
            image,
            region,
            screen,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Screen query failed: {0}")]
    ScreenQuery(String),

    #[error("No monitor found")]
    NoMonitor,

    #[error("Region {0:?} has no area")]
    EmptyRegion(CaptureRegion),

    #[error("Capture failed: {0}")]
    Backend(String),

    #[error("Captured image is empty: {}", .0.display())]
    EmptyImage(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
