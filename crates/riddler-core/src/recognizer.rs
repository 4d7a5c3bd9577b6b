use std::path::Path;
use std::time::Duration;

use riddler_types::PageSegMode;

/// OCR engine interface
///
/// `Ok` with an empty string means the engine ran and found nothing; errors
/// mean it could not give an answer at all. Output is raw text, callers
/// normalize it.
pub trait TextRecognizer {
    fn recognize(&self, image: &Path, mode: PageSegMode) -> Result<String, RecognizeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecognizeError {
    #[error("Recognizer unavailable: {0}")]
    Unavailable(String),

    #[error("Recognition failed: {0}")]
    Failed(String),

    #[error("Recognition timed out after {0:?}")]
    TimedOut(Duration),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RecognizeError {
    /// True when retrying on the next cycle cannot help
    pub fn is_unavailable(&self) -> bool {
        matches!(self, RecognizeError::Unavailable(_))
    }
}
