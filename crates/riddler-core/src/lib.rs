pub mod artifact;
pub mod capture;
pub mod catalog;
pub mod matcher;
pub mod preprocess;
pub mod recognizer;
pub mod state;

pub use artifact::{ArtifactStore, CaptureArtifact};
pub use capture::{CaptureError, CaptureResult, RegionCaptureProvider};
pub use catalog::{CatalogEntry, CatalogStore, LoadError};
pub use matcher::{MatchKind, RiddleMatch, find_match};
pub use preprocess::normalize;
pub use recognizer::{RecognizeError, TextRecognizer};
pub use state::MonitorState;
