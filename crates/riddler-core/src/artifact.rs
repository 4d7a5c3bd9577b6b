use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Prefix of the region captures written each cycle
pub const CAPTURE_PREFIX: &str = "temp_screen_center_";

/// File name shapes treated as leftovers from this or earlier runs
const TRANSIENT_PATTERNS: &[(&str, &str)] = &[
    (CAPTURE_PREFIX, ".png"),
    ("temp_left_region_", ".png"),
    ("temp_region_", ".png"),
    ("temp_text_region_", ".png"),
    ("temp_capture_", ".ps1"),
    ("temp_diff_", ".png"),
    ("temp_result_", ".txt"),
];

pub fn is_transient(file_name: &str) -> bool {
    TRANSIENT_PATTERNS.iter().any(|(prefix, suffix)| {
        file_name.len() > prefix.len() + suffix.len()
            && file_name.starts_with(prefix)
            && file_name.ends_with(suffix)
    })
}

/// Hands out capture paths and cleans the directory on shutdown
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    retain: bool,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, retain: bool) -> Self {
        Self {
            dir: dir.into(),
            retain,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn retains(&self) -> bool {
        self.retain
    }

    /// Fresh, uniquely named capture file (not created yet)
    pub fn allocate(&self) -> CaptureArtifact {
        let name = format!("{CAPTURE_PREFIX}{}.png", Uuid::new_v4().simple());
        CaptureArtifact {
            path: self.dir.join(name),
            retain: self.retain,
        }
    }

    /// Delete every transient file in the directory.
    ///
    /// Failures are logged and skipped. Returns how many files were removed.
    pub fn sweep(&self) -> usize {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Could not list {}: {}", self.dir.display(), e);
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_transient(name) || !entry.path().is_file() {
                continue;
            }

            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Could not delete {}: {}", entry.path().display(), e),
            }
        }
        removed
    }
}

/// RAII guard for one capture file
///
/// The file is deleted when the guard is dropped unless it is retained,
/// so every exit path of a cycle releases it.
#[derive(Debug)]
pub struct CaptureArtifact {
    path: PathBuf,
    retain: bool,
}

impl CaptureArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size on disk, 0 when missing
    pub fn byte_len(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }
}

impl Drop for CaptureArtifact {
    fn drop(&mut self) {
        if self.retain {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not delete {}: {}", self.path.display(), e),
        }
    }
}
