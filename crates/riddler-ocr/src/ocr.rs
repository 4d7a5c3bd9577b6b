use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use riddler_config::ocr::OcrConfig;
use riddler_core::{RecognizeError, TextRecognizer};
use riddler_types::PageSegMode;
use wait_timeout::ChildExt;

/// Runs the `tesseract` executable, one process per image
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: String,
    language: String,
    timeout: Option<Duration>,
}

impl TesseractRecognizer {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.tesseract_path, &config.language).with_timeout(config.timeout())
    }

    /// Kill the engine if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// First line of `tesseract --version`
    pub fn version(&self) -> Result<String, RecognizeError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(RecognizeError::Unavailable(format!(
                "{} --version exited with {}",
                self.program, output.status
            )));
        }

        // Older builds print the banner on stderr
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    fn spawn_error(&self, e: std::io::Error) -> RecognizeError {
        match e.kind() {
            ErrorKind::NotFound => {
                RecognizeError::Unavailable(format!("'{}' not found on PATH", self.program))
            }
            _ => RecognizeError::Unavailable(format!("Failed to start '{}': {}", self.program, e)),
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &Path, mode: PageSegMode) -> Result<String, RecognizeError> {
        let mut child = Command::new(&self.program)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(mode.psm().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Both pipes are drained while waiting, a full pipe would stall the engine
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RecognizeError::TimedOut(timeout));
                }
            },
            None => child.wait()?,
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(RecognizeError::Failed(format!(
                "tesseract exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}
