use std::time::Duration;

use riddler_config::Config;
use riddler_core::{
    ArtifactStore, CatalogStore, MonitorState, RegionCaptureProvider, TextRecognizer, find_match,
    normalize,
};
use riddler_types::{MatchPolicy, PageSegMode, RegionSpec, ScreenSize};
use tokio_util::sync::CancellationToken;

use crate::report::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Capturing,
    Recognizing,
    Matching,
    Reporting,
    Sleeping,
    Stopped,
}

/// How a single cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No image this cycle
    CaptureFailed,
    /// Nothing readable in the region
    Blank,
    /// Same text as the previous detection
    Unchanged,
    NoMatch,
    /// Matched, but the answer was already printed
    Repeated,
    /// Matched, but the reporter could not write it
    ReportFailed,
    Reported { riddle: String, answer: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub reports: u64,
    /// Transient files removed on shutdown
    pub cleaned: usize,
}

/// Capture → recognize → match → report, once per interval, until cancelled
pub struct MonitorLoop<C, R, W> {
    store: CatalogStore,
    capture: C,
    recognizer: R,
    reporter: W,
    artifacts: ArtifactStore,
    region: RegionSpec,
    fallback_screen: ScreenSize,
    mode: PageSegMode,
    policy: MatchPolicy,
    interval: Duration,
    state: MonitorState,
    phase: Phase,
    recognizer_warned: bool,
}

impl<C, R, W> MonitorLoop<C, R, W>
where
    C: RegionCaptureProvider,
    R: TextRecognizer,
    W: Reporter,
{
    pub fn new(config: &Config, store: CatalogStore, capture: C, recognizer: R, reporter: W) -> Self {
        Self {
            store,
            capture,
            recognizer,
            reporter,
            artifacts: ArtifactStore::new(
                &config.capture.artifact_dir,
                config.monitor.retain_artifacts,
            ),
            region: config.capture.region_spec(),
            fallback_screen: config.capture.fallback_screen(),
            mode: config.ocr.mode,
            policy: config.monitor.match_policy,
            interval: config.monitor.interval(),
            state: MonitorState::new(),
            phase: Phase::Idle,
            recognizer_warned: false,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Poll until `cancel` fires, then sweep leftover artifacts.
    ///
    /// Cancellation is observed before each cycle and during the sleep
    /// between cycles, never in the middle of a capture or recognition.
    pub async fn run(&mut self, cancel: &CancellationToken) -> RunSummary {
        let mut summary = RunSummary::default();

        while !cancel.is_cancelled() {
            summary.cycles += 1;
            let outcome = self.run_cycle();
            tracing::debug!("Check #{}: {:?}", summary.cycles, outcome);
            if matches!(outcome, CycleOutcome::Reported { .. }) {
                summary.reports += 1;
            }

            self.phase = Phase::Sleeping;
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.phase = Phase::Stopped;
        if self.artifacts.retains() {
            tracing::info!(
                "Keeping capture files in {}",
                self.artifacts.dir().display()
            );
        } else {
            summary.cleaned = self.artifacts.sweep();
        }
        summary
    }

    /// One cycle. The capture file is released before this returns.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.phase = Phase::Capturing;
        let capture = match self
            .capture
            .capture(&self.region, self.fallback_screen, &self.artifacts)
        {
            Ok(capture) => capture,
            Err(e) => {
                tracing::debug!("Failed to capture screen region: {}", e);
                return CycleOutcome::CaptureFailed;
            }
        };

        self.phase = Phase::Recognizing;
        let raw = match self.recognizer.recognize(capture.image.path(), self.mode) {
            Ok(raw) => raw,
            Err(e) if e.is_unavailable() => {
                if !self.recognizer_warned {
                    tracing::warn!("{}", e);
                    self.recognizer_warned = true;
                }
                String::new()
            }
            Err(e) => {
                tracing::debug!("{}", e);
                String::new()
            }
        };
        drop(capture);

        let text = normalize(&raw);
        if text.is_empty() {
            return CycleOutcome::Blank;
        }
        if !self.state.accept_text(&text) {
            return CycleOutcome::Unchanged;
        }

        self.phase = Phase::Matching;
        tracing::debug!("Processing detected text: '{}'", text);
        let Some(found) = find_match(&text, &self.store, self.policy) else {
            return CycleOutcome::NoMatch;
        };

        self.phase = Phase::Reporting;
        if self.state.is_repeat_answer(found.answer) {
            return CycleOutcome::Repeated;
        }

        if let Err(e) = self.reporter.report(found.riddle, found.answer) {
            tracing::warn!("Failed to write report: {}", e);
            return CycleOutcome::ReportFailed;
        }
        self.state.mark_printed(found.answer);
        CycleOutcome::Reported {
            riddle: found.riddle.to_string(),
            answer: found.answer.to_string(),
        }
    }
}
