//! Monitor loop behaviour against scripted capture and recognition

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use riddler_config::Config;
use riddler_core::{CaptureError, CatalogStore, RecognizeError, RegionCaptureProvider, TextRecognizer};
use riddler_types::{CaptureRegion, MatchPolicy, PageSegMode, ScreenSize};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::monitor::{CycleOutcome, MonitorLoop, Phase};
use crate::report::Reporter;

enum Step {
    CaptureFails,
    Text(&'static str),
    EngineError,
}

type Script = Rc<RefCell<VecDeque<Step>>>;

struct ScriptedCapture {
    script: Script,
    /// Cancelled once the script runs dry
    done: CancellationToken,
}

impl RegionCaptureProvider for ScriptedCapture {
    fn screen_size(&self) -> Result<ScreenSize, CaptureError> {
        Ok(ScreenSize::FALLBACK)
    }

    fn capture_region(&self, _region: CaptureRegion, target: &Path) -> Result<(), CaptureError> {
        let mut script = self.script.borrow_mut();
        match script.front() {
            None => {
                self.done.cancel();
                Err(CaptureError::Backend("script finished".to_string()))
            }
            Some(Step::CaptureFails) => {
                script.pop_front();
                Err(CaptureError::Backend("scripted failure".to_string()))
            }
            Some(_) => {
                fs::write(target, b"png")?;
                Ok(())
            }
        }
    }
}

struct ScriptedRecognizer {
    script: Script,
    seen: Rc<RefCell<Vec<(PathBuf, bool)>>>,
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, image: &Path, mode: PageSegMode) -> Result<String, RecognizeError> {
        assert_eq!(mode, PageSegMode::UniformBlock);
        self.seen
            .borrow_mut()
            .push((image.to_path_buf(), image.exists()));

        match self.script.borrow_mut().pop_front() {
            Some(Step::Text(text)) => Ok(text.to_string()),
            Some(Step::EngineError) => Err(RecognizeError::Failed("scripted".to_string())),
            Some(Step::CaptureFails) | None => Ok(String::new()),
        }
    }
}

#[derive(Clone, Default)]
struct Recorded {
    entries: Rc<RefCell<Vec<(String, String)>>>,
    /// Number of upcoming writes that fail
    failures: Rc<Cell<u32>>,
}

impl Reporter for Recorded {
    fn report(&mut self, riddle: &str, answer: &str) -> io::Result<()> {
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
        }
        self.entries
            .borrow_mut()
            .push((riddle.to_string(), answer.to_string()));
        Ok(())
    }
}

impl Recorded {
    fn entries(&self) -> Vec<(String, String)> {
        self.entries.borrow().clone()
    }

    fn fail_next(&self, count: u32) {
        self.failures.set(count);
    }
}

struct Harness {
    monitor: MonitorLoop<ScriptedCapture, ScriptedRecognizer, Recorded>,
    reports: Recorded,
    seen: Rc<RefCell<Vec<(PathBuf, bool)>>>,
    done: CancellationToken,
    dir: TempDir,
}

fn catalog() -> CatalogStore {
    CatalogStore::from_json(
        r#"[
            {"riddle": "what has keys but no locks", "answers": "a keyboard"},
            {"riddle": "I have keys but open no doors", "answers": "a keyboard"},
            {"riddle": "what has a neck but no head", "answers": "a bottle"}
        ]"#,
    )
    .unwrap()
}

fn harness_with(steps: Vec<Step>, adjust: impl FnOnce(&mut Config)) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.capture.artifact_dir = dir.path().to_path_buf();
    config.monitor.interval_ms = 1;
    adjust(&mut config);

    let script: Script = Rc::new(RefCell::new(steps.into_iter().collect()));
    let done = CancellationToken::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let reports = Recorded::default();

    let monitor = MonitorLoop::new(
        &config,
        catalog(),
        ScriptedCapture {
            script: script.clone(),
            done: done.clone(),
        },
        ScriptedRecognizer {
            script,
            seen: seen.clone(),
        },
        reports.clone(),
    );

    Harness {
        monitor,
        reports,
        seen,
        done,
        dir,
    }
}

fn harness(steps: Vec<Step>) -> Harness {
    harness_with(steps, |_| {})
}

fn reported(riddle: &str, answer: &str) -> CycleOutcome {
    CycleOutcome::Reported {
        riddle: riddle.to_string(),
        answer: answer.to_string(),
    }
}

#[test]
fn test_keyboard_scenario() {
    let mut h = harness(vec![
        Step::Text("what has keys but no locks"),
        Step::Text("what has keys but no locks"),
        Step::Text("press any button to continue"),
    ]);

    assert_eq!(
        h.monitor.run_cycle(),
        reported("what has keys but no locks", "a keyboard")
    );
    assert_eq!(h.monitor.run_cycle(), CycleOutcome::Unchanged);
    assert_eq!(h.monitor.run_cycle(), CycleOutcome::NoMatch);

    assert_eq!(
        h.reports.entries(),
        vec![(
            "what has keys but no locks".to_string(),
            "a keyboard".to_string()
        )]
    );
    let state = h.monitor.state();
    assert_eq!(
        state.last_detected_text.as_deref(),
        Some("press any button to continue")
    );
    assert_eq!(state.last_printed_answer.as_deref(), Some("a keyboard"));
}

#[test]
fn test_ocr_text_is_normalized_before_matching() {
    let mut h = harness(vec![Step::Text("  What Has KEYS\nbut no   LOCKS \n")]);

    assert_eq!(
        h.monitor.run_cycle(),
        reported("what has keys but no locks", "a keyboard")
    );
    assert_eq!(
        h.monitor.state().last_detected_text.as_deref(),
        Some("what has keys but no locks")
    );
}

#[test]
fn test_capture_failure_leaves_state_unchanged() {
    let mut h = harness(vec![
        Step::Text("what has a neck but no head"),
        Step::CaptureFails,
    ]);

    h.monitor.run_cycle();
    let before = h.monitor.state().clone();

    assert_eq!(h.monitor.run_cycle(), CycleOutcome::CaptureFailed);
    assert_eq!(h.monitor.state(), &before);
    assert_eq!(h.seen.borrow().len(), 1);
}

#[test]
fn test_dedup_is_answer_scoped() {
    let mut h = harness(vec![
        Step::Text("what has keys but no locks"),
        Step::Text("i have keys but open no doors"),
    ]);

    assert!(matches!(
        h.monitor.run_cycle(),
        CycleOutcome::Reported { .. }
    ));
    assert_eq!(h.monitor.run_cycle(), CycleOutcome::Repeated);
    assert_eq!(h.reports.entries().len(), 1);
    assert_eq!(
        h.monitor.state().last_detected_text.as_deref(),
        Some("i have keys but open no doors")
    );
}

#[test]
fn test_failed_report_does_not_count_as_printed() {
    let mut h = harness(vec![
        Step::Text("what has keys but no locks"),
        Step::Text("i have keys but open no doors"),
    ]);
    h.reports.fail_next(1);

    assert_eq!(h.monitor.run_cycle(), CycleOutcome::ReportFailed);
    assert_eq!(h.monitor.state().last_printed_answer, None);

    // Same answer through another riddle is still delivered
    assert_eq!(
        h.monitor.run_cycle(),
        reported("i have keys but open no doors", "a keyboard")
    );
    assert_eq!(
        h.monitor.state().last_printed_answer.as_deref(),
        Some("a keyboard")
    );
    assert_eq!(h.reports.entries().len(), 1);
}

#[test]
fn test_returning_clue_is_reported_again_after_another_answer() {
    let mut h = harness(vec![
        Step::Text("what has keys but no locks"),
        Step::Text("what has a neck but no head"),
        Step::Text("what has keys but no locks"),
    ]);

    h.monitor.run_cycle();
    h.monitor.run_cycle();
    h.monitor.run_cycle();

    let answers: Vec<_> = h.reports.entries().into_iter().map(|(_, a)| a).collect();
    assert_eq!(answers, vec!["a keyboard", "a bottle", "a keyboard"]);
}

#[test]
fn test_blank_and_failed_recognition_skip_matching() {
    let mut h = harness(vec![
        Step::Text("what has keys but no locks"),
        Step::Text(" \n\t "),
        Step::EngineError,
    ]);

    h.monitor.run_cycle();
    let before = h.monitor.state().clone();

    assert_eq!(h.monitor.run_cycle(), CycleOutcome::Blank);
    assert_eq!(h.monitor.run_cycle(), CycleOutcome::Blank);
    assert_eq!(h.monitor.state(), &before);
}

#[test]
fn test_substring_match_and_exact_only_policy() {
    let mut h = harness(vec![Step::Text("clue: what has a neck but no head?")]);
    assert_eq!(
        h.monitor.run_cycle(),
        reported("what has a neck but no head", "a bottle")
    );

    let mut strict = harness_with(
        vec![Step::Text("clue: what has a neck but no head?")],
        |config| config.monitor.match_policy = MatchPolicy::ExactOnly,
    );
    assert_eq!(strict.monitor.run_cycle(), CycleOutcome::NoMatch);
    assert!(strict.reports.entries().is_empty());
}

#[test]
fn test_capture_file_released_after_each_cycle() {
    let mut h = harness(vec![
        Step::Text("what has keys but no locks"),
        Step::Text("nothing here"),
    ]);

    h.monitor.run_cycle();
    h.monitor.run_cycle();

    let seen = h.seen.borrow();
    assert_eq!(seen.len(), 2);
    for (path, existed) in seen.iter() {
        assert!(existed, "recognizer got a missing file");
        assert!(!path.exists(), "{} was not released", path.display());
    }
    assert_eq!(fs::read_dir(h.dir.path()).unwrap().count(), 0);
}

#[test]
fn test_retained_capture_files_stay_on_disk() {
    let mut h = harness_with(vec![Step::Text("nothing here")], |config| {
        config.monitor.retain_artifacts = true;
    });

    h.monitor.run_cycle();
    let (path, _) = h.seen.borrow()[0].clone();
    assert!(path.exists());
}

#[tokio::test]
async fn test_run_until_cancelled_then_sweep() {
    let mut h = harness(vec![
        Step::Text("what has keys but no locks"),
        Step::Text("what has keys but no locks"),
        Step::CaptureFails,
        Step::Text("what has a neck but no head"),
    ]);
    fs::write(h.dir.path().join("temp_diff_old.png"), b"x").unwrap();
    fs::write(h.dir.path().join("riddles.json"), b"[]").unwrap();

    let done = h.done.clone();
    let summary = h.monitor.run(&done).await;

    // four scripted cycles plus the one that found the script empty
    assert_eq!(summary.cycles, 5);
    assert_eq!(summary.reports, 2);
    assert_eq!(summary.cleaned, 1);
    assert_eq!(h.monitor.phase(), Phase::Stopped);
    assert_eq!(h.reports.entries().len(), 2);
    assert!(h.dir.path().join("riddles.json").exists());
}

#[tokio::test]
async fn test_cancelled_before_start_runs_no_cycles() {
    let mut h = harness(vec![Step::Text("what has keys but no locks")]);
    fs::write(h.dir.path().join("temp_region_1.png"), b"x").unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let summary = h.monitor.run(&cancel).await;

    assert_eq!(summary.cycles, 0);
    assert_eq!(summary.cleaned, 1);
    assert!(h.seen.borrow().is_empty());
    assert_eq!(h.monitor.phase(), Phase::Stopped);
}

#[tokio::test]
async fn test_retain_mode_skips_shutdown_sweep() {
    let mut h = harness_with(vec![], |config| config.monitor.retain_artifacts = true);
    fs::write(h.dir.path().join("temp_region_1.png"), b"x").unwrap();

    let done = h.done.clone();
    let summary = h.monitor.run(&done).await;

    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.cleaned, 0);
    assert!(h.dir.path().join("temp_region_1.png").exists());
}
