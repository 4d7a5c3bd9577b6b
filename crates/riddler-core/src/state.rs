/// Dedup memory of the monitor loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    pub last_detected_text: Option<String>,
    pub last_printed_answer: Option<String>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `text` and returns true when it is non-empty and differs from
    /// the previous detection. Blank text leaves the state untouched.
    pub fn accept_text(&mut self, text: &str) -> bool {
        if text.is_empty() || self.last_detected_text.as_deref() == Some(text) {
            return false;
        }
        self.last_detected_text = Some(text.to_string());
        true
    }

    /// True when `answer` is the one printed last
    pub fn is_repeat_answer(&self, answer: &str) -> bool {
        self.last_printed_answer.as_deref() == Some(answer)
    }

    /// Call once `answer` has actually reached the output
    pub fn mark_printed(&mut self, answer: &str) {
        self.last_printed_answer = Some(answer.to_string());
    }
}
