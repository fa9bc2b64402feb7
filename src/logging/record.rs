use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::filter::{FilterOutcome, RenderMode};

/// A record of one filter call for logging purposes.
#[derive(Debug, Clone)]
pub struct FilterLogRecord {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub course_identifier: Option<String>,
    pub mode: Option<RenderMode>,
    pub textual: bool,
    pub input_length: usize,
    pub output_length: usize,
    pub matched: usize,
    pub rewritten: usize,
    pub failed: usize,
    pub failure_codes: Vec<&'static str>,
    pub elapsed_ms: i64,
}

impl FilterLogRecord {
    pub fn new(course_identifier: Option<&str>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            course_identifier: course_identifier.map(String::from),
            mode: None,
            textual: false,
            input_length: 0,
            output_length: 0,
            matched: 0,
            rewritten: 0,
            failed: 0,
            failure_codes: Vec::new(),
            elapsed_ms: 0,
        }
    }

    pub fn with_input(mut self, textual: bool, length: usize) -> Self {
        self.textual = textual;
        self.input_length = length;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_outcome(mut self, outcome: &FilterOutcome) -> Self {
        self.mode = Some(outcome.mode);
        self.output_length = outcome.text.len();
        self.matched = outcome.matched();
        self.rewritten = outcome.rewritten;
        self.failed = outcome.failures.len();
        self.failure_codes = outcome.failures.iter().map(|f| f.error.code()).collect();
        self
    }

    pub fn with_elapsed(mut self, elapsed_ms: i64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Emit through `tracing`; failures raise the level to `warn`.
    pub fn emit(&self) {
        let mode = self.mode.map(|m| format!("{:?}", m)).unwrap_or_default();
        let course = self.course_identifier.as_deref().unwrap_or("");

        if self.failed > 0 {
            tracing::warn!(
                request_id = %self.request_id,
                course,
                mode = mode.as_str(),
                matched = self.matched,
                rewritten = self.rewritten,
                failed = self.failed,
                failure_codes = ?self.failure_codes,
                elapsed_ms = self.elapsed_ms,
                "Filter call left links unmodified"
            );
        } else {
            tracing::info!(
                request_id = %self.request_id,
                course,
                mode = mode.as_str(),
                textual = self.textual,
                input_length = self.input_length,
                output_length = self.output_length,
                rewritten = self.rewritten,
                elapsed_ms = self.elapsed_ms,
                "Filter call completed"
            );
        }
    }
}
