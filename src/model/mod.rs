// src/model/mod.rs

/// What the user asked for, plus every piece of feedback gathered on retries.
///
/// Feedback is only ever appended so the text sent to the model keeps a record
/// of what was already tried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    description: String,
}

impl Task {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.trim().to_string(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn append_feedback(&mut self, feedback: &str) {
        self.description.push_str(". Previous error: ");
        self.description.push_str(feedback.trim());
    }
}

/// Execution attempts used so far against the session budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
    max_attempts: u32,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Counts one executed plan. Never moves past the maximum.
    pub fn record_attempt(&mut self) {
        if self.attempts < self.max_attempts {
            self.attempts += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}
