use crate::evaluator::{Outcome, TypingAttempt};
use crate::history::SessionRecord;
use crate::metrics::Metrics;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Quote,
    Word,
    Timed,
    Challenge,
}

/// One typing session: a target text, the attempt against it, and the
/// caller's clock readings. The clock starts on the first keystroke.
#[derive(Debug, Clone)]
pub struct Session {
    pub mode: Mode,
    attempt: TypingAttempt,
    started_at: Option<Instant>,
    time_limit: Option<Duration>,
    tier: Option<String>,
    quote_author: Option<String>,
}

impl Session {
    pub fn new(mode: Mode, text: impl Into<String>) -> Self {
        Self {
            mode,
            attempt: TypingAttempt::new(text),
            started_at: None,
            time_limit: None,
            tier: None,
            quote_author: None,
        }
    }

    /// Finish the session when `limit` has elapsed, even mid-text.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub fn with_quote_author(mut self, author: impl Into<String>) -> Self {
        self.quote_author = Some(author.into());
        self
    }

    pub fn attempt(&self) -> &TypingAttempt {
        &self.attempt
    }

    pub fn text(&self) -> &str {
        self.attempt.text()
    }

    pub fn quote_author(&self) -> Option<&str> {
        self.quote_author.as_deref()
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since the first keystroke, capped at the time limit.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let elapsed = self
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        match self.time_limit {
            Some(limit) => elapsed.min(limit),
            None => elapsed,
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.time_limit
            .map(|limit| limit.saturating_sub(self.elapsed(now)))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        if self.attempt.is_complete() {
            return true;
        }
        matches!(self.remaining(now), Some(left) if self.has_started() && left.is_zero())
    }

    pub fn type_char(&mut self, c: char, now: Instant) -> Option<Outcome> {
        if self.is_finished(now) {
            return None;
        }
        let start = *self.started_at.get_or_insert(now);
        self.attempt
            .type_char(c, now.saturating_duration_since(start))
    }

    pub fn backspace(&mut self, now: Instant) -> bool {
        if self.is_finished(now) {
            return false;
        }
        self.attempt.backspace()
    }

    /// Metrics as of `now`; read-only so the display can poll it every tick.
    pub fn live_metrics(&self, now: Instant) -> Metrics {
        Metrics::calculate(&self.attempt, self.elapsed(now))
    }

    /// Build the immutable record for a completed session.
    pub fn to_record(&self, now: Instant, completed_at: DateTime<Local>) -> SessionRecord {
        let elapsed = self.elapsed(now);
        SessionRecord {
            timestamp: completed_at,
            mode: self.mode,
            text_length: self.attempt.len(),
            duration_ms: elapsed.as_millis() as u64,
            metrics: Metrics::calculate(&self.attempt, elapsed),
            tier: self.tier.clone(),
            quote_author: self.quote_author.clone(),
        }
    }
}
