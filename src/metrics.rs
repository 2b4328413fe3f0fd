use crate::evaluator::{Tally, TypingAttempt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Characters per standardized word.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Elapsed time is never taken to be shorter than this.
pub const MIN_ELAPSED: Duration = Duration::from_millis(1);

/// Standardized performance metrics for one attempt.
///
/// Field names double as the persisted history format, so every field
/// defaults when missing from an older record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    /// raw words per minute, errors included
    pub wpm: f64,
    pub net_wpm: f64,
    pub adjusted_wpm: f64,
    pub cpm: f64,
    /// percentage of first-pass keystrokes that were correct
    pub accuracy: f64,
    pub mistakes: usize,
    pub corrected_errors: usize,
    pub uncorrected_errors: usize,
    pub backspace_count: usize,
    pub avg_word_length: f64,
}

impl Metrics {
    /// Compute metrics for an attempt given the elapsed time on the caller's
    /// clock. Never mutates the attempt, so it can be polled for live display.
    pub fn calculate(attempt: &TypingAttempt, elapsed: Duration) -> Self {
        Self::from_tally(&attempt.tally(), attempt.text(), elapsed)
    }

    pub fn from_tally(tally: &Tally, text: &str, elapsed: Duration) -> Self {
        let minutes = elapsed_minutes(elapsed);
        let typed = tally.typed as f64;
        let words_typed = typed / CHARS_PER_WORD;

        let wpm = words_typed / minutes;
        let net_wpm = ((words_typed - tally.uncorrected_errors as f64) / minutes).max(0.0);
        let adjusted_wpm = net_wpm * correction_penalty(tally);

        Self {
            wpm,
            net_wpm,
            adjusted_wpm,
            cpm: typed / minutes,
            accuracy: accuracy(tally),
            mistakes: tally.mistakes,
            corrected_errors: tally.corrected_errors,
            uncorrected_errors: tally.uncorrected_errors,
            backspace_count: tally.backspaces,
            avg_word_length: avg_word_length(text),
        }
    }
}

fn elapsed_minutes(elapsed: Duration) -> f64 {
    elapsed.max(MIN_ELAPSED).as_secs_f64() / 60.0
}

/// 1 - corrected / total keystrokes; 1 when nothing was typed.
fn correction_penalty(tally: &Tally) -> f64 {
    if tally.typed == 0 {
        return 1.0;
    }
    (1.0 - tally.corrected_errors as f64 / tally.typed as f64).clamp(0.0, 1.0)
}

/// First-pass accuracy as a percentage; 100 when nothing has been typed.
pub fn accuracy(tally: &Tally) -> f64 {
    let first_pass = tally.first_pass();
    if first_pass == 0 {
        return 100.0;
    }
    (tally.correct_first_pass as f64 / first_pass as f64 * 100.0).clamp(0.0, 100.0)
}

/// Target characters per whitespace-delimited word; 0 for blank text.
pub fn avg_word_length(text: &str) -> f64 {
    match text.split_whitespace().count() {
        0 => 0.0,
        words => text.chars().count() as f64 / words as f64,
    }
}
