//! Challenge content: what each level asks for and how a finished attempt is
//! judged. Progression only ever sees the resulting [`Verdict`].

use crate::metrics::Metrics;

/// Every fifth level is a boss round.
pub const BOSS_EVERY: u32 = 5;

const BASE_WORDS: u32 = 10;
const MAX_WORDS: u32 = 40;
const BASE_WPM: f64 = 20.0;
const MAX_WPM: f64 = 90.0;
const BASE_ACCURACY: f64 = 85.0;
const MAX_ACCURACY: f64 = 97.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Tier {
    Novice,
    Apprentice,
    Adept,
    Expert,
    Master,
}

impl Tier {
    /// Tiers span five levels each; everything past the fourth band is Master.
    pub fn for_level(level: u32) -> Self {
        match level.saturating_sub(1) / BOSS_EVERY {
            0 => Tier::Novice,
            1 => Tier::Apprentice,
            2 => Tier::Adept,
            3 => Tier::Expert,
            _ => Tier::Master,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shortfall {
    Speed { required: f64, achieved: f64 },
    Accuracy { required: f64, achieved: f64 },
    UncorrectedErrors(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail(Vec<Shortfall>),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub number: u32,
    pub word_count: usize,
    /// minimum net WPM
    pub min_wpm: f64,
    pub min_accuracy: f64,
    pub boss: bool,
}

impl Level {
    /// Level numbers start at 1; 0 is treated as 1.
    pub fn new(number: u32) -> Self {
        let number = number.max(1);
        let step = number - 1;
        let boss = number % BOSS_EVERY == 0;

        let mut word_count = (BASE_WORDS + 2 * step.min(MAX_WORDS)).min(MAX_WORDS);
        let mut min_accuracy = (BASE_ACCURACY + step as f64).min(MAX_ACCURACY);
        if boss {
            word_count += word_count / 2;
            min_accuracy = (min_accuracy + 2.0).min(99.0);
        }

        Self {
            number,
            word_count: word_count as usize,
            min_wpm: (BASE_WPM + 3.0 * step as f64).min(MAX_WPM),
            min_accuracy,
            boss,
        }
    }

    pub fn tier(&self) -> Tier {
        Tier::for_level(self.number)
    }

    /// Judge a finished attempt. Boss rounds also refuse uncorrected errors.
    pub fn judge(&self, metrics: &Metrics) -> Verdict {
        let mut shortfalls = Vec::new();

        if metrics.net_wpm < self.min_wpm {
            shortfalls.push(Shortfall::Speed {
                required: self.min_wpm,
                achieved: metrics.net_wpm,
            });
        }
        if metrics.accuracy < self.min_accuracy {
            shortfalls.push(Shortfall::Accuracy {
                required: self.min_accuracy,
                achieved: metrics.accuracy,
            });
        }
        if self.boss && metrics.uncorrected_errors > 0 {
            shortfalls.push(Shortfall::UncorrectedErrors(metrics.uncorrected_errors));
        }

        if shortfalls.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail(shortfalls)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn metrics(net_wpm: f64, accuracy: f64, uncorrected_errors: usize) -> Metrics {
        Metrics {
            net_wpm,
            accuracy,
            uncorrected_errors,
            ..Metrics::default()
        }
    }

    #[test]
    fn first_level() {
        let level = Level::new(1);
        assert_eq!(level.word_count, 10);
        assert_eq!(level.min_wpm, 20.0);
        assert_eq!(level.min_accuracy, 85.0);
        assert!(!level.boss);
        assert_eq!(level.tier(), Tier::Novice);
        assert_eq!(Level::new(0), level);
    }

    #[test]
    fn boss_rounds_are_harder() {
        let regular = Level::new(4);
        let boss = Level::new(5);
        assert!(boss.boss);
        assert!(boss.word_count > regular.word_count);
        assert!(boss.min_accuracy > regular.min_accuracy);
        assert_eq!(Level::new(6).tier(), Tier::Apprentice);
    }

    #[test]
    fn requirements_are_capped() {
        let level = Level::new(200);
        assert_eq!(level.min_wpm, MAX_WPM);
        assert_eq!(level.min_accuracy, MAX_ACCURACY);
        assert_eq!(level.word_count, MAX_WORDS as usize);
        assert_eq!(level.tier(), Tier::Master);
    }

    #[test]
    fn huge_level_numbers_stay_capped() {
        for n in [3_000_000_000, u32::MAX - 1, u32::MAX] {
            let level = Level::new(n);
            assert_eq!(level.number, n);
            assert_eq!(level.min_wpm, MAX_WPM);
            assert!(level.min_accuracy >= MAX_ACCURACY);
            assert!(level.word_count >= MAX_WORDS as usize);
            assert_eq!(level.tier(), Tier::Master);
        }
        assert!(Level::new(3_000_000_000).boss);
    }

    #[test]
    fn judge_pass() {
        assert_eq!(Level::new(1).judge(&metrics(25.0, 90.0, 1)), Verdict::Pass);
    }

    #[test]
    fn judge_reports_every_shortfall() {
        let verdict = Level::new(1).judge(&metrics(10.0, 50.0, 0));
        assert_matches!(verdict, Verdict::Fail(ref s) if s.len() == 2);
        assert!(!verdict.is_pass());
    }

    #[test]
    fn boss_rejects_uncorrected_errors() {
        let verdict = Level::new(5).judge(&metrics(200.0, 99.5, 1));
        assert_matches!(
            verdict.clone(),
            Verdict::Fail(s) if s == vec![Shortfall::UncorrectedErrors(1)]
        );
    }

    #[test]
    fn tier_names() {
        assert_eq!(Tier::Adept.to_string(), "Adept");
        assert_eq!(Tier::for_level(15), Tier::Adept);
        assert_eq!(Tier::for_level(16), Tier::Expert);
    }
}
