use crate::history::SessionRecord;
use crate::streak::{calculate_streaks_on, Streaks};
use crate::util::{format_duration, mean, std_dev};
use chrono::{DateTime, Local, NaiveDate};
use std::fmt;
use std::time::Duration;

/// Aggregate view over the session history.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub sessions: usize,
    pub practice_time: Duration,
    pub best_wpm: f64,
    pub average_wpm: f64,
    pub wpm_std_dev: f64,
    pub average_accuracy: f64,
    pub streaks: Streaks,
    pub latest: Option<DateTime<Local>>,
}

/// Sessions with no duration or no text carry no meaningful metrics.
pub fn is_valid(record: &SessionRecord) -> bool {
    record.duration_ms > 0 && record.text_length > 0
}

impl Summary {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        Self::from_records_on(records, Local::now().date_naive())
    }

    pub fn from_records_on(records: &[SessionRecord], today: NaiveDate) -> Self {
        let valid: Vec<SessionRecord> = records.iter().filter(|r| is_valid(r)).cloned().collect();
        let wpms: Vec<f64> = valid.iter().map(|r| r.metrics.net_wpm).collect();
        let accuracies: Vec<f64> = valid.iter().map(|r| r.metrics.accuracy).collect();

        Self {
            sessions: valid.len(),
            practice_time: Duration::from_millis(valid.iter().map(|r| r.duration_ms).sum()),
            best_wpm: wpms.iter().copied().fold(0.0, f64::max),
            average_wpm: mean(&wpms).unwrap_or(0.0),
            wpm_std_dev: std_dev(&wpms).unwrap_or(0.0),
            average_accuracy: mean(&accuracies).unwrap_or(0.0),
            streaks: calculate_streaks_on(&valid, today),
            latest: valid.iter().map(|r| r.timestamp).max(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sessions == 0 {
            return writeln!(f, "No sessions recorded yet.");
        }
        writeln!(f, "Sessions:        {}", self.sessions)?;
        writeln!(f, "Practice time:   {}", format_duration(self.practice_time))?;
        writeln!(f, "Best net wpm:    {:.1}", self.best_wpm)?;
        writeln!(
            f,
            "Average net wpm: {:.1} (sd {:.2})",
            self.average_wpm, self.wpm_std_dev
        )?;
        writeln!(f, "Average acc:     {:.1}%", self.average_accuracy)?;
        writeln!(
            f,
            "Streak:          {} day(s), longest {}",
            self.streaks.current, self.streaks.longest
        )?;
        if let Some(latest) = self.latest {
            writeln!(f, "Last session:    {}", latest.format("%Y-%m-%d %H:%M"))?;
        }
        Ok(())
    }
}
