use crate::history::SessionRecord;
use chrono::{Local, NaiveDate};
use itertools::Itertools;

/// Daily practice streaks, in whole days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Distinct local calendar dates with at least one session, ascending.
pub fn practice_dates(records: &[SessionRecord]) -> Vec<NaiveDate> {
    records
        .iter()
        .map(|r| r.timestamp.date_naive())
        .sorted()
        .dedup()
        .collect()
}

/// Streaks as of the local current date.
pub fn calculate_streaks(records: &[SessionRecord]) -> Streaks {
    calculate_streaks_on(records, Local::now().date_naive())
}

pub fn calculate_streaks_on(records: &[SessionRecord], today: NaiveDate) -> Streaks {
    let dates = practice_dates(records);
    Streaks {
        current: current_streak(&dates, today),
        longest: longest_streak(&dates),
    }
}

fn is_next_day(prev: NaiveDate, next: NaiveDate) -> bool {
    prev.succ_opt() == Some(next)
}

/// Consecutive days ending at the latest practice date, provided that date is
/// today or yesterday. `dates` must be sorted ascending without duplicates.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&latest) = dates.last() else {
        return 0;
    };

    let recent = latest == today || Some(latest) == today.pred_opt();
    if !recent {
        return 0;
    }

    let mut streak = 1;
    for (prev, next) in dates.iter().rev().skip(1).zip(dates.iter().rev()) {
        if !is_next_day(*prev, *next) {
            break;
        }
        streak += 1;
    }
    streak
}

/// Longest run of consecutive days. `dates` must be sorted ascending without
/// duplicates.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut run = 1;
    for (prev, next) in dates.iter().tuple_windows() {
        if is_next_day(*prev, *next) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use crate::session::Mode;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session_on(date: NaiveDate, hour: u32) -> SessionRecord {
        SessionRecord {
            timestamp: Local
                .from_local_datetime(&date.and_hms_opt(hour, 30, 0).unwrap())
                .earliest()
                .unwrap(),
            mode: Mode::Quote,
            text_length: 10,
            duration_ms: 1000,
            metrics: Metrics::default(),
            tier: None,
            quote_author: None,
        }
    }

    // 2024-01-01 was a Monday
    const MON: (i32, u32, u32) = (2024, 1, 1);
    const TUE: (i32, u32, u32) = (2024, 1, 2);
    const WED: (i32, u32, u32) = (2024, 1, 3);

    fn d((y, m, dd): (i32, u32, u32)) -> NaiveDate {
        day(y, m, dd)
    }

    #[test]
    fn no_records() {
        assert_eq!(calculate_streaks_on(&[], d(WED)), Streaks::default());
    }

    #[test]
    fn three_days_ending_today() {
        let records = vec![
            session_on(d(MON), 9),
            session_on(d(TUE), 21),
            session_on(d(WED), 7),
        ];
        let streaks = calculate_streaks_on(&records, d(WED));
        assert_eq!(streaks, Streaks { current: 3, longest: 3 });
    }

    #[test]
    fn gap_breaks_the_streak() {
        let records = vec![session_on(d(MON), 9), session_on(d(WED), 9)];
        let streaks = calculate_streaks_on(&records, d(WED));
        assert_eq!(streaks, Streaks { current: 1, longest: 1 });
    }

    #[test]
    fn yesterday_keeps_the_streak_alive() {
        let records = vec![session_on(d(MON), 9), session_on(d(TUE), 9)];
        let streaks = calculate_streaks_on(&records, d(WED));
        assert_eq!(streaks.current, 2);
    }

    #[test]
    fn two_days_idle_resets_current() {
        let records = vec![session_on(d(MON), 9), session_on(d(TUE), 9)];
        let streaks = calculate_streaks_on(&records, day(2024, 1, 4));
        assert_eq!(streaks, Streaks { current: 0, longest: 2 });
    }

    #[test]
    fn several_sessions_on_one_day_count_once() {
        let records = vec![
            session_on(d(TUE), 8),
            session_on(d(TUE), 12),
            session_on(d(TUE), 23),
        ];
        assert_eq!(practice_dates(&records), vec![d(TUE)]);
        assert_eq!(
            calculate_streaks_on(&records, d(TUE)),
            Streaks { current: 1, longest: 1 }
        );
    }

    #[test]
    fn longest_includes_final_run_and_month_boundaries() {
        let dates = vec![
            day(2024, 1, 10),
            day(2024, 1, 11),
            day(2024, 1, 30),
            day(2024, 1, 31),
            day(2024, 2, 1),
        ];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn longest_picks_earlier_run() {
        let dates = vec![
            day(2023, 12, 30),
            day(2023, 12, 31),
            day(2024, 1, 1),
            day(2024, 1, 2),
            day(2024, 1, 5),
        ];
        assert_eq!(longest_streak(&dates), 4);
        assert_eq!(current_streak(&dates, day(2024, 1, 5)), 1);
    }

    #[test]
    fn unordered_records_are_handled() {
        let records = vec![
            session_on(d(WED), 9),
            session_on(d(MON), 9),
            session_on(d(TUE), 9),
        ];
        assert_eq!(practice_dates(&records), vec![d(MON), d(TUE), d(WED)]);
        assert_eq!(calculate_streaks_on(&records, d(WED)).current, 3);
    }
}
