use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use crate::models::{HabitEntry, StreakSummary};

/// How far back the current-streak walk is allowed to go.
const MAX_WALK_DAYS: i64 = 365;

/// Compute streak and completion-rate stats for one habit's check-ins.
///
/// Total over any input: order does not matter, duplicate dates do not
/// break it, and an empty slice yields the all-zero summary. `today` is the
/// caller's local calendar date (see `local_today`), so the function itself
/// does no clock or timezone work.
///
/// Duplicate-date policy: streak membership is a date *set*, so a date with
/// any completed record counts once no matter how many incomplete duplicates
/// sit next to it. Each duplicate record still counts individually toward
/// totals and rate numerators.
pub fn compute_streak_summary(entries: &[HabitEntry], today: NaiveDate) -> StreakSummary {
    if entries.is_empty() {
        return StreakSummary::default();
    }

    let completed: Vec<&HabitEntry> = entries.iter().filter(|e| e.completed).collect();
    let completed_dates: HashSet<NaiveDate> = completed.iter().map(|e| e.entry_date).collect();

    // Current streak: walk backward from today. A missing day ends the walk,
    // except day 0 itself — a habit not yet checked today keeps its streak.
    let mut current_streak = 0u32;
    for offset in 0..=MAX_WALK_DAYS {
        let day = today - Duration::days(offset);
        if completed_dates.contains(&day) {
            current_streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    // Best streak: scan completed records ascending. Only a gap of exactly
    // one day extends the run; anything else (including the zero-day gap a
    // duplicate date produces) closes it.
    let mut ascending: Vec<NaiveDate> = completed.iter().map(|e| e.entry_date).collect();
    ascending.sort_unstable();

    let mut best_streak = 0u32;
    let mut run = 0u32;
    let mut last: Option<NaiveDate> = None;
    for date in ascending {
        match last {
            None => run = 1,
            Some(prev) => {
                if (date - prev).num_days() == 1 {
                    run += 1;
                } else {
                    best_streak = best_streak.max(run);
                    run = 1;
                }
            }
        }
        last = Some(date);
    }
    // An open run was never closed by a gap, and a live current streak may
    // span dates the history alone can't see (the grace day).
    best_streak = best_streak.max(run).max(current_streak);

    // Rate windows are fixed calendar spans ending today, so a habit with
    // two days of history still divides by 7 and 30.
    let week_ago = today - Duration::days(6);
    let month_ago = today - Duration::days(29);
    let completed_7 = completed
        .iter()
        .filter(|e| e.entry_date >= week_ago && e.entry_date <= today)
        .count();
    let completed_30 = completed
        .iter()
        .filter(|e| e.entry_date >= month_ago && e.entry_date <= today)
        .count();

    StreakSummary {
        current_streak,
        best_streak,
        completion_rate_7_days: percent(completed_7, 7),
        completion_rate_30_days: percent(completed_30, 30),
        completion_rate_all_time: percent(completed.len(), entries.len()),
        total_completed: completed.len() as u32,
        total_days: entries.len() as u32,
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        day("2025-06-15")
    }

    fn done(offset: i64) -> HabitEntry {
        HabitEntry::on(1, today() - Duration::days(offset), true)
    }

    fn missed(offset: i64) -> HabitEntry {
        HabitEntry::on(1, today() - Duration::days(offset), false)
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(
            compute_streak_summary(&[], today()),
            StreakSummary::default()
        );
    }

    #[test]
    fn single_completed_today() {
        let summary = compute_streak_summary(&[done(0)], today());
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.best_streak, 1);
        assert_eq!(summary.completion_rate_all_time, 100);
        assert_eq!(summary.total_completed, 1);
        assert_eq!(summary.total_days, 1);
    }

    #[test]
    fn missing_today_keeps_the_streak() {
        // Done the last 5 days except today.
        let entries: Vec<_> = (1..=5).map(done).collect();
        let summary = compute_streak_summary(&entries, today());
        assert_eq!(summary.current_streak, 5);
        assert_eq!(summary.best_streak, 5);
    }

    #[test]
    fn gap_after_yesterday_breaks_the_walk() {
        let entries = vec![done(0), done(1), done(10)];
        let summary = compute_streak_summary(&entries, today());
        assert_eq!(summary.current_streak, 2);
        // The 10-days-ago record is isolated, so it never beats the run.
        assert_eq!(summary.best_streak, 2);
    }

    #[test]
    fn best_streak_survives_a_dead_habit() {
        // 6-day run ending 15 days ago, nothing since.
        let entries: Vec<_> = (15..=20).map(done).collect();
        let summary = compute_streak_summary(&entries, today());
        assert_eq!(summary.current_streak, 0);
        assert_eq!(summary.best_streak, 6);
    }

    #[test]
    fn seven_day_rate_divides_by_the_window() {
        // 3 completed records inside the last 7 days, nothing else.
        let entries = vec![done(1), done(3), done(5)];
        let summary = compute_streak_summary(&entries, today());
        assert_eq!(summary.completion_rate_7_days, 43); // round(3/7 * 100)
        assert_eq!(summary.completion_rate_30_days, 10);
    }

    #[test]
    fn all_time_rate_divides_by_record_count() {
        let mut entries: Vec<_> = (0..4).map(|i| done(i * 9 + 40)).collect();
        entries.extend((0..6).map(|i| missed(i * 7 + 90)));
        let summary = compute_streak_summary(&entries, today());
        assert_eq!(summary.total_days, 10);
        assert_eq!(summary.total_completed, 4);
        assert_eq!(summary.completion_rate_all_time, 40);
    }

    #[test]
    fn order_does_not_matter() {
        let entries = vec![done(3), done(0), missed(7), done(1), done(2)];
        let mut reversed = entries.clone();
        reversed.reverse();
        assert_eq!(
            compute_streak_summary(&entries, today()),
            compute_streak_summary(&reversed, today())
        );
    }

    #[test]
    fn duplicate_dates_count_once_for_streaks() {
        // Same date twice: one completed, one not. The date stays
        // streak-eligible, both records count toward totals.
        let entries = vec![done(0), missed(0), done(1)];
        let summary = compute_streak_summary(&entries, today());
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.total_days, 3);
        assert_eq!(summary.total_completed, 2);
        // round(2/3 * 100)
        assert_eq!(summary.completion_rate_all_time, 67);
    }

    #[test]
    fn duplicate_completed_dates_break_the_best_run() {
        // Two completed records on the same date produce a zero-day gap in
        // the ascending scan, which resets the run.
        let entries = vec![done(2), done(2), done(3), done(4)];
        let summary = compute_streak_summary(&entries, today());
        assert_eq!(summary.best_streak, 3);
    }

    #[test]
    fn walk_is_capped() {
        let entries: Vec<_> = (0..=400).map(done).collect();
        let summary = compute_streak_summary(&entries, today());
        assert_eq!(summary.current_streak, 366);
        // The ascending scan still sees the full run.
        assert_eq!(summary.best_streak, 401);
    }
}
