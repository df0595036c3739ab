pub mod achievements;
pub mod stacking;
pub mod streaks;

pub use achievements::{calculate_achievements, EarnedAchievement, UserStats};
pub use stacking::organize_habits;
pub use streaks::compute_streak_summary;

use chrono::{Local, NaiveDate, Timelike};

/// The caller-side notion of "today" the streak math expects.
///
/// A check-in at 1am usually belongs to the evening before; `rollover_hour`
/// (from config) shifts the day boundary accordingly. 0 means plain local
/// midnight.
pub fn local_today(rollover_hour: u8) -> NaiveDate {
    let now = Local::now();
    let today = now.date_naive();
    if now.hour() < rollover_hour as u32 {
        today.pred_opt().unwrap_or(today)
    } else {
        today
    }
}
