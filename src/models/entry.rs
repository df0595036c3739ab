use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One check-in for one habit on one calendar date.
///
/// `entry_date` is parsed into a `NaiveDate` when the row is read, so
/// everything downstream (streak math included) never sees a malformed date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitEntry {
    pub id: Option<i64>,
    pub habit_id: i64,
    pub entry_date: NaiveDate,
    pub completed: bool,
    pub value: Option<f64>,
    pub note: Option<String>,
    /// Local wall-clock timestamp of when the check-in was recorded.
    pub created_at: Option<String>,
}

impl HabitEntry {
    /// A bare completed/incomplete record, mostly for tests and backfills.
    pub fn on(habit_id: i64, entry_date: NaiveDate, completed: bool) -> Self {
        Self {
            id: None,
            habit_id,
            entry_date,
            completed,
            value: None,
            note: None,
            created_at: None,
        }
    }
}
