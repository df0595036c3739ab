use serde::{Deserialize, Serialize};

/// Streak and completion-rate summary for one habit's check-in history.
///
/// Rates are integer percentages. The 7/30-day rates divide by the fixed
/// window size, so days without a record count as incomplete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub best_streak: u32,
    pub completion_rate_7_days: u32,
    pub completion_rate_30_days: u32,
    pub completion_rate_all_time: u32,
    pub total_completed: u32,
    pub total_days: u32,
}

/// Completed check-ins vs habits due for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: String,
    pub done: u32,
    pub total: u32,
}

impl DailyStats {
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.done >= self.total
    }
}
