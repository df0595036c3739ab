pub mod entry;
pub mod habit;
pub mod stats;

pub use entry::HabitEntry;
pub use habit::{CueType, Frequency, Habit, ParseModelError, TimeOfDay, TrackingType};
pub use stats::{DailyStats, StreakSummary};
