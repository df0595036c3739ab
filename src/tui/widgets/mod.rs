pub mod habits;
pub mod header;
pub mod statusbar;
pub mod streak;
pub mod week;

/// What the dashboard shows for one habit today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    Done,
    Skipped,
    Pending,
}

/// Pre-baked view model for one line of the habit list.
#[derive(Debug, Clone)]
pub struct HabitRow {
    pub habit_id: i64,
    pub label: String,
    pub depth: usize,
    pub state: RowState,
    pub value_label: Option<String>,
    pub current_streak: u32,
    pub wants_value: bool,
    pub target_label: Option<String>,
}
