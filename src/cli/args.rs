use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "groove", version, about = "A cozy terminal companion for building daily habits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new habit
    Add(AddArgs),
    /// List habits in stacked order with today's status
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },
    /// Check in a habit for today (or --date)
    Check {
        /// Habit name
        habit: String,
        /// Recorded value (quantity/duration/scale habits)
        #[arg(long)]
        value: Option<f64>,
        /// Attach a note
        #[arg(long)]
        note: Option<String>,
        /// Backfill a specific date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Record the day as not completed
        #[arg(long, conflicts_with = "undo")]
        skip: bool,
        /// Remove the day's record entirely
        #[arg(long)]
        undo: bool,
    },
    /// Show streaks and completion rates
    Stats {
        /// Habit name (omit for every habit)
        habit: Option<String>,
        /// Show an ASCII heatmap for the last 7 days
        #[arg(long)]
        week: bool,
    },
    /// Show the badge catalog and earned progress
    Achievements,
    /// Built-in quick-start templates
    Templates,
    /// Archive a habit (keeps its history)
    Archive {
        /// Habit name
        habit: String,
    },
    /// Export a weekly summary to stdout
    Export {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Habit name (omit when using --template)
    pub name: Option<String>,
    /// Start from a built-in template (see `groove templates`)
    #[arg(long)]
    pub template: Option<String>,
    /// Short description
    #[arg(long)]
    pub desc: Option<String>,
    /// Tracking type: boolean, quantity, duration, scale
    #[arg(long, default_value = "boolean")]
    pub tracking: String,
    /// Target value (for quantity/duration/scale habits)
    #[arg(long)]
    pub target: Option<f64>,
    /// Target unit, e.g. "glasses" or "min"
    #[arg(long)]
    pub unit: Option<String>,
    /// Frequency: daily, weekly, specific_days
    #[arg(long, default_value = "daily")]
    pub freq: String,
    /// Weekdays for specific_days, e.g. "1,3,5" (0 = Sunday)
    #[arg(long)]
    pub days: Option<String>,
    /// Time of day: anytime, morning, afternoon, evening
    #[arg(long, default_value = "anytime")]
    pub time: String,
    /// Stack this habit after an existing one
    #[arg(long, conflicts_with_all = ["before", "with"])]
    pub after: Option<String>,
    /// Stack this habit before an existing one
    #[arg(long, conflicts_with = "with")]
    pub before: Option<String>,
    /// Do this habit together with an existing one
    #[arg(long)]
    pub with: Option<String>,
    /// Display icon (emoji)
    #[arg(long)]
    pub icon: Option<String>,
    /// Display color (hex)
    #[arg(long)]
    pub color: Option<String>,
}
