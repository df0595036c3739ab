use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::str::FromStr;

use crate::cli::args::AddArgs;
use crate::config::AppConfig;
use crate::db::repository::{EntryRepo, HabitRepo, NewHabit, StatsRepo};
use crate::models::{CueType, Frequency, Habit, HabitEntry, TimeOfDay, TrackingType};
use crate::stats::achievements::{Category, Tier};
use crate::stats::{calculate_achievements, local_today, organize_habits};
use crate::utils::format::{format_value, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! print_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        print!("\x1b[0m");
    }};
}

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const CORAL: &str = "\x1b[38;2;224;122;95m";

// ─── Quick-start templates ───────────────────────────────────────────────────

pub struct HabitTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

pub const BUILTIN_TEMPLATES: &[HabitTemplate] = &[
    HabitTemplate { id: "water", name: "Drink Water", icon: "💧", color: "#3b82f6", description: "Stay hydrated throughout the day" },
    HabitTemplate { id: "exercise", name: "Exercise", icon: "🏃", color: "#22c55e", description: "30 minutes of movement" },
    HabitTemplate { id: "read", name: "Read", icon: "📚", color: "#8b5cf6", description: "Read for 20 minutes" },
    HabitTemplate { id: "meditate", name: "Meditate", icon: "🧘", color: "#f59e0b", description: "10 minutes of mindfulness" },
    HabitTemplate { id: "sleep", name: "Sleep 8 Hours", icon: "💤", color: "#6366f1", description: "Get quality rest" },
    HabitTemplate { id: "journal", name: "Journal", icon: "✍", color: "#ec4899", description: "Write your thoughts" },
    HabitTemplate { id: "stretch", name: "Stretch", icon: "🙆", color: "#14b8a6", description: "Morning stretching routine" },
    HabitTemplate { id: "nosugar", name: "No Sugar", icon: "🍬", color: "#ef4444", description: "Avoid added sugars" },
];

// ─── Add ─────────────────────────────────────────────────────────────────────

pub fn handle_add(conn: &Connection, config: &AppConfig, args: &AddArgs) -> Result<()> {
    let mut new = NewHabit::default();

    if let Some(template_id) = &args.template {
        if let Some(t) = BUILTIN_TEMPLATES.iter().find(|t| t.id == *template_id) {
            new.name = t.name.to_string();
            new.icon = Some(t.icon.to_string());
            new.color = Some(t.color.to_string());
            new.description = Some(t.description.to_string());
        } else if let Some(t) = config
            .templates
            .custom
            .iter()
            .find(|t| t.id == *template_id)
        {
            new.name = t.name.clone();
            new.icon = (!t.icon.is_empty()).then(|| t.icon.clone());
            new.color = (!t.color.is_empty()).then(|| t.color.clone());
            new.description = (!t.description.is_empty()).then(|| t.description.clone());
        } else {
            return Err(anyhow!(
                "Unknown template '{}'. See `groove templates`",
                template_id
            ));
        }
    }

    if let Some(name) = &args.name {
        new.name = name.clone();
    }
    if new.name.is_empty() {
        return Err(anyhow!("Give the habit a name, or use --template"));
    }

    if let Some(desc) = &args.desc {
        new.description = Some(desc.clone());
    }
    if let Some(icon) = &args.icon {
        new.icon = Some(icon.clone());
    }
    if let Some(color) = &args.color {
        new.color = Some(color.clone());
    }

    new.tracking_type = Some(TrackingType::from_str(&args.tracking)?);
    new.time_of_day = Some(TimeOfDay::from_str(&args.time)?);
    new.target_value = args.target;
    new.target_unit = args.unit.clone();

    new.frequency = Some(Frequency::from_str(&args.freq)?);
    if let Some(days) = &args.days {
        new.frequency_days = Some(parse_days(days)?);
        new.frequency = Some(Frequency::SpecificDays);
    }

    // At most one cue flag survives clap's conflict rules.
    let cue = [
        (&args.after, CueType::After),
        (&args.before, CueType::Before),
        (&args.with, CueType::With),
    ]
    .into_iter()
    .find_map(|(name, cue_type)| name.as_ref().map(|n| (n.clone(), cue_type)));

    let mut cue_label = None;
    if let Some((cue_name, cue_type)) = cue {
        let cue_habit = HabitRepo::find_by_name(conn, &cue_name)?
            .ok_or_else(|| anyhow!("Cue habit '{}' not found", cue_name))?;
        cue_label = Some(format!("{} {}", cue_type.as_str(), cue_habit.name));
        new.cue_habit_id = Some(cue_habit.id);
        new.cue_type = Some(cue_type);
    }

    if HabitRepo::find_by_name(conn, &new.name)?.is_some() {
        return Err(anyhow!("A habit named '{}' already exists", new.name));
    }

    HabitRepo::insert(conn, &new)?;
    match cue_label {
        Some(label) => {
            println_colored!(GREEN, "  ✓ Added habit: {} (stacked {})", new.name, label);
        }
        None => {
            println_colored!(GREEN, "  ✓ Added habit: {}", new.name);
        }
    }
    Ok(())
}

/// Parse "1,3,5" into weekday numbers (0 = Sunday).
fn parse_days(s: &str) -> Result<Vec<u8>> {
    let mut days = Vec::new();
    for part in s.split(',') {
        let day: u8 = part
            .trim()
            .parse()
            .map_err(|_| anyhow!("Bad weekday '{}'. Use numbers 0-6", part))?;
        if day > 6 {
            return Err(anyhow!("Weekday {} out of range (0 = Sunday .. 6)", day));
        }
        days.push(day);
    }
    if days.is_empty() {
        return Err(anyhow!("--days needs at least one weekday"));
    }
    Ok(days)
}

// ─── List ────────────────────────────────────────────────────────────────────

pub fn handle_list(conn: &Connection, config: &AppConfig, all: bool) -> Result<()> {
    let habits = if all {
        HabitRepo::get_all(conn)?
    } else {
        HabitRepo::get_active(conn)?
    };

    if habits.is_empty() {
        println!();
        println_colored!(DIM, "  No habits yet. Start with `groove add` or `groove templates`.");
        println!();
        return Ok(());
    }

    let today = local_today(config.profile.day_rollover_hour);
    let today_entries = EntryRepo::get_by_date(conn, today)?;
    let entry_for = |id: i64| today_entries.iter().find(|e| e.habit_id == id);

    println!();
    println_colored!(CORAL, "  Habits — {}", today.format("%A, %b %d"));
    println!();

    for stacked in organize_habits(&habits) {
        let habit = stacked.habit;
        let entry = entry_for(habit.id);
        let (icon, color) = match entry {
            Some(e) if e.completed => ("●", GREEN),
            Some(_) => ("✗", RED),
            None => ("○", DIM),
        };

        let indent = "  ".repeat(stacked.depth);
        let chain = if stacked.depth > 0 { "↳ " } else { "" };
        let mut line = format!(
            "  {}{}{} {} {}",
            indent,
            chain,
            icon,
            habit.display_icon(),
            habit.name
        );
        if let Some(e) = entry {
            if let Some(v) = e.value {
                line.push_str(&format!(
                    " — {}{}",
                    format_value(v),
                    habit.target_unit.as_deref().unwrap_or("")
                ));
            }
        }
        if habit.archived {
            line.push_str("  (archived)");
        }

        print_colored!(color, "{}", line);
        if config.display.show_streaks_in_list && !habit.archived {
            let summary = StatsRepo::summary_for_habit(conn, habit.id, today)?;
            if summary.current_streak > 0 {
                print_colored!(AMBER, "  · {}d", summary.current_streak);
            }
        }
        println!();
    }

    let (done, active) = footer_counts(&habits, &today_entries);
    println!();
    println_colored!(DIM, "  {}/{} done today", done, active);
    println!();
    Ok(())
}

/// Footer tally for `list`: completed vs due, active habits only. Archived
/// rows can show up with `--all` but never shift the denominator or the
/// numerator.
fn footer_counts(habits: &[Habit], entries: &[HabitEntry]) -> (usize, usize) {
    let active: Vec<&Habit> = habits.iter().filter(|h| !h.archived).collect();
    let done = active
        .iter()
        .filter(|h| {
            entries
                .iter()
                .any(|e| e.habit_id == h.id && e.completed)
        })
        .count();
    (done, active.len())
}

// ─── Check ───────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn handle_check(
    conn: &Connection,
    config: &AppConfig,
    habit_name: &str,
    value: Option<f64>,
    note: Option<&str>,
    date: Option<&str>,
    skip: bool,
    undo: bool,
) -> Result<()> {
    let habit = HabitRepo::find_by_name(conn, habit_name)?
        .ok_or_else(|| anyhow!("Habit '{}' not found", habit_name))?;

    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| anyhow!("Bad date '{}'. Use YYYY-MM-DD", s))?,
        None => local_today(config.profile.day_rollover_hour),
    };

    if undo {
        let removed = EntryRepo::clear(conn, habit.id, date)?;
        if removed {
            println_colored!(DIM, "  ○ {} — {} record removed", habit.name, date);
        } else {
            println_colored!(DIM, "  Nothing to undo for {} on {}", habit.name, date);
        }
        return Ok(());
    }

    if skip {
        EntryRepo::upsert(conn, habit.id, date, false, value, note)?;
        println_colored!(RED, "  ✗ {} — skipped", habit.name);
        return Ok(());
    }

    let completed = completion_for(&habit, value)?;
    EntryRepo::upsert(conn, habit.id, date, completed, value, note)?;

    let summary = StatsRepo::summary_for_habit(conn, habit.id, date)?;
    let value_label = value
        .map(|v| {
            format!(
                " {}{}",
                format_value(v),
                habit.target_unit.as_deref().unwrap_or("")
            )
        })
        .unwrap_or_default();

    if completed {
        println_colored!(
            GREEN,
            "  ✓ {} — done{} · {} day streak",
            habit.name,
            value_label,
            summary.current_streak
        );
    } else {
        println_colored!(
            AMBER,
            "  ◑ {} —{} logged, target not met",
            habit.name,
            value_label
        );
    }
    Ok(())
}

/// Whether a check-in counts as completed, given the habit's tracking type.
fn completion_for(habit: &Habit, value: Option<f64>) -> Result<bool> {
    if !habit.tracking_type.wants_value() {
        return Ok(true);
    }
    let value = value.ok_or_else(|| {
        anyhow!(
            "'{}' tracks {} — pass --value",
            habit.name,
            habit.tracking_type.as_str()
        )
    })?;
    Ok(match habit.target_value {
        Some(target) => value >= target,
        None => true,
    })
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(
    conn: &Connection,
    config: &AppConfig,
    habit_name: Option<&str>,
    week: bool,
) -> Result<()> {
    let today = local_today(config.profile.day_rollover_hour);

    println!();
    match habit_name {
        Some(name) => {
            let habit = HabitRepo::find_by_name(conn, name)?
                .ok_or_else(|| anyhow!("Habit '{}' not found", name))?;
            let s = StatsRepo::summary_for_habit(conn, habit.id, today)?;

            println_colored!(CORAL, "  {} {}", habit.display_icon(), habit.name);
            println!();
            println_colored!(
                BOLD,
                "  Streak:      {} days current  |  {} days best",
                s.current_streak,
                s.best_streak
            );
            println!(
                "  Last 7d:     {}  {}%",
                progress_bar(s.completion_rate_7_days, 100, 12),
                s.completion_rate_7_days
            );
            println!(
                "  Last 30d:    {}  {}%",
                progress_bar(s.completion_rate_30_days, 100, 12),
                s.completion_rate_30_days
            );
            println!(
                "  All time:    {}%  ({} of {} check-ins)",
                s.completion_rate_all_time, s.total_completed, s.total_days
            );
        }
        None => {
            let habits = HabitRepo::get_active(conn)?;
            if habits.is_empty() {
                println_colored!(DIM, "  No habits yet.");
                println!();
                return Ok(());
            }
            println_colored!(CORAL, "  Statistics");
            println!();
            for habit in &habits {
                let s = StatsRepo::summary_for_habit(conn, habit.id, today)?;
                println!(
                    "  {:<24} {:>3}d current  {:>3}d best  {:>3}% (7d)",
                    habit.name, s.current_streak, s.best_streak, s.completion_rate_7_days
                );
            }
        }
    }

    if week {
        let habits_due = HabitRepo::get_active(conn)?.len() as u32;
        let week_start = today - chrono::Duration::days(6);
        let daily = StatsRepo::daily_stats_range(conn, week_start, today, habits_due)?;
        println!();
        println_colored!(DIM, "  Last 7 days  (● = all, ◕ = most, ◑ = some, ○ = none)");
        println!();
        print!("  ");
        for stat in &daily {
            let ratio = stat.completion_ratio();
            let icon = if stat.is_perfect() {
                format!("{}●\x1b[0m ", GREEN)
            } else if ratio >= 0.5 {
                format!("{}◕\x1b[0m ", AMBER)
            } else if stat.done > 0 {
                format!("{}◑\x1b[0m ", AMBER)
            } else {
                format!("{}○\x1b[0m ", DIM)
            };
            print!("{}", icon);
        }
        println!();
    }

    println!();
    Ok(())
}

// ─── Achievements ────────────────────────────────────────────────────────────

pub fn handle_achievements(conn: &Connection, config: &AppConfig) -> Result<()> {
    let today = local_today(config.profile.day_rollover_hour);
    let stats = StatsRepo::user_stats(conn, today)?;
    let earned = calculate_achievements(&stats);
    let earned_count = earned.iter().filter(|e| e.earned).count();

    println!();
    println_colored!(CORAL, "  Achievements — {}/{} earned", earned_count, earned.len());
    println!();

    for (category, title) in [
        (Category::Streak, "Streak"),
        (Category::Completion, "Completion"),
        (Category::Consistency, "Consistency"),
        (Category::Special, "Special"),
    ] {
        println_colored!(BOLD, "  {}", title);
        for e in earned.iter().filter(|e| e.achievement.category == category) {
            let a = e.achievement;
            if e.earned {
                println_colored!(
                    tier_color(a.tier),
                    "    {} {:<20} ✓ {}",
                    a.icon,
                    a.name,
                    a.description
                );
            } else {
                println_colored!(
                    DIM,
                    "    {} {:<20} {} {:>3}%",
                    a.icon,
                    a.name,
                    progress_bar(e.progress, 100, 10),
                    e.progress
                );
            }
        }
        println!();
    }
    Ok(())
}

fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::Bronze => "\x1b[38;2;205;127;50m",
        Tier::Silver => "\x1b[38;2;192;192;192m",
        Tier::Gold => "\x1b[38;2;255;215;0m",
        Tier::Platinum => "\x1b[38;2;229;228;226m",
    }
}

// ─── Templates ───────────────────────────────────────────────────────────────

pub fn handle_templates(config: &AppConfig) -> Result<()> {
    println!();
    println_colored!(CORAL, "  Quick-start templates");
    println!();
    for t in BUILTIN_TEMPLATES {
        println!("  {:<10} {} {:<16} {}", t.id, t.icon, t.name, t.description);
    }
    for t in &config.templates.custom {
        println!("  {:<10} {} {:<16} {}", t.id, t.icon, t.name, t.description);
    }
    println!();
    println_colored!(DIM, "  Use: groove add --template <id>");
    println!();
    Ok(())
}

// ─── Archive ─────────────────────────────────────────────────────────────────

pub fn handle_archive(conn: &Connection, habit_name: &str) -> Result<()> {
    let habit = HabitRepo::find_by_name(conn, habit_name)?
        .ok_or_else(|| anyhow!("Habit '{}' not found", habit_name))?;
    HabitRepo::archive(conn, habit.id)?;
    println_colored!(AMBER, "  Archived '{}' — history is kept", habit.name);
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(conn: &Connection, config: &AppConfig, json: bool) -> Result<()> {
    let today = local_today(config.profile.day_rollover_hour);
    let week_start = today - chrono::Duration::days(6);

    let habits = if config.display.show_archived {
        HabitRepo::get_all(conn)?
    } else {
        HabitRepo::get_active(conn)?
    };
    let habits_due = habits.iter().filter(|h| !h.archived).count() as u32;
    let daily = StatsRepo::daily_stats_range(conn, week_start, today, habits_due)?;

    let mut summaries = Vec::new();
    for habit in &habits {
        summaries.push((habit, StatsRepo::summary_for_habit(conn, habit.id, today)?));
    }

    if json {
        let report = serde_json::json!({
            "generated": today.format("%Y-%m-%d").to_string(),
            "week_start": week_start.format("%Y-%m-%d").to_string(),
            "habits": summaries
                .iter()
                .map(|(habit, summary)| {
                    serde_json::json!({
                        "habit": habit,
                        "summary": summary,
                    })
                })
                .collect::<Vec<_>>(),
            "daily": daily,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("# groove — Weekly Summary");
    println!("# {}", today.format("%Y-%m-%d"));
    if !config.profile.display_name.is_empty() {
        println!("# {}", config.profile.display_name);
    }
    println!();
    println!("## Daily completion (last 7 days)");
    for stat in &daily {
        let bar = progress_bar(stat.done, stat.total.max(1), 5);
        println!("  {}  {}/{}  {}", stat.date, stat.done, stat.total, bar);
    }
    println!();
    println!("## Habits");
    for (habit, s) in &summaries {
        println!(
            "  {:<24} streak {} (best {})  7d {}%  30d {}%  all-time {}%",
            habit.name,
            s.current_streak,
            s.best_streak,
            s.completion_rate_7_days,
            s.completion_rate_30_days,
            s.completion_rate_all_time
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit_with(tracking: TrackingType, target: Option<f64>) -> Habit {
        Habit {
            id: 1,
            name: "Water".to_string(),
            description: None,
            icon: None,
            color: None,
            tracking_type: tracking,
            target_value: target,
            target_unit: Some("glasses".to_string()),
            frequency: Frequency::Daily,
            frequency_days: None,
            time_of_day: TimeOfDay::Anytime,
            cue_habit_id: None,
            cue_type: None,
            archived: false,
            sort_order: 0,
            created_at: String::new(),
        }
    }

    #[test]
    fn boolean_habits_complete_without_a_value() {
        let habit = habit_with(TrackingType::Boolean, None);
        assert!(completion_for(&habit, None).unwrap());
    }

    #[test]
    fn quantity_habits_require_a_value() {
        let habit = habit_with(TrackingType::Quantity, Some(8.0));
        assert!(completion_for(&habit, None).is_err());
        assert!(!completion_for(&habit, Some(5.0)).unwrap());
        assert!(completion_for(&habit, Some(8.0)).unwrap());
    }

    #[test]
    fn days_parse_and_reject_out_of_range() {
        assert_eq!(parse_days("1, 3,5").unwrap(), vec![1, 3, 5]);
        assert!(parse_days("7").is_err());
        assert!(parse_days("mon").is_err());
    }

    #[test]
    fn footer_ignores_archived_habits_both_ways() {
        let today = NaiveDate::parse_from_str("2025-06-15", "%Y-%m-%d").unwrap();
        let mut water = habit_with(TrackingType::Boolean, None);
        let mut retired = habit_with(TrackingType::Boolean, None);
        retired.id = 2;
        retired.name = "Old".to_string();
        retired.archived = true;
        water.id = 1;

        // The archived habit is completed today; it must not count as done
        // nor as due.
        let entries = vec![
            HabitEntry::on(1, today, false),
            HabitEntry::on(2, today, true),
        ];
        assert_eq!(footer_counts(&[water, retired], &entries), (0, 1));
    }
}
