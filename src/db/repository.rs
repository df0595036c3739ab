use anyhow::Result;
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::{
    CueType, DailyStats, Frequency, Habit, HabitEntry, StreakSummary, TimeOfDay, TrackingType,
};
use crate::stats::{compute_streak_summary, UserStats};

const DATE_FMT: &str = "%Y-%m-%d";

fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| rusqlite::Error::InvalidParameterName(format!("bad date '{}': {}", s, e)))
}

fn date_str(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

// ─── Habit repo ──────────────────────────────────────────────────────────────

/// Everything needed to create a habit; the store assigns id and sort order.
#[derive(Debug, Clone, Default)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub tracking_type: Option<TrackingType>,
    pub target_value: Option<f64>,
    pub target_unit: Option<String>,
    pub frequency: Option<Frequency>,
    pub frequency_days: Option<Vec<u8>>,
    pub time_of_day: Option<TimeOfDay>,
    pub cue_habit_id: Option<i64>,
    pub cue_type: Option<CueType>,
}

fn habit_from_row(row: &Row) -> rusqlite::Result<Habit> {
    let invalid = |e: crate::models::ParseModelError| {
        rusqlite::Error::InvalidParameterName(e.to_string())
    };

    let frequency_days = match row.get::<_, Option<String>>(9)? {
        None => None,
        Some(json) => Some(serde_json::from_str::<Vec<u8>>(&json).map_err(|e| {
            rusqlite::Error::InvalidParameterName(format!("bad frequency_days '{}': {}", json, e))
        })?),
    };

    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        icon: row.get(3)?,
        color: row.get(4)?,
        tracking_type: TrackingType::from_str(&row.get::<_, String>(5)?).map_err(invalid)?,
        target_value: row.get(6)?,
        target_unit: row.get(7)?,
        frequency: Frequency::from_str(&row.get::<_, String>(8)?).map_err(invalid)?,
        frequency_days,
        time_of_day: TimeOfDay::from_str(&row.get::<_, String>(10)?).map_err(invalid)?,
        cue_habit_id: row.get(11)?,
        cue_type: match row.get::<_, Option<String>>(12)? {
            None => None,
            Some(s) => Some(CueType::from_str(&s).map_err(invalid)?),
        },
        archived: row.get::<_, i32>(13)? != 0,
        sort_order: row.get(14)?,
        created_at: row.get(15)?,
    })
}

const HABIT_COLUMNS: &str = "id, name, description, icon, color, tracking_type, target_value,
     target_unit, frequency, frequency_days, time_of_day, cue_habit_id, cue_type,
     archived, sort_order, created_at";

pub struct HabitRepo;

impl HabitRepo {
    pub fn insert(conn: &Connection, new: &NewHabit) -> Result<i64> {
        // New habits go to the end of the list.
        let next_order: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM habits",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        let frequency_days = new
            .frequency_days
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        conn.execute(
            "INSERT INTO habits
                (name, description, icon, color, tracking_type, target_value, target_unit,
                 frequency, frequency_days, time_of_day, cue_habit_id, cue_type, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                new.name,
                new.description,
                new.icon,
                new.color,
                new.tracking_type.unwrap_or(TrackingType::Boolean).as_str(),
                new.target_value,
                new.target_unit,
                new.frequency.unwrap_or(Frequency::Daily).as_str(),
                frequency_days,
                new.time_of_day.unwrap_or(TimeOfDay::Anytime).as_str(),
                new.cue_habit_id,
                new.cue_type.map(|c| c.as_str()),
                next_order,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("created habit '{}' (id {})", new.name, id);
        Ok(id)
    }

    pub fn get_active(conn: &Connection) -> Result<Vec<Habit>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE archived = 0 ORDER BY sort_order, id"
        ))?;
        let rows = stmt.query_map([], habit_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn get_all(conn: &Connection) -> Result<Vec<Habit>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits ORDER BY sort_order, id"
        ))?;
        let rows = stmt.query_map([], habit_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Habit>> {
        let habits = Self::get_active(conn)?;
        Ok(habits
            .into_iter()
            .find(|h| h.name.to_lowercase() == name.to_lowercase()))
    }

    pub fn archive(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("UPDATE habits SET archived = 1 WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn count_all(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))
            .map_err(anyhow::Error::from)
    }
}

// ─── Entry repo ──────────────────────────────────────────────────────────────

pub struct EntryRepo;

impl EntryRepo {
    /// One row per (habit, date); checking in again overwrites it.
    pub fn upsert(
        conn: &Connection,
        habit_id: i64,
        date: NaiveDate,
        completed: bool,
        value: Option<f64>,
        note: Option<&str>,
    ) -> Result<()> {
        debug!(
            "check-in habit {} on {}: completed={}",
            habit_id,
            date_str(date),
            completed
        );
        conn.execute(
            "INSERT INTO habit_entries (habit_id, entry_date, completed, value, note)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(habit_id, entry_date)
             DO UPDATE SET completed = ?3, value = ?4, note = ?5",
            params![habit_id, date_str(date), completed as i32, value, note],
        )?;
        Ok(())
    }

    /// Remove the record for a date entirely (the `--undo` path).
    pub fn clear(conn: &Connection, habit_id: i64, date: NaiveDate) -> Result<bool> {
        let removed = conn.execute(
            "DELETE FROM habit_entries WHERE habit_id = ?1 AND entry_date = ?2",
            params![habit_id, date_str(date)],
        )?;
        Ok(removed > 0)
    }

    pub fn get_for_habit(conn: &Connection, habit_id: i64) -> Result<Vec<HabitEntry>> {
        let mut stmt = conn.prepare(
            "SELECT id, habit_id, entry_date, completed, value, note, created_at
             FROM habit_entries WHERE habit_id = ?1 ORDER BY entry_date DESC",
        )?;
        let rows = stmt.query_map(params![habit_id], entry_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn get_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<HabitEntry>> {
        let mut stmt = conn.prepare(
            "SELECT id, habit_id, entry_date, completed, value, note, created_at
             FROM habit_entries WHERE entry_date = ?1",
        )?;
        let rows = stmt.query_map(params![date_str(date)], entry_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }
}

fn entry_from_row(row: &Row) -> rusqlite::Result<HabitEntry> {
    Ok(HabitEntry {
        id: Some(row.get(0)?),
        habit_id: row.get(1)?,
        entry_date: parse_date(&row.get::<_, String>(2)?)?,
        completed: row.get::<_, i32>(3)? != 0,
        value: row.get(4)?,
        note: row.get(5)?,
        created_at: row.get(6)?,
    })
}

// ─── Stats repo ──────────────────────────────────────────────────────────────

pub struct StatsRepo;

impl StatsRepo {
    /// Completed check-ins per day over an inclusive range, with days that
    /// have no rows filled in as zero.
    pub fn daily_stats_range(
        conn: &Connection,
        start: NaiveDate,
        end: NaiveDate,
        habits_due: u32,
    ) -> Result<Vec<DailyStats>> {
        let mut stmt = conn.prepare(
            "SELECT entry_date, SUM(completed) FROM habit_entries
             WHERE entry_date >= ?1 AND entry_date <= ?2
             GROUP BY entry_date",
        )?;
        let rows = stmt.query_map(params![date_str(start), date_str(end)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut done_by_date: HashMap<String, u32> = HashMap::new();
        for r in rows {
            let (date, done) = r?;
            done_by_date.insert(date, done.max(0) as u32);
        }

        let mut out = Vec::new();
        let mut day = start;
        while day <= end {
            let key = date_str(day);
            out.push(DailyStats {
                done: done_by_date.get(&key).copied().unwrap_or(0),
                total: habits_due,
                date: key,
            });
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(out)
    }

    pub fn summary_for_habit(
        conn: &Connection,
        habit_id: i64,
        today: NaiveDate,
    ) -> Result<StreakSummary> {
        let entries = EntryRepo::get_for_habit(conn, habit_id)?;
        Ok(compute_streak_summary(&entries, today))
    }

    /// Assemble the summary stats the achievement catalog is judged against.
    pub fn user_stats(conn: &Connection, today: NaiveDate) -> Result<UserStats> {
        let total_completions: i64 = conn.query_row(
            "SELECT COUNT(*) FROM habit_entries WHERE completed = 1",
            [],
            |row| row.get(0),
        )?;
        let habits_created = HabitRepo::count_all(conn)?;

        // A perfect day covers every habit currently on the list.
        let perfect_days: i64 = conn.query_row(
            "SELECT COUNT(*) FROM (
                SELECT entry_date, SUM(completed) AS done
                FROM habit_entries GROUP BY entry_date
             )
             WHERE done >= (SELECT COUNT(*) FROM habits)
               AND (SELECT COUNT(*) FROM habits) > 0",
            [],
            |row| row.get(0),
        )?;

        // created_at is local wall clock, so the hour is what the user saw.
        let has_early_completion: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM habit_entries
                WHERE completed = 1 AND CAST(strftime('%H', created_at) AS INTEGER) < 7
             )",
            [],
            |row| row.get(0),
        )?;
        let has_late_completion: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM habit_entries
                WHERE completed = 1 AND CAST(strftime('%H', created_at) AS INTEGER) >= 22
             )",
            [],
            |row| row.get(0),
        )?;

        // Streak badges look at the strongest habit.
        let mut best_streak = 0u32;
        let mut current_streak = 0u32;
        for habit in HabitRepo::get_all(conn)? {
            let summary = Self::summary_for_habit(conn, habit.id, today)?;
            best_streak = best_streak.max(summary.best_streak);
            current_streak = current_streak.max(summary.current_streak);
        }

        Ok(UserStats {
            total_completions: total_completions.max(0) as u32,
            best_streak,
            current_streak,
            perfect_days: perfect_days.max(0) as u32,
            habits_created: habits_created.max(0) as u32,
            has_early_completion,
            has_late_completion,
        })
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::Duration;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn add_habit(conn: &Connection, name: &str) -> i64 {
        HabitRepo::insert(
            conn,
            &NewHabit {
                name: name.to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn migrations_are_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groove.db");
        let conn = Connection::open(&path).unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(add_habit(&conn, "Read"), 1);
    }

    #[test]
    fn habits_round_trip_with_typed_fields() {
        let conn = test_conn();
        let id = HabitRepo::insert(
            &conn,
            &NewHabit {
                name: "Run".to_string(),
                tracking_type: Some(TrackingType::Duration),
                target_value: Some(30.0),
                target_unit: Some("min".to_string()),
                frequency: Some(Frequency::SpecificDays),
                frequency_days: Some(vec![1, 3, 5]),
                time_of_day: Some(TimeOfDay::Morning),
                ..Default::default()
            },
        )
        .unwrap();

        let habits = HabitRepo::get_active(&conn).unwrap();
        assert_eq!(habits.len(), 1);
        let habit = &habits[0];
        assert_eq!(habit.id, id);
        assert_eq!(habit.tracking_type, TrackingType::Duration);
        assert_eq!(habit.frequency_days.as_deref(), Some(&[1u8, 3, 5][..]));
        assert_eq!(habit.time_of_day, TimeOfDay::Morning);
    }

    #[test]
    fn find_by_name_is_case_insensitive_and_skips_archived() {
        let conn = test_conn();
        let id = add_habit(&conn, "Drink Water");
        assert!(HabitRepo::find_by_name(&conn, "drink water")
            .unwrap()
            .is_some());
        HabitRepo::archive(&conn, id).unwrap();
        assert!(HabitRepo::find_by_name(&conn, "drink water")
            .unwrap()
            .is_none());
        assert_eq!(HabitRepo::count_all(&conn).unwrap(), 1);
    }

    #[test]
    fn check_in_upserts_one_row_per_date() {
        let conn = test_conn();
        let id = add_habit(&conn, "Read");
        let date = day("2025-06-10");

        EntryRepo::upsert(&conn, id, date, true, None, None).unwrap();
        EntryRepo::upsert(&conn, id, date, false, Some(3.0), Some("tired")).unwrap();

        let entries = EntryRepo::get_for_habit(&conn, id).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].completed);
        assert_eq!(entries[0].value, Some(3.0));
        assert_eq!(entries[0].note.as_deref(), Some("tired"));
        assert_eq!(entries[0].entry_date, date);

        assert!(EntryRepo::clear(&conn, id, date).unwrap());
        assert!(EntryRepo::get_for_habit(&conn, id).unwrap().is_empty());
    }

    #[test]
    fn daily_stats_fill_missing_days() {
        let conn = test_conn();
        let id = add_habit(&conn, "Read");
        EntryRepo::upsert(&conn, id, day("2025-06-10"), true, None, None).unwrap();
        EntryRepo::upsert(&conn, id, day("2025-06-12"), true, None, None).unwrap();

        let stats =
            StatsRepo::daily_stats_range(&conn, day("2025-06-09"), day("2025-06-12"), 1).unwrap();
        let done: Vec<u32> = stats.iter().map(|d| d.done).collect();
        assert_eq!(done, vec![0, 1, 0, 1]);
        assert!(stats.iter().all(|d| d.total == 1));
    }

    #[test]
    fn user_stats_aggregate_across_habits() {
        let conn = test_conn();
        let read = add_habit(&conn, "Read");
        let run = add_habit(&conn, "Run");
        let today = day("2025-06-12");

        // Read: 3-day run ending today. Run: only today — so the 12th is the
        // single perfect day.
        for offset in 0..3 {
            EntryRepo::upsert(&conn, read, today - Duration::days(offset), true, None, None)
                .unwrap();
        }
        EntryRepo::upsert(&conn, run, today, true, None, None).unwrap();

        let stats = StatsRepo::user_stats(&conn, today).unwrap();
        assert_eq!(stats.total_completions, 4);
        assert_eq!(stats.habits_created, 2);
        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.perfect_days, 1);
    }
}
