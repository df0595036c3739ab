use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS habits (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL UNIQUE,
            description    TEXT,
            icon           TEXT,
            color          TEXT,
            tracking_type  TEXT NOT NULL DEFAULT 'boolean'
                           CHECK(tracking_type IN ('boolean','quantity','duration','scale')),
            target_value   REAL,
            target_unit    TEXT,
            frequency      TEXT NOT NULL DEFAULT 'daily'
                           CHECK(frequency IN ('daily','weekly','specific_days')),
            frequency_days TEXT,
            time_of_day    TEXT NOT NULL DEFAULT 'anytime'
                           CHECK(time_of_day IN ('anytime','morning','afternoon','evening')),
            cue_habit_id   INTEGER REFERENCES habits(id),
            cue_type       TEXT CHECK(cue_type IN ('after','before','with')),
            archived       INTEGER DEFAULT 0,
            sort_order     INTEGER DEFAULT 0,
            created_at     TEXT DEFAULT (datetime('now','localtime'))
        );

        CREATE TABLE IF NOT EXISTS habit_entries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id    INTEGER NOT NULL REFERENCES habits(id),
            entry_date  TEXT NOT NULL,
            completed   INTEGER DEFAULT 0,
            value       REAL,
            note        TEXT,
            created_at  TEXT DEFAULT (datetime('now','localtime')),
            UNIQUE(habit_id, entry_date)
        );

        CREATE INDEX IF NOT EXISTS idx_entries_habit ON habit_entries(habit_id);
        CREATE INDEX IF NOT EXISTS idx_entries_date ON habit_entries(entry_date);

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ",
    )?;
    Ok(())
}
