use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS citizens (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            aadhaar     TEXT NOT NULL UNIQUE,
            name        TEXT
        );

        CREATE TABLE IF NOT EXISTS authorities (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reports (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            citizen_id          INTEGER NOT NULL REFERENCES citizens(id),
            priority            TEXT NOT NULL DEFAULT 'medium',
            description         TEXT NOT NULL,
            location            TEXT NOT NULL,
            phone               TEXT NOT NULL DEFAULT '',
            ward                TEXT NOT NULL DEFAULT '',
            photos              TEXT,
            anonymous_public    INTEGER NOT NULL DEFAULT 0,
            anonymous_authority INTEGER NOT NULL DEFAULT 0,
            status              TEXT NOT NULL DEFAULT 'open',
            created_at          TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_reports_citizen
            ON reports(citizen_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
