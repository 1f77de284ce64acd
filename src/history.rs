use chrono::{DateTime, Local, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_dirs::AppDirs;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("history export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("history io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// One settled spin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub label: String,
    /// Items left on the wheel after this winner was removed.
    pub remaining: usize,
    pub spun_at: DateTime<Local>,
}

/// Database of past winners
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Opens the database under the state directory, creating it if needed.
    pub fn open_default() -> Result<Self> {
        let path = Self::default_path();
        Self::open(path)
    }

    pub fn default_path() -> PathBuf {
        AppDirs::history_path().unwrap_or_else(|| PathBuf::from("pickwheel_history.db"))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS winners (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL,
                remaining INTEGER NOT NULL,
                spun_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }

    pub fn record(&self, label: &str, remaining: usize) -> Result<()> {
        self.record_at(label, remaining, Local::now())
    }

    pub fn record_at(&self, label: &str, remaining: usize, at: DateTime<Local>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO winners (label, remaining, spun_at) VALUES (?1, ?2, ?3)",
            params![label, remaining as i64, at.with_timezone(&Utc).to_rfc3339()],
        )?;
        Ok(())
    }

    /// Most recent winners first, in the order they were recorded. Wall clock
    /// time can step backwards, so timestamps do not decide the order.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT label, remaining, spun_at
            FROM winners
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let spun_at: String = row.get(2)?;
            let spun_at = DateTime::parse_from_rfc3339(&spun_at)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        2,
                        "spun_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);
            let remaining: i64 = row.get(1)?;

            Ok(HistoryEntry {
                label: row.get(0)?,
                remaining: usize::try_from(remaining).unwrap_or(0),
                spun_at,
            })
        })?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }

    /// Wins per label, most frequent first.
    pub fn tally(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT label, COUNT(*) AS wins
            FROM winners
            GROUP BY label
            ORDER BY wins DESC, label ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut tally = Vec::new();
        for row in rows {
            tally.push(row?);
        }
        Ok(tally)
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM winners", [], |row| row.get(0))?)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM winners", [])?;
        Ok(())
    }

    /// Writes every winner, oldest first, as CSV. Returns the number of rows.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let mut entries = self.recent(usize::MAX >> 1)?;
        entries.reverse();

        let mut writer = csv::Writer::from_path(path)?;
        for entry in &entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(entries.len())
    }
}
