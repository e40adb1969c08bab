//! SQLite persistence for the cleaned ranking.
//!
//! Each run replaces the table wholesale: drop, recreate and bulk insert in
//! a single transaction, so readers see either the previous run or this one.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::Path;
use streamrank_model::{SongRecord, STORED_COLUMNS};

pub const DEFAULT_DB_PATH: &str = "spotify.db";
pub const DEFAULT_TABLE: &str = "top_songs";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Overwrite `table` in the database at `db_path` with `records`.
///
/// The file is created if absent. Any previous contents of the table are
/// discarded. Returns the number of rows written.
pub fn replace_table(db_path: &Path, table: &str, records: &[SongRecord]) -> Result<usize> {
    let table = quote_ident(table)?;
    let mut conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};
         CREATE TABLE {table} (
             Rank INTEGER,
             Song TEXT,
             Artist TEXT,
             Streams_Billions REAL,
             Release_Date TEXT,
             Year INTEGER
         );"
    ))
    .context("Failed to recreate table")?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            STORED_COLUMNS.join(", ")
        ))?;
        for record in records {
            stmt.execute(params![
                record.rank,
                record.song,
                record.artist,
                record.streams_billions,
                record.release_date.format(DATE_FORMAT).to_string(),
                record.year,
            ])?;
        }
    }

    tx.commit().context("Failed to commit")?;
    tracing::info!(
        path = %db_path.display(),
        table = %table,
        rows = records.len(),
        "Replaced table contents"
    );

    Ok(records.len())
}

/// Read every row of `table` back as records, in insertion order.
pub fn load_records(db_path: &Path, table: &str) -> Result<Vec<SongRecord>> {
    let table = quote_ident(table)?;
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {table} ORDER BY rowid",
        STORED_COLUMNS.join(", ")
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, Option<i64>>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, i32>(5)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (rank, song, artist, streams_billions, date, year) = row?;
        let release_date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .with_context(|| format!("Bad Release_Date '{date}' in {table}"))?;
        records.push(SongRecord {
            rank,
            song,
            artist,
            streams_billions,
            release_date,
            year,
        });
    }
    Ok(records)
}

pub fn count_rows(db_path: &Path, table: &str) -> Result<usize> {
    let table = quote_ident(table)?;
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    Ok(count as usize)
}

/// Quote a table name for interpolation; only `[A-Za-z0-9_]` names are accepted.
fn quote_ident(name: &str) -> Result<String> {
    anyhow::ensure!(
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        "Invalid table name '{name}'"
    );
    Ok(format!("\"{name}\""))
}
