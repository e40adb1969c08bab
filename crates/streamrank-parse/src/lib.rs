use streamrank_model::{RawTable, SongRecord, SOURCE_COLUMNS};
use thiserror::Error;

pub mod citation;
pub mod coerce;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error(
        "expected {expected} columns ({columns}), found {found}",
        columns = SOURCE_COLUMNS.join(", ")
    )]
    ColumnCount { expected: usize, found: usize },
}

/// One table row after renaming and coercion, before the completeness filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedRow {
    pub rank: Option<i64>,
    pub song: String,
    pub artist: String,
    pub streams_billions: Option<f64>,
    pub release_date: Option<chrono::NaiveDate>,
}

impl CoercedRow {
    /// Turn into a record if both the stream count and the release date parsed.
    pub fn into_record(self) -> Option<SongRecord> {
        let streams = self.streams_billions?;
        let date = self.release_date?;
        Some(SongRecord::new(self.rank, self.song, self.artist, streams, date))
    }
}

/// Outcome of cleaning: the kept records plus how many rows were discarded.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub records: Vec<SongRecord>,
    pub dropped: usize,
}

/// Rename, clean, coerce and filter a scraped ranking table.
///
/// Columns are assigned positionally (`Rank, Song, Artist, Streams_Billions,
/// Release_Date, Ref`) and the table must be exactly that wide. `Ref` is
/// discarded. Rows whose stream count or release date cannot be parsed are
/// dropped; everything else about a bad cell is tolerated.
pub fn clean_table(table: &RawTable) -> Result<CleanedTable, CleanError> {
    let width = table.width();
    if width != SOURCE_COLUMNS.len() {
        return Err(CleanError::ColumnCount {
            expected: SOURCE_COLUMNS.len(),
            found: width,
        });
    }

    let coerced: Vec<CoercedRow> = (0..table.rows.len())
        .map(|row| coerce_row(table, row))
        .collect();

    let total = coerced.len();
    let records: Vec<SongRecord> = coerced
        .into_iter()
        .filter_map(CoercedRow::into_record)
        .collect();
    let dropped = total - records.len();

    if dropped > 0 {
        tracing::info!(dropped, kept = records.len(), "Dropped rows missing stream count or release date");
    }
    tracing::debug!(rows = records.len(), "Cleaned table");

    Ok(CleanedTable { records, dropped })
}

fn coerce_row(table: &RawTable, row: usize) -> CoercedRow {
    let cell = |col: usize| table.cell(row, col).unwrap_or("");

    CoercedRow {
        rank: coerce::parse_rank(cell(0)),
        song: citation::strip_citations(cell(1)),
        artist: citation::strip_citations(cell(2)),
        streams_billions: coerce::parse_streams(cell(3)),
        release_date: coerce::parse_release_date(cell(4)),
    }
}

/// Lay records back out as a six-column raw table, the shape `clean_table` reads.
///
/// The `Ref` column comes back empty. Cleaning the result yields the same records.
pub fn to_raw_table(records: &[SongRecord]) -> RawTable {
    RawTable {
        headers: SOURCE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: records
            .iter()
            .map(|r| {
                vec![
                    r.rank.map(|n| n.to_string()).unwrap_or_default(),
                    r.song.clone(),
                    r.artist.clone(),
                    r.streams_billions.to_string(),
                    r.release_date.format("%Y-%m-%d").to_string(),
                    String::new(),
                ]
            })
            .collect(),
    }
}
