use chrono::Datelike;
use std::collections::HashSet;
use streamrank_model::SongRecord;
use streamrank_parse::citation::has_citation;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("row {0}: song title is empty")]
    EmptySong(usize),

    #[error("row {0}: artist is empty")]
    EmptyArtist(usize),

    #[error("row {row}: citation marker left in {field}: '{text}'")]
    CitationRemnant {
        row: usize,
        field: &'static str,
        text: String,
    },

    #[error("row {row}: stream count {streams} is negative")]
    NegativeStreams { row: usize, streams: f64 },

    #[error("row {row}: year {year} does not match release date {date}")]
    YearMismatch {
        row: usize,
        year: i32,
        date: chrono::NaiveDate,
    },
}

/// Check cleaned records for internal consistency.
///
/// Findings are logged as warnings and returned; none of them is fatal.
pub fn validate_records(records: &[SongRecord]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (row, record) in records.iter().enumerate() {
        if record.song.is_empty() {
            errors.push(ValidationError::EmptySong(row));
        }
        if record.artist.is_empty() {
            errors.push(ValidationError::EmptyArtist(row));
        }
        for (field, text) in [("Song", &record.song), ("Artist", &record.artist)] {
            if has_citation(text) {
                errors.push(ValidationError::CitationRemnant {
                    row,
                    field,
                    text: text.clone(),
                });
            }
        }
        if record.streams_billions < 0.0 {
            errors.push(ValidationError::NegativeStreams {
                row,
                streams: record.streams_billions,
            });
        }
        if record.year != record.release_date.year() {
            errors.push(ValidationError::YearMismatch {
                row,
                year: record.year,
                date: record.release_date,
            });
        }
    }

    for e in &errors {
        tracing::warn!("{e}");
    }

    errors
}

/// Shape of a cleaned dataset, for the run log.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub artists: usize,
    pub years: Option<(i32, i32)>,
    pub streams: Option<(f64, f64)>,
}

pub fn summarize(records: &[SongRecord]) -> DatasetSummary {
    let artists: HashSet<&str> = records.iter().map(|r| r.artist.as_str()).collect();

    let years = records.iter().map(|r| r.year).fold(None, |acc, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    });
    let streams = records
        .iter()
        .map(|r| r.streams_billions)
        .fold(None, |acc: Option<(f64, f64)>, s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        });

    let summary = DatasetSummary {
        rows: records.len(),
        artists: artists.len(),
        years,
        streams,
    };
    tracing::info!(
        rows = summary.rows,
        artists = summary.artists,
        years = ?summary.years,
        streams = ?summary.streams,
        "Dataset summary"
    );
    summary
}
