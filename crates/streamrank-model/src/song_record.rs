use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Column labels assigned positionally to the scraped table.
///
/// The last one (`Ref`) holds the page's reference links and is dropped
/// during cleaning.
pub const SOURCE_COLUMNS: [&str; 6] = [
    "Rank",
    "Song",
    "Artist",
    "Streams_Billions",
    "Release_Date",
    "Ref",
];

/// Columns of the persisted `top_songs` table, in storage order.
pub const STORED_COLUMNS: [&str; 6] = [
    "Rank",
    "Song",
    "Artist",
    "Streams_Billions",
    "Release_Date",
    "Year",
];

/// One cleaned row of the ranking.
///
/// Stream count and release date are not optional: rows that failed either
/// coercion never become a `SongRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    /// Position in the ranking. `None` when the page's rank cell was not an integer.
    pub rank: Option<i64>,
    pub song: String,
    pub artist: String,
    /// Total streams, in billions.
    pub streams_billions: f64,
    pub release_date: NaiveDate,
    pub year: i32,
}

impl SongRecord {
    /// Build a record, deriving `year` from the release date.
    pub fn new(
        rank: Option<i64>,
        song: impl Into<String>,
        artist: impl Into<String>,
        streams_billions: f64,
        release_date: NaiveDate,
    ) -> Self {
        Self {
            rank,
            song: song.into(),
            artist: artist.into(),
            streams_billions,
            release_date,
            year: release_date.year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_derived_from_date() {
        let date = NaiveDate::from_ymd_opt(2017, 1, 6).unwrap();
        let record = SongRecord::new(Some(1), "Shape of You", "Ed Sheeran", 4.1, date);
        assert_eq!(record.year, 2017);
    }

    #[test]
    fn test_serialize_date_as_iso() {
        let date = NaiveDate::from_ymd_opt(2019, 11, 29).unwrap();
        let record = SongRecord::new(None, "Blinding Lights", "The Weeknd", 4.9, date);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"release_date\":\"2019-11-29\""));
        assert!(json.contains("\"rank\":null"));
    }
}
