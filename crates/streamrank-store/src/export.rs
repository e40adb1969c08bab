use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use streamrank_model::SongRecord;

/// Write records as a pretty-printed JSON array, overwriting `path`.
pub fn write_json(path: &Path, records: &[SongRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = records.len(), "Wrote JSON export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_write_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top_songs.json");
        let records = vec![SongRecord::new(
            Some(3),
            "\"Someone You Loved\"",
            "Lewis Capaldi",
            3.7,
            NaiveDate::from_ymd_opt(2018, 11, 8).unwrap(),
        )];

        write_json(&path, &records).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let parsed: Vec<SongRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, records);
        assert!(text.contains("\"year\": 2018"));
    }
}
