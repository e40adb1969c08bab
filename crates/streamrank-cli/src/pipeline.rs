use anyhow::Result;
use std::path::PathBuf;
use streamrank_acquire::{FetchError, FetchOptions};
use streamrank_chart::ChartFiles;
use streamrank_model::SongRecord;

const PREVIEW_ROWS: usize = 5;

/// Everything one run needs to know. `Default` is the fixed production setup.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub fetch: FetchOptions,
    pub db_path: PathBuf,
    pub table: String,
    /// Directory the three charts are written to.
    pub out_dir: PathBuf,
    pub cache_html: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            fetch: FetchOptions::default(),
            db_path: PathBuf::from(streamrank_store::DEFAULT_DB_PATH),
            table: streamrank_store::DEFAULT_TABLE.to_string(),
            out_dir: PathBuf::from("."),
            cache_html: None,
            json_path: None,
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub rows: usize,
    pub dropped: usize,
    pub charts: ChartFiles,
}

/// Fetch, clean, store and chart, in that order.
///
/// Nothing is written to the database or chart directory until the page has
/// been fetched and cleaned. A failure in any step ends the run there; files
/// from earlier steps are left as they are.
pub async fn run(config: &EtlConfig) -> Result<RunSummary> {
    let raw = streamrank_acquire::acquire(&config.fetch, config.cache_html.as_deref()).await?;

    let cleaned = streamrank_parse::clean_table(&raw)?;
    tracing::info!(rows = cleaned.records.len(), dropped = cleaned.dropped, "Data ready");
    log_preview(&cleaned.records);

    streamrank_validate::validate_records(&cleaned.records);
    streamrank_validate::summarize(&cleaned.records);

    let rows = streamrank_store::replace_table(&config.db_path, &config.table, &cleaned.records)?;
    tracing::info!(path = %config.db_path.display(), "Database updated");

    if let Some(path) = &config.json_path {
        streamrank_store::write_json(path, &cleaned.records)?;
    }

    let charts = streamrank_chart::render_charts(&cleaned.records, &config.out_dir)?;
    tracing::info!(dir = %config.out_dir.display(), "Charts saved");

    Ok(RunSummary {
        rows,
        dropped: cleaned.dropped,
        charts,
    })
}

fn log_preview(records: &[SongRecord]) {
    for record in records.iter().take(PREVIEW_ROWS) {
        tracing::info!(
            rank = ?record.rank,
            song = %record.song,
            artist = %record.artist,
            streams_billions = record.streams_billions,
            release_date = %record.release_date,
            year = record.year,
            "Preview"
        );
    }
}

/// The two kinds of failure a run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The page could not be retrieved.
    Network,
    Other,
}

pub fn classify(err: &anyhow::Error) -> Failure {
    if err.chain().any(|cause| cause.is::<FetchError>()) {
        Failure::Network
    } else {
        Failure::Other
    }
}

/// True when the fetch gave up at its deadline.
pub fn timed_out(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<FetchError>())
        .any(FetchError::is_timeout)
}

/// Log a failed run with a message matching its kind.
pub fn report(err: &anyhow::Error) {
    match classify(err) {
        Failure::Network if timed_out(err) => {
            tracing::error!("Network error: request timed out: {err:#}")
        }
        Failure::Network => tracing::error!("Network error: {err:#}"),
        Failure::Other => tracing::error!("Unexpected error: {err:#}"),
    }
}
