pub mod fetch;
pub mod normalize;
pub mod output;
pub mod table;

pub use fetch::{fetch_page, FetchError, FetchOptions};
pub use table::{extract_table, TableError};

use anyhow::Result;
use std::path::Path;
use streamrank_model::RawTable;

/// Fetch the ranking page and extract the first table whose header mentions `Artist`.
///
/// When `cache_path` is given, the raw HTML is written there once the fetch
/// has succeeded.
pub async fn acquire(options: &FetchOptions, cache_path: Option<&Path>) -> Result<RawTable> {
    tracing::info!(url = %options.url, "Fetching ranking page");
    let html = fetch_page(options).await?;
    tracing::info!(bytes = html.len(), "Received HTML");

    if let Some(path) = cache_path {
        output::cache_html(path, &html)?;
    }

    let table = extract_table(&html, table::HEADER_NEEDLE)?;
    tracing::info!(
        columns = table.width(),
        rows = table.rows.len(),
        "Extracted ranking table"
    );
    Ok(table)
}
