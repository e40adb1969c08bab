use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Cache raw HTML for archival/debugging.
///
/// Lets the page be re-examined without re-fetching. Parent directories
/// are created as needed; an existing file is overwritten.
pub fn cache_html(path: &Path, html: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = html.len(), "Cached raw HTML");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_html_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw").join("page.html");
        cache_html(&path, "<html>first</html>").unwrap();
        cache_html(&path, "<html>second</html>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<html>second</html>");
    }
}
