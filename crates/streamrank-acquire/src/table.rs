use crate::normalize::normalize_cell;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::ops::Deref;
use streamrank_model::RawTable;
use thiserror::Error;

/// Text that must appear in a table's header for it to be the ranking.
pub const HEADER_NEEDLE: &str = "Artist";

/// Upper bound on `colspan`/`rowspan`, so a malformed attribute cannot blow up the grid.
const MAX_SPAN: usize = 1000;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("no table with '{0}' in its header")]
    NoMatchingTable(String),
}

/// Extract the first table whose header region contains `needle`.
///
/// The header region is the table's `<thead>` rows, or, without a
/// `<thead>`, its leading rows made only of `<th>` cells. Spanning cells
/// are expanded into every position they cover.
pub fn extract_table(html: &str, needle: &str) -> Result<RawTable, TableError> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").expect("valid selector");

    for (index, table) in document.select(&table_sel).enumerate() {
        let (header_rows, body_rows) = split_rows(table);
        let headers = join_header_rows(&expand_spans(&header_rows));

        if !headers.iter().any(|h| h.contains(needle)) {
            tracing::debug!(table = index, "Skipping table without matching header");
            continue;
        }

        let rows: Vec<Vec<String>> = expand_spans(&body_rows)
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        tracing::debug!(table = index, headers = ?headers, rows = rows.len(), "Matched table");
        return Ok(RawTable { headers, rows });
    }

    Err(TableError::NoMatchingTable(needle.to_string()))
}

/// Split a table's own rows (not those of nested tables) into header and body rows.
fn split_rows(table: ElementRef<'_>) -> (Vec<ElementRef<'_>>, Vec<ElementRef<'_>>) {
    let mut head = Vec::new();
    let mut body = Vec::new();

    for section in table.children().filter_map(ElementRef::wrap) {
        match section.value().name() {
            "thead" => head.extend(child_rows(section)),
            "tbody" | "tfoot" => body.extend(child_rows(section)),
            "tr" => body.push(section),
            _ => {}
        }
    }

    if head.is_empty() {
        let leading = body
            .iter()
            .take_while(|row| {
                let cells = row_cells(**row);
                !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th")
            })
            .count();
        head = body.drain(..leading).collect();
    }

    (head, body)
}

fn child_rows(section: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
}

fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}

/// A cell value still covering rows below the one it was declared in.
struct Carried {
    remaining: usize,
    text: String,
}

/// Lay rows out on a grid, repeating spanning cells into each position they cover.
fn expand_spans(rows: &[ElementRef<'_>]) -> Vec<Vec<String>> {
    let mut carry: Vec<Option<Carried>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out = Vec::new();
        let mut cells = row_cells(*row).into_iter();

        loop {
            let col = out.len();
            if let Some(text) = take_carried(&mut carry, col) {
                out.push(text);
                continue;
            }
            let Some(cell) = cells.next() else { break };

            let text = cell_text(cell);
            let colspan = span_attr(cell.value(), "colspan");
            let rowspan = span_attr(cell.value(), "rowspan");
            for offset in 0..colspan {
                let target = col + offset;
                if carry.len() <= target {
                    carry.resize_with(target + 1, || None);
                }
                carry[target] = (rowspan > 1).then(|| Carried {
                    remaining: rowspan - 1,
                    text: text.clone(),
                });
                out.push(text.clone());
            }
        }

        // Cells carried down past the last explicit cell of this row.
        if let Some(last) = carry.iter().rposition(Option::is_some) {
            while out.len() <= last {
                let col = out.len();
                out.push(take_carried(&mut carry, col).unwrap_or_default());
            }
        }

        grid.push(out);
    }

    grid
}

fn take_carried(carry: &mut [Option<Carried>], col: usize) -> Option<String> {
    let slot = carry.get_mut(col)?;
    let carried = slot.as_mut()?;
    let text = carried.text.clone();
    carried.remaining -= 1;
    if carried.remaining == 0 {
        *slot = None;
    }
    Some(text)
}

fn span_attr(elem: &Element, name: &str) -> usize {
    elem.attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(MAX_SPAN))
}

/// Collapse multi-row headers into one label per column.
fn join_header_rows(rows: &[Vec<String>]) -> Vec<String> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for row in rows {
                if let Some(text) = row.get(col).filter(|t| !t.is_empty()) {
                    if parts.last() != Some(&text.as_str()) {
                        parts.push(text);
                    }
                }
            }
            parts.join(" ")
        })
        .collect()
}

/// Visible text of a cell, normalized.
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_visible_text(cell, &mut raw);
    normalize_cell(&raw)
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text.deref()),
            Node::Element(elem) => {
                if elem.name() == "br" {
                    out.push(' ');
                } else if !is_hidden(elem) {
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        collect_visible_text(child_ref, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Elements a browser would not render as cell text (sort keys, inline styles).
fn is_hidden(elem: &Element) -> bool {
    if matches!(elem.name(), "style" | "script") {
        return true;
    }
    elem.attr("style").is_some_and(|style| {
        let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
        compact.to_ascii_lowercase().contains("display:none")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANKING: &str = r#"
        <html><body>
        <table class="infobox"><tr><th>Genre</th><td>Pop</td></tr></table>
        <table class="wikitable sortable">
          <tbody>
            <tr><th>Rank</th><th>Song</th><th>Artist(s)</th><th>Streams (billions)</th><th>Release date</th><th>Ref.</th></tr>
            <tr><td>1</td><td>"Blinding Lights"</td><td>The Weeknd</td><td>4.9</td><td>29 November 2019</td><td><sup>[1]</sup></td></tr>
            <tr><td>2</td><td>"Shape of You"<sup class="reference">[a]</sup></td><td>Ed Sheeran</td><td>4.1</td><td>6 January 2017</td><td><sup>[2]</sup></td></tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn test_extract_first_matching_table() {
        let table = extract_table(RANKING, HEADER_NEEDLE).unwrap();
        assert_eq!(table.headers.len(), 6);
        assert_eq!(table.headers[2], "Artist(s)");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "\"Blinding Lights\"");
        assert_eq!(table.rows[1][1], "\"Shape of You\"[a]");
        assert_eq!(table.rows[1][4], "6 January 2017");
    }

    #[test]
    fn test_no_matching_table() {
        let html = "<table><tr><th>Genre</th></tr><tr><td>Pop</td></tr></table>";
        let err = extract_table(html, HEADER_NEEDLE).unwrap_err();
        assert!(matches!(err, TableError::NoMatchingTable(_)));
        assert!(err.to_string().contains("Artist"));
    }

    #[test]
    fn test_needle_only_in_body_does_not_match() {
        let html = "<table><tr><th>Name</th></tr><tr><td>Artist</td></tr></table>";
        assert!(extract_table(html, HEADER_NEEDLE).is_err());
    }

    #[test]
    fn test_thead_header() {
        let html = r#"<table>
            <thead><tr><td>Rank</td><td>Artist</td></tr></thead>
            <tbody><tr><th>1</th><td>Drake</td></tr></tbody>
        </table>"#;
        let table = extract_table(html, HEADER_NEEDLE).unwrap();
        assert_eq!(table.headers, vec!["Rank", "Artist"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "Drake".to_string()]]);
    }

    #[test]
    fn test_rowspan_and_colspan_expand() {
        let html = r#"<table>
            <tr><th>Rank</th><th>Song</th><th>Artist</th></tr>
            <tr><td>1</td><td>One</td><td rowspan="2">Drake</td></tr>
            <tr><td>2</td><td>Two</td></tr>
            <tr><td colspan="3">As of 1 May 2024</td></tr>
        </table>"#;
        let table = extract_table(html, HEADER_NEEDLE).unwrap();
        assert_eq!(table.rows[0], vec!["1", "One", "Drake"]);
        assert_eq!(table.rows[1], vec!["2", "Two", "Drake"]);
        assert_eq!(table.rows[2], vec!["As of 1 May 2024"; 3]);
    }

    #[test]
    fn test_rowspan_in_first_column() {
        let html = r#"<table>
            <tr><th>Rank</th><th>Artist</th></tr>
            <tr><td rowspan="2">1</td><td>A</td></tr>
            <tr><td>B</td></tr>
        </table>"#;
        let table = extract_table(html, HEADER_NEEDLE).unwrap();
        assert_eq!(table.rows[1], vec!["1", "B"]);
    }

    #[test]
    fn test_rowspan_past_last_cell() {
        let html = r#"<table>
            <tr><th>Artist</th><th>Note</th></tr>
            <tr><td>A</td><td rowspan="2">shared</td></tr>
            <tr><td>B</td></tr>
        </table>"#;
        let table = extract_table(html, HEADER_NEEDLE).unwrap();
        assert_eq!(table.rows[1], vec!["B", "shared"]);
    }

    #[test]
    fn test_hidden_text_and_breaks() {
        let html = r#"<table>
            <tr><th>Artist</th><th>Date</th></tr>
            <tr><td>Bad Bunny<br/>Jhay Cortez</td>
                <td><span style="display: none">2020-02-29</span>29 February 2020</td></tr>
        </table>"#;
        let table = extract_table(html, HEADER_NEEDLE).unwrap();
        assert_eq!(table.rows[0], vec!["Bad Bunny Jhay Cortez", "29 February 2020"]);
    }

    #[test]
    fn test_multi_row_header_joined() {
        let html = r#"<table>
            <thead>
              <tr><th rowspan="2">Song</th><th colspan="2">Credits</th></tr>
              <tr><th>Artist</th><th>Label</th></tr>
            </thead>
            <tr><td>S</td><td>A</td><td>L</td></tr>
        </table>"#;
        let table = extract_table(html, HEADER_NEEDLE).unwrap();
        assert_eq!(table.headers, vec!["Song", "Credits Artist", "Credits Label"]);
    }

    #[test]
    fn test_empty_rows_skipped() {
        let html = r#"<table>
            <tr><th>Artist</th></tr>
            <tr><td> </td></tr>
            <tr><td>A</td></tr>
        </table>"#;
        let table = extract_table(html, HEADER_NEEDLE).unwrap();
        assert_eq!(table.rows.len(), 1);
    }
}
