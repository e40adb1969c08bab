use crate::stats::{self, ArtistCount, Histogram};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use streamrank_model::SongRecord;

pub const ARTISTS_FILE: &str = "chart_1_artists.svg";
pub const STREAMS_BY_YEAR_FILE: &str = "chart_2_streams_by_year.svg";
pub const DISTRIBUTION_FILE: &str = "chart_3_stream_distribution.svg";

const TOP_ARTISTS: usize = 10;
const HISTOGRAM_BINS: usize = 15;
const KDE_POINTS: usize = 200;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const FONT: &str = "sans-serif";

const BAR_COLOR: RGBColor = RGBColor(68, 1, 84);
const TEAL: RGBColor = RGBColor(0, 128, 128);

/// Magma palette stops, dark to light.
const MAGMA: [(u8, u8, u8); 5] = [
    (0, 0, 4),
    (81, 18, 124),
    (183, 55, 121),
    (252, 137, 97),
    (252, 253, 191),
];

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Paths of the three charts written by one run.
#[derive(Debug, Clone)]
pub struct ChartFiles {
    pub artists: PathBuf,
    pub streams_by_year: PathBuf,
    pub distribution: PathBuf,
}

/// Render the three summary charts into `out_dir` as SVG images, overwriting earlier ones.
///
/// Charts are written in order; the first failure stops the rest.
pub fn render_charts(records: &[SongRecord], out_dir: &Path) -> Result<ChartFiles> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let files = ChartFiles {
        artists: out_dir.join(ARTISTS_FILE),
        streams_by_year: out_dir.join(STREAMS_BY_YEAR_FILE),
        distribution: out_dir.join(DISTRIBUTION_FILE),
    };

    let top = stats::top_artists(records, TOP_ARTISTS);
    write_chart(&files.artists, |root| artists_chart(root, &top))?;

    write_chart(&files.streams_by_year, |root| streams_by_year_chart(root, records))?;

    let streams: Vec<f64> = records.iter().map(|r| r.streams_billions).collect();
    write_chart(&files.distribution, |root| distribution_chart(root, &streams))?;

    Ok(files)
}

fn write_chart<F>(path: &Path, draw: F) -> Result<()>
where
    F: FnOnce(&Area) -> Result<()>,
{
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    draw(&root)?;
    root.present()
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote chart");
    Ok(())
}

/// Horizontal bars, most frequent artist on top.
fn artists_chart(root: &Area, top: &[ArtistCount]) -> Result<()> {
    // Row 0 is drawn at the bottom, so the list is laid out in reverse.
    let names: Vec<&str> = top.iter().rev().map(|c| c.artist.as_str()).collect();
    let max_count = top.iter().map(|c| c.count).max().unwrap_or(0) as f64;
    let rows = names.len().max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption("Top 10 Artists", (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..max_count + 1.0, -0.5f64..rows - 0.5)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(names.len().max(1))
        .y_label_formatter(&|y| row_label(&names, *y))
        .x_label_formatter(&|x| format!("{x:.0}"))
        .x_desc("Songs in ranking")
        .y_desc("Artist")
        .draw()?;

    chart.draw_series(top.iter().rev().enumerate().map(|(row, c)| {
        let y = row as f64;
        Rectangle::new([(0.0, y - 0.4), (c.count as f64, y + 0.4)], BAR_COLOR.filled())
    }))?;
    Ok(())
}

/// Name for an integer row position; blank between rows.
fn row_label(names: &[&str], y: f64) -> String {
    let row = y.round();
    if (y - row).abs() > 1e-6 || row < 0.0 {
        return String::new();
    }
    names.get(row as usize).map(|n| n.to_string()).unwrap_or_default()
}

/// Streams against release year, points shaded by stream count.
fn streams_by_year_chart(root: &Area, records: &[SongRecord]) -> Result<()> {
    let years: Vec<f64> = records.iter().map(|r| r.year as f64).collect();
    let streams: Vec<f64> = records.iter().map(|r| r.streams_billions).collect();
    let (year_lo, year_hi) = stats::min_max(&years).unwrap_or((2000.0, 2020.0));
    let (streams_lo, streams_hi) = stats::min_max(&streams).unwrap_or((0.0, 1.0));

    let mut chart = ChartBuilder::on(root)
        .caption("Streams by Year", (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(year_lo - 1.0..year_hi + 1.0, 0f64..streams_hi * 1.1 + 0.1)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x| format!("{x:.0}"))
        .x_desc("Release year")
        .y_desc("Streams (billions)")
        .draw()?;

    chart.draw_series(years.iter().zip(&streams).map(|(&year, &s)| {
        let t = if streams_hi > streams_lo {
            (s - streams_lo) / (streams_hi - streams_lo)
        } else {
            0.5
        };
        Circle::new((year, s), 6, magma(t).mix(0.8).filled())
    }))?;
    Ok(())
}

/// Linear interpolation along the magma stops; `t` is clamped to [0, 1].
fn magma(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0) * (MAGMA.len() - 1) as f64;
    let i = (t.floor() as usize).min(MAGMA.len() - 2);
    let f = t - i as f64;
    let (a, b) = (MAGMA[i], MAGMA[i + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Histogram bars with a count-scaled density curve over them.
fn distribution_chart(root: &Area, streams: &[f64]) -> Result<()> {
    let hist = stats::histogram(streams, HISTOGRAM_BINS);
    let overlay = hist.as_ref().and_then(|h| density_overlay(streams, h));
    if hist.is_some() && overlay.is_none() {
        tracing::debug!("Not enough spread for a density overlay");
    }

    let (lo, hi) = match &hist {
        Some(h) => (h.edges[0], h.edges[h.edges.len() - 1]),
        None => (0.0, 1.0),
    };
    let max_count = hist
        .as_ref()
        .and_then(|h| h.counts.iter().max())
        .copied()
        .unwrap_or(0) as f64;
    let max_density = overlay
        .as_ref()
        .map(|(_, ys)| ys.iter().copied().fold(0.0, f64::max))
        .unwrap_or(0.0);
    let y_hi = max_count.max(max_density) * 1.1 + 1.0;

    let mut chart = ChartBuilder::on(root)
        .caption("Stream Distribution", (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Streams (billions)")
        .y_desc("Songs")
        .draw()?;

    if let Some(h) = &hist {
        chart.draw_series(h.counts.iter().zip(h.edges.windows(2)).map(|(&count, edge)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], TEAL.mix(0.6).filled())
        }))?;
    }
    if let Some((xs, ys)) = overlay {
        chart.draw_series(LineSeries::new(xs.into_iter().zip(ys), TEAL.stroke_width(2)))?;
    }
    Ok(())
}

/// KDE curve across the histogram range, scaled from density to bin counts.
fn density_overlay(values: &[f64], hist: &Histogram) -> Option<(Vec<f64>, Vec<f64>)> {
    let lo = *hist.edges.first()?;
    let hi = *hist.edges.last()?;
    let grid = stats::linspace(lo, hi, KDE_POINTS);
    let scale = values.len() as f64 * hist.bin_width();
    let density = stats::gaussian_kde(values, &grid)?;
    Some((grid, density.into_iter().map(|d| d * scale).collect()))
}
