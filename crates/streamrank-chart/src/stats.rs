use std::collections::HashMap;
use std::f64::consts::PI;
use streamrank_model::SongRecord;

/// How many times an artist appears in the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistCount {
    pub artist: String,
    pub count: usize,
}

/// The `n` most frequent artists, most frequent first.
///
/// Ties keep the order in which the artists first appear in `records`.
pub fn top_artists(records: &[SongRecord], n: usize) -> Vec<ArtistCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ArtistCount> = Vec::new();

    for record in records {
        match index.get(record.artist.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(&record.artist, counts.len());
                counts.push(ArtistCount {
                    artist: record.artist.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort, so first-appearance order survives among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Equal-width bin counts over a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

/// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// Bins are half-open except the last, which also holds `max`. A sample with
/// a single distinct value is centred in a unit-wide range. Returns `None`
/// for an empty sample or zero bins.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let (mut lo, mut hi) = min_max(values)?;
    if bins == 0 {
        return None;
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0; bins];
    for &v in values {
        let bin = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Scott's rule bandwidth for a Gaussian KDE: `σ · n^(-1/5)`, σ the sample standard deviation.
///
/// `None` when fewer than two values or no spread.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = var.sqrt();
    (std > 0.0).then(|| std * (n as f64).powf(-0.2))
}

/// Gaussian kernel density of `values` at each point of `grid`.
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    let h = scott_bandwidth(values)?;
    let norm = 1.0 / (values.len() as f64 * h * (2.0 * PI).sqrt());
    Some(
        grid.iter()
            .map(|&x| {
                values
                    .iter()
                    .map(|&xi| (-0.5 * ((x - xi) / h).powi(2)).exp())
                    .sum::<f64>()
                    * norm
            })
            .collect(),
    )
}

/// `n` evenly spaced points from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

pub(crate) fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
