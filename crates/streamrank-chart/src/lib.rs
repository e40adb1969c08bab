pub mod charts;
pub mod stats;

pub use charts::{render_charts, ChartFiles, ARTISTS_FILE, DISTRIBUTION_FILE, STREAMS_BY_YEAR_FILE};
