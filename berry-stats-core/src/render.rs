//! PNG histogram rendering with `plotters`.
//!
//! The artifact is regenerated only when absent. Drawing goes to a temporary
//! file beside the target, which is then moved into place without clobbering,
//! so a failed render never leaves a partial image and a racing writer that
//! finishes first simply wins.

use crate::histogram::{build_histogram, HistogramBin};
use crate::stats::AttributeStats;
use berry_stats_common::{BerryStatsError, HistogramConfig, Result};
use plotters::prelude::*;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// where the rendered histogram lives; its existence is the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    path: PathBuf,
}

impl ArtifactLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    AlreadyPresent,
}

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
}

impl ChartStyle {
    pub fn from_config(config: &HistogramConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            title: config.title(),
            x_label: config.attribute.to_string(),
        }
    }
}

pub struct HistogramRenderer {
    style: ChartStyle,
    // serialises check-then-write within the process
    guard: Mutex<()>,
}

impl HistogramRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style, guard: Mutex::new(()) }
    }

    pub fn from_config(config: &HistogramConfig) -> Self {
        Self::new(ChartStyle::from_config(config))
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn render(&self, bins: &[HistogramBin], location: &ArtifactLocation) -> Result<RenderOutcome> {
        let _held = self.guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if location.exists() {
            debug!(path = %location.path().display(), "histogram already present");
            return Ok(RenderOutcome::AlreadyPresent);
        }
        validate_bins(bins)?;
        let dir = location.dir();
        std::fs::create_dir_all(dir).map_err(|e| render_err(dir, e))?;
        let tmp = tempfile::Builder::new()
            .prefix(".histogram-")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(|e| render_err(dir, e))?;
        draw_bars(tmp.path(), bins, &self.style)?;
        match tmp.persist_noclobber(location.path()) {
            Ok(_) => {
                info!(path = %location.path().display(), bins = bins.len(), "histogram rendered");
                Ok(RenderOutcome::Rendered)
            }
            // another process got there first; its file stands
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(RenderOutcome::AlreadyPresent),
            Err(e) => Err(render_err(location.path(), e.error)),
        }
    }

    /// renders the bucket table of `stats`, checking it against the report first
    pub fn render_stats(
        &self,
        stats: &AttributeStats,
        expected_bins: usize,
        location: &ArtifactLocation,
    ) -> Result<RenderOutcome> {
        let n = stats.histogram.len();
        // a zero-width range legitimately collapses to one bucket
        if n != expected_bins && !(n == 1 && stats.min == stats.max) {
            return Err(BerryStatsError::Render(format!(
                "bucket count mismatch for {}: expected {expected_bins}, got {n}",
                stats.attribute
            )));
        }
        let total: u64 = stats.histogram.iter().map(|b| b.count).sum();
        if total != stats.count {
            return Err(BerryStatsError::Render(format!(
                "bucket counts for {} sum to {total}, expected {}",
                stats.attribute, stats.count
            )));
        }
        self.render(&stats.histogram, location)
    }

    pub fn render_values(&self, values: &[f64], bins: usize, location: &ArtifactLocation) -> Result<RenderOutcome> {
        self.render(&build_histogram(values, bins), location)
    }
}

fn render_err(path: &Path, e: std::io::Error) -> BerryStatsError {
    BerryStatsError::Render(format!("{}: {e}", path.display()))
}

fn validate_bins(bins: &[HistogramBin]) -> Result<()> {
    if bins.is_empty() {
        return Err(BerryStatsError::Render("no buckets to render".into()));
    }
    for (i, b) in bins.iter().enumerate() {
        if !b.range_start.is_finite() || !b.range_end.is_finite() || b.range_end < b.range_start {
            return Err(BerryStatsError::Render(format!(
                "bucket {i} has invalid range [{}, {}]",
                b.range_start, b.range_end
            )));
        }
    }
    for (i, pair) in bins.windows(2).enumerate() {
        if pair[0].range_end != pair[1].range_start {
            return Err(BerryStatsError::Render(format!(
                "buckets {i} and {} are not contiguous",
                i + 1
            )));
        }
    }
    Ok(())
}

fn draw_bars(path: &Path, bins: &[HistogramBin], style: &ChartStyle) -> Result<()> {
    let draw_err = |e: String| BerryStatsError::Render(format!("drawing {}: {e}", path.display()));

    let mut x_lo = bins[0].range_start;
    let mut x_hi = bins[bins.len() - 1].range_end;
    if x_hi <= x_lo {
        x_lo -= 0.5;
        x_hi += 0.5;
    }
    let y_hi = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&style.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)
        .map_err(|e| draw_err(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc("berries")
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| draw_err(e.to_string()))?;

    chart
        .draw_series(bins.iter().map(|b| {
            let (start, end) = if b.range_end > b.range_start {
                (b.range_start, b.range_end)
            } else {
                (x_lo, x_hi)
            };
            Rectangle::new([(start, 0.0), (end, b.count as f64)], BLUE.mix(0.7).filled())
        }))
        .map_err(|e| draw_err(e.to_string()))?;

    root.present().map_err(|e| draw_err(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use berry_stats_common::BerryAttribute;

    fn renderer() -> HistogramRenderer {
        HistogramRenderer::new(ChartStyle {
            width: 320,
            height: 240,
            title: "growth_time histogram".into(),
            x_label: "growth_time".into(),
        })
    }

    #[test]
    fn renders_png_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let loc = ArtifactLocation::new(dir.path().join("imgs").join("histogram.png"));
        let outcome = renderer().render_values(&[5.0, 10.0, 15.0], 3, &loc).unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered);
        let bytes = std::fs::read(loc.path()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn existing_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let loc = ArtifactLocation::new(dir.path().join("histogram.png"));
        std::fs::write(loc.path(), b"placeholder").unwrap();
        let outcome = renderer().render(&[], &loc).unwrap();
        assert_eq!(outcome, RenderOutcome::AlreadyPresent);
        assert_eq!(std::fs::read(loc.path()).unwrap(), b"placeholder");
    }

    #[test]
    fn degenerate_single_bucket_renders() {
        let dir = tempfile::tempdir().unwrap();
        let loc = ArtifactLocation::new(dir.path().join("histogram.png"));
        let outcome = renderer().render_values(&[4.0], 10, &loc).unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered);
    }

    #[test]
    fn malformed_buckets_leave_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let loc = ArtifactLocation::new(dir.path().join("histogram.png"));
        let bins = vec![
            HistogramBin { range_start: 0.0, range_end: 1.0, count: 1 },
            HistogramBin { range_start: 2.0, range_end: 3.0, count: 1 },
        ];
        let err = renderer().render(&bins, &loc).unwrap_err();
        assert!(matches!(err, BerryStatsError::Render(_)));
        assert!(!loc.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn stats_with_wrong_bucket_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let loc = ArtifactLocation::new(dir.path().join("histogram.png"));
        let stats = AttributeStats::from_values(BerryAttribute::GrowthTime, &[1.0, 2.0, 3.0], 3).unwrap();
        let err = renderer().render_stats(&stats, 10, &loc).unwrap_err();
        assert!(matches!(err, BerryStatsError::Render(_)));
        assert!(!loc.exists());
    }

    #[test]
    fn unwritable_target_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let loc = ArtifactLocation::new(blocker.join("histogram.png"));
        let err = renderer().render_values(&[1.0, 2.0], 2, &loc).unwrap_err();
        assert!(matches!(err, BerryStatsError::Render(_)));
    }
}
