use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub range_start: f64,
    pub range_end: f64,
    pub count: u64,
}

/// Equal-width bins over `[min, max]`. Bins are `[start, end)` except the last,
/// which is closed so it holds the maximum. A zero-width range collapses to a
/// single bin.
pub fn build_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }
    let bins = bins.max(1);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == min || bins == 1 {
        return vec![HistogramBin { range_start: min, range_end: max, count: values.len() as u64 }];
    }
    let width = (max - min) / bins as f64;
    let edge = |i: usize| if i == bins { max } else { min + (max - min) * i as f64 / bins as f64 };
    let mut counts = vec![0u64; bins];
    for &v in values {
        counts[bin_index(v, min, width, bins, &edge)] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| HistogramBin { range_start: edge(i), range_end: edge(i + 1), count: c })
        .collect()
}

fn bin_index(v: f64, min: f64, width: f64, bins: usize, edge: &impl Fn(usize) -> f64) -> usize {
    let mut idx = (((v - min) / width) as usize).min(bins - 1);
    // division can land one off an exact edge; settle against the reported edges
    while idx + 1 < bins && v >= edge(idx + 1) {
        idx += 1;
    }
    while idx > 0 && v < edge(idx) {
        idx -= 1;
    }
    idx
}
