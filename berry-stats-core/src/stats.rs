use crate::histogram::{build_histogram, HistogramBin};
use crate::record::BerryRecord;
use berry_stats_common::{BerryAttribute, BerryStatsError, Result, StatsConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: f64,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeStats {
    pub attribute: BerryAttribute,
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// sample variance (n - 1); 0.0 for a single value
    pub variance: f64,
    /// distinct values ascending
    pub frequency: Vec<FrequencyEntry>,
    pub histogram: Vec<HistogramBin>,
}

impl AttributeStats {
    /// `None` for an empty slice. Values are sorted before any reduction so the
    /// result does not depend on input order.
    pub fn from_values(attribute: BerryAttribute, values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        let variance = if n > 1 {
            sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        Some(Self {
            attribute,
            count: n as u64,
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            variance,
            frequency: frequency_table(&sorted),
            histogram: build_histogram(&sorted, bins),
        })
    }
}

fn frequency_table(sorted: &[f64]) -> Vec<FrequencyEntry> {
    let total = sorted.len() as f64;
    let mut out: Vec<FrequencyEntry> = Vec::new();
    for &v in sorted {
        match out.last_mut() {
            Some(last) if last.value == v => last.count += 1,
            _ => out.push(FrequencyEntry { value: v, count: 1, percentage: 0.0 }),
        }
    }
    for e in &mut out {
        e.percentage = e.count as f64 / total * 100.0;
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// sorted ascending
    pub berry_names: Vec<String>,
    pub attributes: BTreeMap<BerryAttribute, AttributeStats>,
}

impl StatisticsReport {
    pub fn attribute(&self, attribute: BerryAttribute) -> Option<&AttributeStats> {
        self.attributes.get(&attribute)
    }

    /// flat key/value document: `berries_names`, `min_<attr>`, `median_<attr>`, ...
    pub fn to_document(&self) -> serde_json::Value {
        let mut doc = serde_json::Map::new();
        doc.insert("berries_names".into(), serde_json::json!(self.berry_names));
        for (attr, s) in &self.attributes {
            doc.insert(format!("min_{attr}"), number(s.min));
            doc.insert(format!("median_{attr}"), number(s.median));
            doc.insert(format!("max_{attr}"), number(s.max));
            doc.insert(format!("variance_{attr}"), serde_json::json!(s.variance));
            doc.insert(format!("mean_{attr}"), serde_json::json!(s.mean));
            let freq: serde_json::Map<String, serde_json::Value> = s
                .frequency
                .iter()
                .map(|e| (e.value.to_string(), serde_json::json!(e.count)))
                .collect();
            doc.insert(format!("frequency_{attr}"), serde_json::Value::Object(freq));
        }
        serde_json::Value::Object(doc)
    }
}

/// integral values as JSON integers (`5`, not `5.0`), everything else as floats
fn number(v: f64) -> serde_json::Value {
    // 2^53: beyond this f64 no longer holds every integer exactly
    if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
        serde_json::json!(v as i64)
    } else {
        serde_json::json!(v)
    }
}

pub struct StatisticsAggregator {
    attributes: Vec<BerryAttribute>,
    bins: usize,
}

impl StatisticsAggregator {
    pub fn new(attributes: Vec<BerryAttribute>, bins: usize) -> Self {
        Self { attributes, bins: bins.max(1) }
    }

    pub fn from_config(config: &StatsConfig) -> Self {
        Self::new(config.attributes.clone(), config.histogram_bins)
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn compute(&self, catalog: &[BerryRecord]) -> Result<StatisticsReport> {
        if catalog.is_empty() {
            return Err(BerryStatsError::EmptyCatalog);
        }
        let mut berry_names: Vec<String> = catalog.iter().map(|r| r.name.clone()).collect();
        berry_names.sort();
        let mut attributes = BTreeMap::new();
        for &attr in &self.attributes {
            let values: Vec<f64> = catalog.iter().map(|r| r.value(attr)).collect();
            if let Some(stats) = AttributeStats::from_values(attr, &values, self.bins) {
                attributes.insert(attr, stats);
            }
        }
        Ok(StatisticsReport { berry_names, attributes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berry(name: &str, growth_time: u32) -> BerryRecord {
        BerryRecord {
            name: name.into(),
            growth_time,
            max_harvest: 5,
            natural_gift_power: 60,
            size: growth_time * 10,
            smoothness: 25,
            soil_dryness: 15,
        }
    }

    fn growth(catalog: &[BerryRecord], bins: usize) -> AttributeStats {
        let report = StatisticsAggregator::new(vec![BerryAttribute::GrowthTime], bins)
            .compute(catalog)
            .unwrap();
        report.attribute(BerryAttribute::GrowthTime).unwrap().clone()
    }

    #[test]
    fn three_berry_example() {
        let s = growth(&[berry("a", 5), berry("b", 10), berry("c", 15)], 3);
        assert_eq!((s.count, s.min, s.max, s.mean), (3, 5.0, 15.0, 10.0));
        assert_eq!(s.histogram.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1, 1]);
        assert_eq!(s.median, 10.0);
        assert_eq!(s.variance, 25.0);
    }

    #[test]
    fn empty_catalog_is_error() {
        let err = StatisticsAggregator::new(vec![BerryAttribute::GrowthTime], 10).compute(&[]).unwrap_err();
        assert!(matches!(err, BerryStatsError::EmptyCatalog));
    }

    #[test]
    fn single_berry() {
        let s = growth(&[berry("solo", 8)], 10);
        assert_eq!((s.min, s.max, s.mean, s.median, s.variance), (8.0, 8.0, 8.0, 8.0, 0.0));
        assert_eq!(s.histogram.len(), 1);
        assert_eq!(s.histogram[0].count, 1);
    }

    #[test]
    fn even_count_median_and_frequency() {
        let s = growth(&[berry("a", 3), berry("b", 3), berry("c", 5), berry("d", 12)], 4);
        assert_eq!(s.median, 4.0);
        let freq: Vec<_> = s.frequency.iter().map(|e| (e.value, e.count)).collect();
        assert_eq!(freq, vec![(3.0, 2), (5.0, 1), (12.0, 1)]);
        assert_eq!(s.frequency[0].percentage, 50.0);
    }

    #[test]
    fn names_sorted_and_all_attributes_tracked() {
        let report = StatisticsAggregator::new(BerryAttribute::ALL.to_vec(), 5)
            .compute(&[berry("oran", 4), berry("cheri", 3)])
            .unwrap();
        assert_eq!(report.berry_names, vec!["cheri", "oran"]);
        assert_eq!(report.attributes.len(), BerryAttribute::ALL.len());
        assert_eq!(report.attribute(BerryAttribute::Size).unwrap().max, 40.0);
    }

    #[test]
    fn document_uses_flat_keys() {
        let report = StatisticsAggregator::new(vec![BerryAttribute::GrowthTime], 3)
            .compute(&[berry("a", 5), berry("b", 10), berry("c", 5)])
            .unwrap();
        let doc = report.to_document();
        assert_eq!(doc["berries_names"], serde_json::json!(["a", "b", "c"]));
        assert_eq!(doc["max_growth_time"], serde_json::json!(10));
        assert_eq!(doc["frequency_growth_time"]["5"], serde_json::json!(2));
        assert!(doc.get("variance_growth_time").is_some());
    }

    #[test]
    fn document_keeps_integral_extrema_as_integers() {
        let report = StatisticsAggregator::new(vec![BerryAttribute::GrowthTime], 3)
            .compute(&[berry("a", 5), berry("b", 6), berry("c", 8), berry("d", 15)])
            .unwrap();
        let doc = report.to_document();
        assert_eq!(doc["min_growth_time"].as_u64(), Some(5));
        assert_eq!(doc["max_growth_time"].as_u64(), Some(15));
        // (6 + 8) / 2 is integral, the mean 8.5 is not
        assert_eq!(doc["median_growth_time"].as_u64(), Some(7));
        assert_eq!(doc["mean_growth_time"].as_f64(), Some(8.5));

        let pair = StatisticsAggregator::new(vec![BerryAttribute::GrowthTime], 3)
            .compute(&[berry("a", 5), berry("b", 6)])
            .unwrap()
            .to_document();
        assert_eq!(pair["median_growth_time"], serde_json::json!(5.5));
    }
}
