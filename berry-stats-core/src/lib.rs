pub mod export;
pub mod fetcher;
pub mod histogram;
pub mod pipeline;
pub mod provider;
pub mod record;
pub mod render;
pub mod stats;

pub use berry_stats_common::{BerryAttribute, BerryStatsError, Result};
pub use export::{export_json, print_summary};
pub use fetcher::{CatalogFetcher, Pages};
pub use histogram::{build_histogram, HistogramBin};
pub use pipeline::BerryStats;
pub use provider::{BerryProvider, BerryRef, ListingPage, PokeApiProvider};
pub use record::{BerryRecord, Catalog};
pub use render::{ArtifactLocation, ChartStyle, HistogramRenderer, RenderOutcome};
pub use stats::{AttributeStats, FrequencyEntry, StatisticsAggregator, StatisticsReport};
