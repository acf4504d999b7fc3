use crate::fetcher::CatalogFetcher;
use crate::provider::{BerryProvider, PokeApiProvider};
use crate::render::{ArtifactLocation, HistogramRenderer, RenderOutcome};
use crate::stats::{StatisticsAggregator, StatisticsReport};
use berry_stats_common::{BerryAttribute, BerryStatsError, Config, Result};
use tracing::info;

/// fetch → aggregate (→ render), run fresh for every request
pub struct BerryStats<P> {
    fetcher: CatalogFetcher<P>,
    aggregator: StatisticsAggregator,
}

impl BerryStats<PokeApiProvider> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = PokeApiProvider::new(&config.provider)?;
        Ok(Self::new(
            CatalogFetcher::new(provider, config.provider.page_size),
            StatisticsAggregator::from_config(&config.stats),
        ))
    }
}

impl<P: BerryProvider> BerryStats<P> {
    pub fn new(fetcher: CatalogFetcher<P>, aggregator: StatisticsAggregator) -> Self {
        Self { fetcher, aggregator }
    }

    pub fn fetcher(&self) -> &CatalogFetcher<P> {
        &self.fetcher
    }

    pub fn statistics(&self) -> Result<StatisticsReport> {
        let catalog = self.fetcher.fetch_all()?;
        let report = self.aggregator.compute(&catalog)?;
        info!(berries = report.berry_names.len(), attributes = report.attributes.len(), "statistics computed");
        Ok(report)
    }

    /// Renders the histogram of `attribute` unless the artifact already exists,
    /// in which case nothing is fetched.
    pub fn histogram(
        &self,
        attribute: BerryAttribute,
        renderer: &HistogramRenderer,
        location: &ArtifactLocation,
    ) -> Result<RenderOutcome> {
        if location.exists() {
            return Ok(RenderOutcome::AlreadyPresent);
        }
        let catalog = self.fetcher.fetch_all()?;
        let aggregator = StatisticsAggregator::new(vec![attribute], self.aggregator.bins());
        let report = aggregator.compute(&catalog)?;
        let stats = report.attribute(attribute).ok_or_else(|| {
            BerryStatsError::Render(format!("no statistics computed for {attribute}"))
        })?;
        renderer.render_stats(stats, aggregator.bins(), location)
    }
}
