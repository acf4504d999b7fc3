use crate::provider::{BerryProvider, ListingPage};
use crate::record::{BerryRecord, Catalog};
use berry_stats_common::{BerryStatsError, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::iter::FusedIterator;
use tracing::{debug, info, warn};

/// lazy listing pagination; stops after the reported total, an empty page, or the first error
pub struct Pages<'a, P: ?Sized> {
    provider: &'a P,
    page_size: usize,
    offset: usize,
    total: Option<usize>,
    finished: bool,
}

impl<'a, P: BerryProvider + ?Sized> Pages<'a, P> {
    pub fn new(provider: &'a P, page_size: usize) -> Self {
        Self { provider, page_size: page_size.max(1), offset: 0, total: None, finished: false }
    }
}

impl<P: BerryProvider + ?Sized> Iterator for Pages<'_, P> {
    type Item = Result<ListingPage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.total.is_some_and(|total| self.offset >= total) {
            self.finished = true;
            return None;
        }
        match self.provider.list_page(self.offset, self.page_size) {
            Ok(page) => {
                self.total = Some(page.count);
                if page.results.is_empty() {
                    self.finished = true;
                    return None;
                }
                self.offset += page.results.len();
                Some(Ok(page))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<P: BerryProvider + ?Sized> FusedIterator for Pages<'_, P> {}

pub struct CatalogFetcher<P> {
    provider: P,
    page_size: usize,
}

impl<P: BerryProvider> CatalogFetcher<P> {
    pub fn new(provider: P, page_size: usize) -> Self {
        Self { provider, page_size }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn pages(&self) -> Pages<'_, P> {
        Pages::new(&self.provider, self.page_size)
    }

    /// fetch every berry; any failure discards what was gathered so far
    pub fn fetch_all(&self) -> Result<Catalog> {
        let mut catalog: Catalog = Vec::new();
        let mut seen = HashSet::new();
        let mut reported = 0;
        for page in self.pages() {
            let page = page?;
            reported = page.count;
            debug!(offset = catalog.len(), refs = page.results.len(), total = page.count, "listing page");
            let records: Vec<BerryRecord> = page
                .results
                .par_iter()
                .map(|r| self.provider.get_detail(r))
                .collect::<Result<_>>()?;
            for rec in records {
                if !seen.insert(rec.name.clone()) {
                    return Err(BerryStatsError::ProviderData(format!(
                        "duplicate berry name in catalog: {}",
                        rec.name
                    )));
                }
                catalog.push(rec);
            }
        }
        if catalog.len() != reported {
            warn!(fetched = catalog.len(), reported, "provider count does not match fetched berries");
        }
        info!(berries = catalog.len(), "catalog fetched");
        Ok(catalog)
    }
}
