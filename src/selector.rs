//! Route selection entry point: seeds, filtering, and per-key assembly.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::assembler::{Assembler, GreedyFirstMatch, GrowthStrategy};
use crate::error::{Result, StitchError};
use crate::track::TrackBuilder;
use crate::{Point31, RouteKey, RouteTrack, RouteType, SegmentSource, SelectorConfig};

/// Optional allow-lists narrowing which route relations are processed.
///
/// `None` means unrestricted; when both lists are present a key must satisfy
/// both.
#[derive(Debug, Clone, Default)]
pub struct SelectorFilter {
    pub key_filter: Option<HashSet<RouteKey>>,
    pub type_filter: Option<HashSet<RouteType>>,
}

impl SelectorFilter {
    /// Whether `key` passes both allow-lists.
    pub fn allows(&self, key: &RouteKey) -> bool {
        if let Some(keys) = &self.key_filter {
            if !keys.contains(key) {
                return false;
            }
        }
        if let Some(types) = &self.type_filter {
            if !types.contains(&key.route_type()) {
                return false;
            }
        }
        true
    }
}

/// Assembles a full track per route relation touching a queried feature.
pub struct RouteSelector<S> {
    source: S,
    filter: SelectorFilter,
    config: SelectorConfig,
    strategy: Box<dyn GrowthStrategy>,
}

impl<S: SegmentSource> RouteSelector<S> {
    /// Selector over `source` with default configuration, no filtering and
    /// the greedy first-match growth strategy.
    pub fn new(source: S) -> Self {
        Self {
            source,
            filter: SelectorFilter::default(),
            config: SelectorConfig::default(),
            strategy: Box::new(GreedyFirstMatch),
        }
    }

    /// Restrict processing to keys passing `filter`.
    pub fn with_filter(mut self, filter: SelectorFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Override the traversal configuration.
    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Substitute the candidate-selection strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn GrowthStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// The underlying segment source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Assemble one track per route relation whose geometry passes through
    /// `point`.
    ///
    /// Seeds whose key is excluded by the filter are skipped before any
    /// assembly work. A source I/O failure aborts the whole call; no partial
    /// result is returned. Relations sharing geometry are assembled
    /// independently, one track per key.
    pub fn routes_at(&self, point: Point31) -> Result<HashMap<RouteKey, RouteTrack>> {
        let assembler = Assembler::new(&self.source, &self.config, self.strategy.as_ref());
        let builder = TrackBuilder::new(&self.config);

        let mut result = HashMap::new();
        for seed in self.source.segments_at(point)? {
            if !self.filter.allows(seed.route_key()) {
                debug!("skipping filtered key {}", seed.route_key());
                continue;
            }
            debug!("assembling {} from way {}", seed.route_key(), seed.way_id());
            let path = assembler.assemble(&seed)?;
            let track = builder.build(&path);
            result.insert(seed.route_key().clone(), track);
        }
        Ok(result)
    }

    /// Like [`routes_at`](Self::routes_at), assembling independent seeds in
    /// parallel. Per-run state (path, visited set) is never shared between
    /// assemblies, and the source is only read.
    #[cfg(feature = "parallel")]
    pub fn routes_at_parallel(&self, point: Point31) -> Result<HashMap<RouteKey, RouteTrack>>
    where
        S: Sync,
    {
        use rayon::prelude::*;

        let seeds: Vec<_> = self
            .source
            .segments_at(point)?
            .into_iter()
            .filter(|seed| self.filter.allows(seed.route_key()))
            .collect();

        let pairs: Result<Vec<_>> = seeds
            .par_iter()
            .map(|seed| {
                let assembler =
                    Assembler::new(&self.source, &self.config, self.strategy.as_ref());
                let builder = TrackBuilder::new(&self.config);
                let path = assembler.assemble(seed)?;
                Ok((seed.route_key().clone(), builder.build(&path)))
            })
            .collect();

        Ok(pairs?.into_iter().collect())
    }

    /// Region-seeded discovery, declared for future use and intentionally
    /// not implemented.
    pub fn routes_in_area(
        &self,
        _min: Point31,
        _max: Point31,
    ) -> Result<HashMap<RouteKey, RouteTrack>> {
        Err(StitchError::Unsupported("bounding-box route discovery"))
    }
}
