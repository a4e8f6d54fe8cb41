//! The traversal engine: grows an ordered segment path bidirectionally from
//! a seed, bounded by an iteration cap.
//!
//! Growth is greedy and non-backtracking: the first structurally valid
//! candidate wins, which keeps the traversal linear in path length and makes
//! the output deterministic exactly as far as the source's candidate order
//! is stable. The iteration cap bounds worst-case cost independent of input
//! size, trading a possibly truncated track for guaranteed termination on
//! self-intersecting or mis-modelled relation data.

use std::collections::HashSet;

use log::warn;

use crate::error::Result;
use crate::{RouteSegment, SegmentSource, SelectorConfig};

/// How many trailing way ids to include in a loop diagnostic.
const LOOP_DIAGNOSTIC_IDS: usize = 49;

/// Outcome of one candidate-selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Accept the candidate at this index in the source's list.
    Accept(usize),
    /// Stop growing in this direction.
    Stop,
}

/// Pluggable single-candidate selection.
///
/// The growth/termination skeleton is fixed; only the choice among the
/// source's candidates varies. Alternative tie-breaks (bearing continuity,
/// for instance) can be substituted without touching the traversal.
pub trait GrowthStrategy: Send + Sync {
    /// Pick a candidate to extend the path with, or stop.
    ///
    /// `frontier` is the path's last element (growth happens at its end
    /// point), `opposite` its first. `visited` holds the ids of every
    /// segment accepted so far in this run.
    fn choose(
        &self,
        frontier: &RouteSegment,
        opposite: &RouteSegment,
        visited: &HashSet<u64>,
        candidates: &[RouteSegment],
    ) -> Growth;
}

/// Default strategy: first candidate matching the frontier's route key whose
/// id differs from both path ends.
///
/// If that candidate was already visited, growth stops for the step rather
/// than falling through to later candidates. An already-visited first match
/// means the traversal has wrapped onto itself, and continuing past it risks
/// stitching unrelated branches together.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyFirstMatch;

impl GrowthStrategy for GreedyFirstMatch {
    fn choose(
        &self,
        frontier: &RouteSegment,
        opposite: &RouteSegment,
        visited: &HashSet<u64>,
        candidates: &[RouteSegment],
    ) -> Growth {
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.route_key() == frontier.route_key()
                && candidate.id() != frontier.id()
                && candidate.id() != opposite.id()
            {
                if visited.contains(&candidate.id()) {
                    return Growth::Stop;
                }
                return Growth::Accept(i);
            }
        }
        Growth::Stop
    }
}

/// Assembles one ordered segment path per seed.
pub struct Assembler<'a, S> {
    source: &'a S,
    config: &'a SelectorConfig,
    strategy: &'a dyn GrowthStrategy,
}

impl<'a, S: SegmentSource> Assembler<'a, S> {
    pub fn new(source: &'a S, config: &'a SelectorConfig, strategy: &'a dyn GrowthStrategy) -> Self {
        Self {
            source,
            config,
            strategy,
        }
    }

    /// Grow a full path from `seed`, backward then forward.
    ///
    /// The path starts as `[seed.inverse()]` so the backward phase extends
    /// from the seed's start point; it is then reversed and every element
    /// inverted, restoring the seed's orientation before the forward phase.
    /// Both phases share one iteration counter capped at
    /// `config.max_iterations`; a phase that stops because no candidate
    /// matched (the natural stop) resets the counter. A counter that was
    /// never reset means a suspected loop: a diagnostic is logged and the
    /// partial path is accepted as-is.
    pub fn assemble(&self, seed: &RouteSegment) -> Result<Vec<RouteSegment>> {
        let mut path = vec![seed.inverse()];
        let mut visited: HashSet<u64> = HashSet::new();

        let mut iterations: u32 = 0;
        while iterations < self.config.max_iterations {
            iterations += 1;
            if !self.grow(&mut path, &mut visited, false)?
                && !self.grow(&mut path, &mut visited, true)?
            {
                iterations = 0;
                break;
            }
        }

        path.reverse();
        for segment in path.iter_mut() {
            *segment = segment.inverse();
        }

        while iterations < self.config.max_iterations {
            iterations += 1;
            if !self.grow(&mut path, &mut visited, false)?
                && !self.grow(&mut path, &mut visited, true)?
            {
                iterations = 0;
                break;
            }
        }

        if iterations != 0 {
            let recent: Vec<u64> = path[1..]
                .iter()
                .rev()
                .take(LOOP_DIAGNOSTIC_IDS)
                .map(|s| s.way_id())
                .collect();
            warn!(
                "route likely has a loop: {} iterations {} recent way ids {:?}",
                seed.route_key(),
                iterations,
                recent
            );
        }

        Ok(path)
    }

    /// One growth step at the path's last element. Returns whether the path
    /// was extended.
    fn grow(
        &self,
        path: &mut Vec<RouteSegment>,
        visited: &mut HashSet<u64>,
        approximate: bool,
    ) -> Result<bool> {
        let (Some(frontier), Some(opposite)) = (path.last(), path.first()) else {
            return Ok(false);
        };

        let end = frontier.end_point();
        let candidates = if approximate {
            self.source.segments_near(end, self.config.gap_radius_m)?
        } else {
            self.source.segments_at(end)?
        };

        match self.strategy.choose(frontier, opposite, visited, &candidates) {
            Growth::Accept(i) => {
                let Some(accepted) = candidates.into_iter().nth(i) else {
                    return Ok(false);
                };
                // A path never contains the same undirected id twice,
                // whatever the strategy returned.
                if !visited.insert(accepted.id()) {
                    return Ok(false);
                }
                path.push(accepted);
                Ok(true)
            }
            Growth::Stop => Ok(false),
        }
    }
}
