//! Directed route segments over shared way geometry.

use std::sync::Arc;

use crate::{Point31, RouteKey};

/// Bits reserved below the way id inside a segment id.
const WAY_ID_SHIFT: u32 = 7;

/// One directed edge of a route relation: a slice of a way's point array,
/// walked from `start` to `end`.
///
/// The id is direction-independent (the underlying way id shifted left by
/// seven bits), so both directions of the same way hash to the same id and
/// a path can never contain the same way twice. Geometry is shared through
/// an [`Arc`]; each segment instance is produced fresh per source query and
/// is owned by exactly one assembly run once appended to a path.
#[derive(Debug, Clone)]
pub struct RouteSegment {
    id: u64,
    start: usize,
    end: usize,
    points: Arc<[Point31]>,
    key: RouteKey,
}

impl RouteSegment {
    /// Build a segment over `points[start..=end]` of way `way_id`.
    pub fn new(
        way_id: u64,
        start: usize,
        end: usize,
        points: Arc<[Point31]>,
        key: RouteKey,
    ) -> Self {
        Self {
            id: way_id << WAY_ID_SHIFT,
            start,
            end,
            points,
            key,
        }
    }

    /// Direction-independent segment id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The underlying OSM way id.
    pub fn way_id(&self) -> u64 {
        self.id >> WAY_ID_SHIFT
    }

    /// Index of the first point of the walk.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the last point of the walk.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The route relation this segment belongs to.
    pub fn route_key(&self) -> &RouteKey {
        &self.key
    }

    /// Full point array of the underlying way.
    pub fn points(&self) -> &[Point31] {
        &self.points
    }

    /// Tile coordinate the walk starts at.
    pub fn start_point(&self) -> Point31 {
        self.points[self.start]
    }

    /// Tile coordinate the walk ends at.
    pub fn end_point(&self) -> Point31 {
        self.points[self.end]
    }

    /// The same segment walked in the opposite direction.
    ///
    /// Swaps the start/end indices; no new identity is minted.
    pub fn inverse(&self) -> Self {
        Self {
            id: self.id,
            start: self.end,
            end: self.start,
            points: Arc::clone(&self.points),
            key: self.key.clone(),
        }
    }
}
