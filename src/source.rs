//! Collaborator contract for segment lookup.

use crate::error::Result;
use crate::{Point31, RouteSegment};

/// Source of route segments around a coordinate.
///
/// Implementations resolve the [`RouteKey`](crate::RouteKey) and endpoint
/// geometry before returning, so the assembler never touches raw map data.
/// The order segments are returned in is significant: growth is greedy and
/// accepts the first structurally valid candidate, so output is
/// deterministic exactly insofar as this order is stable.
pub trait SegmentSource {
    /// Segments whose geometry passes through `point` exactly.
    fn segments_at(&self, point: Point31) -> Result<Vec<RouteSegment>>;

    /// Segments within `radius_m` meters of `point`.
    ///
    /// Only guaranteed correct when the candidate lies in the same spatial
    /// tile as the query point. This is a deliberate compromise: the lookup
    /// exists to bridge small gaps at tile boundaries, not to be a general
    /// nearest-neighbour query.
    fn segments_near(&self, point: Point31, radius_m: f64) -> Result<Vec<RouteSegment>>;
}
