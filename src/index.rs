//! In-memory segment index.
//!
//! [`SegmentIndex`] is the built-in [`SegmentSource`]: ways tagged with
//! route-relation tags are indexed at every geometry point, bucketed by
//! zoom-15 map tile. Exact lookups go through a point hash map; radius
//! lookups go through a per-tile R-tree and deliberately consult only the
//! query point's own tile (the radius lookup exists solely to bridge small
//! tile-boundary gaps).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rstar::{RTree, RTreeObject, AABB};

use crate::error::Result;
use crate::{geo, Point31, RouteKey, RouteSegment, SegmentSource};

/// Tile zoom used for bucketing indexed points (31-bit coords shifted down
/// to zoom 15).
const TILE_SHIFT: u32 = 16;

/// A raw tagged way, as decoded from map data.
///
/// `tags` is the merged tag map for the feature: named tags, type tags and
/// additional-type tags combined, later entries overwriting earlier ones
/// for a repeated tag name.
#[derive(Debug, Clone)]
pub struct RouteWay {
    pub id: u64,
    pub points: Vec<Point31>,
    pub tags: BTreeMap<String, String>,
}

impl RouteWay {
    pub fn new(id: u64, points: Vec<Point31>, tags: BTreeMap<String, String>) -> Self {
        Self { id, points, tags }
    }
}

/// Indexed way with its geometry shared and route keys resolved.
#[derive(Debug)]
struct StoredWay {
    way_id: u64,
    points: Arc<[Point31]>,
    keys: Vec<RouteKey>,
}

/// One indexed geometry point, positioned in 31-bit coordinate space.
#[derive(Debug, Clone, PartialEq)]
struct IndexedPoint {
    point: Point31,
    way_slot: usize,
    point_index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x as f64, self.point.y as f64])
    }
}

fn tile_id(p: Point31) -> u64 {
    ((p.x >> TILE_SHIFT) as u64) << 32 | (p.y >> TILE_SHIFT) as u64
}

/// In-memory spatial index over route-tagged ways.
///
/// Read-only once populated; all lookups take `&self`, so one index can back
/// any number of concurrent assembly runs.
#[derive(Debug, Default)]
pub struct SegmentIndex {
    ways: Vec<StoredWay>,
    exact: HashMap<Point31, Vec<(usize, usize)>>,
    tiles: HashMap<u64, RTree<IndexedPoint>>,
}

impl SegmentIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one tagged way. Ways carrying no route-relation tags are
    /// ignored.
    pub fn add_way(&mut self, way: RouteWay) {
        let keys = RouteKey::from_tags(&way.tags);
        if keys.is_empty() || way.points.is_empty() {
            return;
        }
        let way_slot = self.ways.len();
        let points: Arc<[Point31]> = way.points.into();
        for (point_index, point) in points.iter().copied().enumerate() {
            self.exact
                .entry(point)
                .or_default()
                .push((way_slot, point_index));
            self.tiles
                .entry(tile_id(point))
                .or_insert_with(RTree::new)
                .insert(IndexedPoint {
                    point,
                    way_slot,
                    point_index,
                });
        }
        self.ways.push(StoredWay {
            way_id: way.id,
            points,
            keys,
        });
    }

    /// Number of indexed ways.
    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    /// Emit the directed segments rooted at one indexed point: from the
    /// point toward each end of the way, once per route key on the way.
    fn push_segments(&self, way_slot: usize, point_index: usize, out: &mut Vec<RouteSegment>) {
        let way = &self.ways[way_slot];
        let last = way.points.len() - 1;
        for key in &way.keys {
            if point_index > 0 {
                out.push(RouteSegment::new(
                    way.way_id,
                    point_index,
                    0,
                    Arc::clone(&way.points),
                    key.clone(),
                ));
            }
            if point_index < last {
                out.push(RouteSegment::new(
                    way.way_id,
                    point_index,
                    last,
                    Arc::clone(&way.points),
                    key.clone(),
                ));
            }
        }
    }
}

impl SegmentSource for SegmentIndex {
    fn segments_at(&self, point: Point31) -> Result<Vec<RouteSegment>> {
        let mut out = Vec::new();
        if let Some(entries) = self.exact.get(&point) {
            for &(way_slot, point_index) in entries {
                self.push_segments(way_slot, point_index, &mut out);
            }
        }
        Ok(out)
    }

    fn segments_near(&self, point: Point31, radius_m: f64) -> Result<Vec<RouteSegment>> {
        let mut out = Vec::new();
        let Some(tree) = self.tiles.get(&tile_id(point)) else {
            return Ok(out);
        };

        let r31 = geo::radius31(radius_m, point.y);
        let envelope = AABB::from_corners(
            [point.x as f64 - r31, point.y as f64 - r31],
            [point.x as f64 + r31, point.y as f64 + r31],
        );

        let mut hits: Vec<(f64, &IndexedPoint)> = tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|ip| (geo::distance31(ip.point, point), ip))
            .filter(|(dist, _)| *dist <= radius_m)
            .collect();
        // Nearest candidates first; ties broken by insertion position for a
        // stable, reproducible order.
        hits.sort_by(|(da, a), (db, b)| {
            da.partial_cmp(db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.way_slot, a.point_index).cmp(&(b.way_slot, b.point_index)))
        });

        for (_, ip) in hits {
            self.push_segments(ip.way_slot, ip.point_index, &mut out);
        }
        Ok(out)
    }
}
