//! Track construction: turning an assembled segment path into point-chains.

use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use serde::{Deserialize, Serialize};

use crate::{geo, GeoPoint, RouteSegment, SelectorConfig};

/// The final artifact for one route key: one or more ordered point-chains.
///
/// Chains are disjoint where the underlying relation genuinely jumps (ferry
/// crossings, mapping gaps wider than the split distance).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteTrack {
    /// Ordered point-chains; each chain is a continuous polyline.
    pub segments: Vec<Vec<GeoPoint>>,
}

impl RouteTrack {
    /// Whether the track holds no points at all.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|chain| chain.is_empty())
    }

    /// Total number of points across all chains.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|chain| chain.len()).sum()
    }

    /// Export as a GPX document with one track and one track segment per
    /// chain.
    pub fn to_gpx(&self, name: Option<String>) -> Gpx {
        let mut track = Track::new();
        track.name = name;
        for chain in &self.segments {
            let mut segment = TrackSegment::new();
            segment.points = chain
                .iter()
                .map(|p| Waypoint::new(Point::new(p.longitude, p.latitude)))
                .collect();
            track.segments.push(segment);
        }
        Gpx {
            version: GpxVersion::Gpx11,
            tracks: vec![track],
            ..Default::default()
        }
    }
}

/// Converts one forward-oriented segment path into a [`RouteTrack`].
///
/// Each segment's point range is walked from `start` to `end` inclusive,
/// stepping by +1 or -1. Distance checks apply at segment joins only (the
/// first point of a segment against the last emitted point): a join closer
/// than the dedup distance is dropped, one farther than the split distance
/// closes the current chain and opens a new one. Interior points are always
/// emitted.
pub struct TrackBuilder<'a> {
    config: &'a SelectorConfig,
}

impl<'a> TrackBuilder<'a> {
    pub fn new(config: &'a SelectorConfig) -> Self {
        Self { config }
    }

    /// Build the track for an assembled path.
    pub fn build(&self, path: &[RouteSegment]) -> RouteTrack {
        let mut track = RouteTrack::default();
        let mut chain: Vec<GeoPoint> = Vec::new();

        for segment in path {
            let step: isize = if segment.start() < segment.end() { 1 } else { -1 };
            let mut i = segment.start() as isize;
            loop {
                let point = geo::point31_to_geo(segment.points()[i as usize]);
                if i as usize == segment.start() && !chain.is_empty() {
                    // Join point: dedup or split against the last emitted
                    // point.
                    let last = chain[chain.len() - 1];
                    let dst = geo::haversine_distance(&last, &point);
                    if dst > self.config.dedup_distance_m {
                        if dst > self.config.split_distance_m {
                            track.segments.push(std::mem::take(&mut chain));
                        }
                        chain.push(point);
                    }
                } else {
                    chain.push(point);
                }
                if i as usize == segment.end() {
                    break;
                }
                i += step;
            }
        }

        if !chain.is_empty() {
            track.segments.push(chain);
        }
        track
    }
}
