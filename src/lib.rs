//! # Route Stitch
//!
//! Assembles named hiking/cycling/horse/MTB route relations from tagged OSM
//! way segments into continuous geographic tracks.
//!
//! This library provides:
//! - Route-relation identity extraction from flattened feature tags
//! - Bounded bidirectional path growth with greedy branch selection
//! - Loop detection under a hard iteration cap, recovered best-effort
//! - Gap tolerance across map-tile boundaries via radius lookup
//! - Track building with join de-duplication and gap splitting
//! - GPX export of the assembled tracks
//!
//! ## Features
//!
//! - **`parallel`** - Assemble independent route keys in parallel with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use routestitch::{Point31, RouteSelector, RouteWay, SegmentIndex};
//!
//! let mut tags = BTreeMap::new();
//! tags.insert("route_hiking_1".to_string(), String::new());
//! tags.insert("route_hiking_1_ref".to_string(), "E5".to_string());
//!
//! let mut index = SegmentIndex::new();
//! index.add_way(RouteWay::new(
//!     42,
//!     vec![
//!         Point31::new(1 << 29, 1 << 30),
//!         Point31::new((1 << 29) + 600, 1 << 30),
//!     ],
//!     tags,
//! ));
//!
//! let selector = RouteSelector::new(index);
//! let routes = selector.routes_at(Point31::new(1 << 29, 1 << 30))?;
//! assert_eq!(routes.len(), 1);
//! # Ok::<(), routestitch::StitchError>(())
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, StitchError};

// Geographic utilities (tile-coordinate conversion, distance)
pub mod geo;

// Route-relation identity (RouteType, RouteKey, tag extraction)
pub mod route_key;
pub use route_key::{RouteKey, RouteType, ROUTE_KEY_VALUE_SEPARATOR};

// Directed edges over shared way geometry
pub mod segment;
pub use segment::RouteSegment;

// Collaborator contract for segment lookup
pub mod source;
pub use source::SegmentSource;

// Built-in in-memory segment index
pub mod index;
pub use index::{RouteWay, SegmentIndex};

// The traversal engine
pub mod assembler;
pub use assembler::{Assembler, GreedyFirstMatch, Growth, GrowthStrategy};

// Track construction and GPX export
pub mod track;
pub use track::{RouteTrack, TrackBuilder};

// Selection entry point and filtering
pub mod selector;
pub use selector::{RouteSelector, SelectorFilter};

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// An integer-encoded map coordinate: the Web Mercator square divided into
/// 2^31 units per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point31 {
    pub x: u32,
    pub y: u32,
}

impl Point31 {
    /// Create a new tile-encoded point.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Convert to latitude/longitude.
    pub fn to_geo(self) -> GeoPoint {
        geo::point31_to_geo(self)
    }

    /// Convert from latitude/longitude.
    pub fn from_geo(point: &GeoPoint) -> Self {
        geo::geo_to_point31(point)
    }
}

/// Configuration for route assembly and track building.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Hard cap on growth iterations per assembly run, shared across both
    /// growth directions. Bounds worst-case cost on pathological
    /// (self-intersecting or mis-modelled) relation data.
    /// Default: 16000
    pub max_iterations: u32,

    /// Radius in meters for the approximate lookup used when exact growth
    /// fails, bridging small gaps at tile boundaries.
    /// Default: 30.0
    pub gap_radius_m: f64,

    /// Join distance in meters beyond which the current point-chain is
    /// closed and a new one started.
    /// Default: 20.0
    pub split_distance_m: f64,

    /// Join distance in meters below which a point is dropped as a
    /// degenerate duplicate.
    /// Default: 1.0
    pub dedup_distance_m: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 16000,
            gap_radius_m: 30.0,
            split_distance_m: 20.0,
            dedup_distance_m: 1.0,
        }
    }
}
