//! Tests for the traversal engine

use std::collections::{BTreeMap, HashSet};

use routestitch::assembler::{Assembler, GreedyFirstMatch, Growth, GrowthStrategy};
use routestitch::{
    Point31, RouteSegment, RouteWay, SegmentIndex, SegmentSource, SelectorConfig,
};

/// Equator tile y coordinate.
const Y0: u32 = 1 << 30;
/// Base x coordinate.
const X0: u32 = 1 << 29;
/// Coordinate units per meter at the equator.
const UNITS_PER_M: f64 = 53.5866;

fn p(meters_east: f64) -> Point31 {
    let x = X0 as i64 + (meters_east * UNITS_PER_M).round() as i64;
    Point31::new(x as u32, Y0)
}

fn hiking_way(id: u64, points: Vec<Point31>) -> RouteWay {
    let mut tags = BTreeMap::new();
    tags.insert("route_hiking_1".to_string(), String::new());
    RouteWay::new(id, points, tags)
}

/// Three ways chained end to end, junctions 100m apart.
fn chain_index() -> SegmentIndex {
    let mut index = SegmentIndex::new();
    index.add_way(hiking_way(1, vec![p(0.0), p(100.0)]));
    index.add_way(hiking_way(2, vec![p(100.0), p(200.0)]));
    index.add_way(hiking_way(3, vec![p(200.0), p(300.0)]));
    index
}

fn way_ids(path: &[RouteSegment]) -> Vec<u64> {
    path.iter().map(|s| s.way_id()).collect()
}

#[test]
fn test_chain_visits_every_edge_once() {
    let index = chain_index();
    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    let seeds = index.segments_at(p(0.0)).unwrap();
    assert_eq!(seeds.len(), 1);
    let path = assembler.assemble(&seeds[0]).unwrap();

    let ids = way_ids(&path);
    assert_eq!(ids.len(), 3);
    let unique: HashSet<u64> = ids.iter().copied().collect();
    assert_eq!(unique, HashSet::from([1, 2, 3]));
}

#[test]
fn test_any_seed_reaches_every_edge() {
    let index = chain_index();
    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    // Every seed discoverable at the interior junctions must still cover
    // the full chain
    for point in [p(100.0), p(200.0)] {
        for seed in index.segments_at(point).unwrap() {
            let path = assembler.assemble(&seed).unwrap();
            let unique: HashSet<u64> = way_ids(&path).into_iter().collect();
            assert_eq!(unique, HashSet::from([1, 2, 3]));
        }
    }
}

#[test]
fn test_path_is_continuous() {
    let index = chain_index();
    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    let seeds = index.segments_at(p(0.0)).unwrap();
    let path = assembler.assemble(&seeds[0]).unwrap();
    for pair in path.windows(2) {
        assert_eq!(pair[0].end_point(), pair[1].start_point());
    }
}

#[test]
fn test_ring_terminates_with_each_edge_once() {
    // A 5-way ring sharing one key
    let mut index = SegmentIndex::new();
    let corners = [p(0.0), p(100.0), p(200.0), p(300.0), p(400.0)];
    for i in 0..5 {
        index.add_way(hiking_way(
            i as u64 + 1,
            vec![corners[i], corners[(i + 1) % 5]],
        ));
    }

    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    for seed in index.segments_at(p(0.0)).unwrap() {
        let path = assembler.assemble(&seed).unwrap();
        let ids = way_ids(&path);
        let unique: HashSet<u64> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 5, "every edge exactly once");
        assert_eq!(unique.len(), 5);
    }
}

#[test]
fn test_parallel_edges_do_not_close_two_edge_loop() {
    // Two distinct ways between the same pair of nodes
    let mut index = SegmentIndex::new();
    index.add_way(hiking_way(1, vec![p(0.0), p(100.0)]));
    index.add_way(hiking_way(2, vec![p(0.0), p(100.0)]));

    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    let seeds = index.segments_at(p(0.0)).unwrap();
    let path = assembler.assemble(&seeds[0]).unwrap();

    let ids = way_ids(&path);
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_iteration_cap_yields_partial_path() {
    // A 6-way chain with a cap of 3 growth steps: assembly stops early and
    // keeps the partial path instead of failing
    let mut index = SegmentIndex::new();
    for i in 0..6 {
        index.add_way(hiking_way(
            i as u64 + 1,
            vec![p(i as f64 * 100.0), p((i + 1) as f64 * 100.0)],
        ));
    }

    let config = SelectorConfig {
        max_iterations: 3,
        ..SelectorConfig::default()
    };
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    let seeds = index.segments_at(p(0.0)).unwrap();
    let path = assembler.assemble(&seeds[0]).unwrap();
    assert_eq!(path.len(), 4); // seed + 3 grown segments
}

#[test]
fn test_gap_bridged_within_radius() {
    // 25m hole between the two ways, inside the 30m approximate radius
    let mut index = SegmentIndex::new();
    index.add_way(hiking_way(1, vec![p(0.0), p(100.0)]));
    index.add_way(hiking_way(2, vec![p(125.0), p(225.0)]));

    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    let seeds = index.segments_at(p(0.0)).unwrap();
    let path = assembler.assemble(&seeds[0]).unwrap();
    let unique: HashSet<u64> = way_ids(&path).into_iter().collect();
    assert_eq!(unique, HashSet::from([1, 2]));
}

#[test]
fn test_gap_beyond_radius_stops_growth() {
    // 50m hole: not bridgeable
    let mut index = SegmentIndex::new();
    index.add_way(hiking_way(1, vec![p(0.0), p(100.0)]));
    index.add_way(hiking_way(2, vec![p(150.0), p(250.0)]));

    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    let seeds = index.segments_at(p(0.0)).unwrap();
    let path = assembler.assemble(&seeds[0]).unwrap();
    assert_eq!(way_ids(&path), vec![1]);
}

#[test]
fn test_growth_respects_route_key() {
    // Adjacent way belongs to a different relation: never stitched
    let mut index = SegmentIndex::new();
    index.add_way(hiking_way(1, vec![p(0.0), p(100.0)]));
    let mut tags = BTreeMap::new();
    tags.insert("route_bicycle_1".to_string(), String::new());
    index.add_way(RouteWay::new(2, vec![p(100.0), p(200.0)], tags));

    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    let seeds = index.segments_at(p(0.0)).unwrap();
    let path = assembler.assemble(&seeds[0]).unwrap();
    assert_eq!(way_ids(&path), vec![1]);
}

#[test]
fn test_assembly_is_deterministic() {
    let index = chain_index();
    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &GreedyFirstMatch);

    let seeds = index.segments_at(p(100.0)).unwrap();
    let first = assembler.assemble(&seeds[0]).unwrap();
    for _ in 0..5 {
        let again = assembler.assemble(&seeds[0]).unwrap();
        assert_eq!(way_ids(&again), way_ids(&first));
        let starts: Vec<_> = again.iter().map(|s| s.start()).collect();
        let firsts: Vec<_> = first.iter().map(|s| s.start()).collect();
        assert_eq!(starts, firsts);
    }
}

/// A strategy that refuses every candidate.
struct RefuseAll;

impl GrowthStrategy for RefuseAll {
    fn choose(
        &self,
        _frontier: &RouteSegment,
        _opposite: &RouteSegment,
        _visited: &HashSet<u64>,
        _candidates: &[RouteSegment],
    ) -> Growth {
        Growth::Stop
    }
}

#[test]
fn test_strategy_is_replaceable() {
    let index = chain_index();
    let config = SelectorConfig::default();
    let assembler = Assembler::new(&index, &config, &RefuseAll);

    let seeds = index.segments_at(p(0.0)).unwrap();
    let path = assembler.assemble(&seeds[0]).unwrap();
    assert_eq!(path.len(), 1); // seed only
}
