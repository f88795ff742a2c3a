/*a Copyright

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

  http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.

@file    mod.rs
@brief   Orthogonal shortest-path routing over the refinement lattice
 */

//a Documentation
/*!
# Router

For each connection, in definition order, searches the refinement
lattice from a synthetic source wired to every permitted exit-side
border node of the start block, to a synthetic sink wired from every
permitted entry-side border node of the end block (§4.3).

The search minimizes `(length, bends)` lexicographically by making the
per-bend surcharge exceed the longest length any single bend could
possibly save (`RefinementGrid::bend_cost`), then breaks remaining ties
deterministically: fewer bends, then a `side_bias` surcharge (§4.2)
added per edge that disfavours moving away from the connection's
preferred exit/entry side — kept several orders of magnitude below the
cost of a single unit of length so it can only ever resolve a tie, not
change which path is shortest — then lexicographic [NodeId] order, so
reruns are byte-identical (§8).
!*/

//a Imports
use crate::attributes::{Side, SideSet};
use crate::error::{OrthogramError, Result};
use crate::grid::{BlockLayout, Cover};
use crate::refine::{bend_cost, NodeId, RefinementGrid};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Per-edge penalty for moving against a connection's preferred side
/// (§4.2 side bias, §4.3 tie-break (b)). Kept far below 1.0 — the cost
/// of a single unit of length — so it can never change which path is
/// shortest or how many bends it has; it only breaks ties between
/// otherwise equal-cost paths in favour of the one that keeps closer
/// to the connection's declared exit/entry side preference.
const W_SIDE_BIAS: f64 = 1e-6;

//fp preferred_side
/// The first permitted side in canonical `top, bottom, left, right`
/// order — the side [route_connection]'s search tries to hug when
/// several equal-`(length, bends)` paths remain
fn preferred_side(sides: &SideSet) -> Option<Side> {
    [Side::Top, Side::Bottom, Side::Left, Side::Right].into_iter().find(|&side| sides.contains(side))
}

//a ConnectionEndpoint
//tp ConnectionEndpoint
/// One resolved endpoint of a connection: a block, and the sides on
/// which the connection may cross that block's border
#[derive(Clone, Debug)]
pub struct ConnectionEndpoint {
    /// Index into [BlockLayout::blocks]
    pub block_idx: usize,
    /// Permitted sides for this endpoint
    pub sides: SideSet,
    /// When the connection targets a specific cell within the block
    /// (a `{block: tag}` endpoint, §6) rather than the whole block,
    /// the narrowed cover border nodes are drawn from
    pub cell_cover: Option<Cover>,
}

//a Segment
//tp Segment
/// A straight, axis-aligned run of a [Route]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// True if this segment runs horizontally (varies in `sub_col`)
    pub horizontal: bool,
    /// The fixed lattice line this segment runs along (`sub_row` if
    /// horizontal, `sub_col` if vertical)
    pub axis_line: usize,
    /// Start extent along the varying axis
    pub begin: usize,
    /// End extent along the varying axis (`begin <= end`)
    pub end: usize,
    /// True if the route traverses this segment from `begin` to `end`;
    /// false if it traverses from `end` to `begin`. Needed to stitch a
    /// connection's final polyline back together in travel order once
    /// its segments have been reordered, collapsed and offset (§4.4).
    pub forward: bool,
}

//ip Segment
impl Segment {
    //fp to_boundary_space
    /// Convert this segment's lattice coordinates into the logical
    /// boundary addressing the Constraint Sizer uses (§4.5); see
    /// [crate::refine::to_boundary].
    pub fn to_boundary_space(self, k: usize) -> Segment {
        Segment {
            axis_line: crate::refine::to_boundary(self.axis_line, k),
            begin: crate::refine::to_boundary(self.begin, k),
            end: crate::refine::to_boundary(self.end, k),
            ..self
        }
    }
}

//a Route
//tp Route
/// The result of routing one connection: its node path and the
/// collapsed segments derived from it
#[derive(Clone, Debug)]
pub struct Route {
    /// Index of the connection this route belongs to, in definition
    /// order (after start/end Cartesian expansion)
    pub connection_idx: usize,
    /// Full node path from start border to end border
    pub path: Vec<NodeId>,
    /// Collinear-triple-collapsed segments
    pub segments: Vec<Segment>,
}

//a route_connection
//fp route_connection
/// Route a single connection across the refinement lattice (§4.3)
pub fn route_connection(
    connection_idx: usize,
    grid: &RefinementGrid,
    layout: &BlockLayout,
    start: &ConnectionEndpoint,
    end: &ConnectionEndpoint,
    start_name: &str,
    end_name: &str,
) -> Result<Route> {
    let start_cover = start.cell_cover.unwrap_or(layout.blocks[start.block_idx].cover);
    let end_cover = end.cell_cover.unwrap_or(layout.blocks[end.block_idx].cover);
    let sources = grid.border_nodes_of_cover(&start_cover, &start.sides);
    let sinks: std::collections::HashSet<NodeId> =
        grid.border_nodes_of_cover(&end_cover, &end.sides).into_iter().map(|(_, n)| n).collect();

    if sources.is_empty() || sinks.is_empty() {
        return Err(OrthogramError::unroutable(
            start_name,
            end_name,
            "no permitted exit/entry border nodes on the endpoint blocks",
        ));
    }

    let bend_surcharge = bend_cost(grid.sub_rows() / grid.k(), grid.sub_cols() / grid.k());
    let start_preference = preferred_side(&start.sides);
    let end_preference = preferred_side(&end.sides);

    let mut best_cost: HashMap<(NodeId, Option<Side>), f64> = HashMap::new();
    let mut prev: HashMap<(NodeId, Option<Side>), (NodeId, Option<Side>)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    #[derive(Clone, Copy, PartialEq)]
    struct Entry {
        cost: f64,
        bends: u32,
        node: NodeId,
        dir: Option<Side>,
    }
    impl Eq for Entry {}
    impl Ord for Entry {
        fn cmp(&self, other: &Self) -> Ordering {
            other
                .cost
                .partial_cmp(&self.cost)
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.bends.cmp(&other.bends))
                .then_with(|| other.node.cmp(&self.node))
        }
    }
    impl PartialOrd for Entry {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    for (side, node) in &sources {
        let key = (*node, Some(*side));
        best_cost.insert(key, 0.0);
        heap.push(Entry { cost: 0.0, bends: 0, node: *node, dir: Some(*side) });
    }

    let mut reached_end: Option<(NodeId, Option<Side>)> = None;
    while let Some(Entry { cost, bends, node, dir }) = heap.pop() {
        let key = (node, dir);
        if best_cost.get(&key).copied().unwrap_or(f64::INFINITY) < cost {
            continue;
        }
        if sinks.contains(&node) {
            reached_end = Some(key);
            break;
        }
        for (move_side, next) in grid.neighbors(node) {
            if !grid.is_traversable(next, layout, start.block_idx, end.block_idx) {
                continue;
            }
            let bend = match dir {
                Some(d) if d == move_side => 0.0,
                _ => bend_surcharge,
            };
            let next_bends = bends + if bend > 0.0 { 1 } else { 0 };
            let side_bias = if Some(move_side) == start_preference || Some(move_side) == end_preference {
                0.0
            } else {
                W_SIDE_BIAS
            };
            let next_cost = cost + 1.0 + bend + side_bias;
            let next_key = (next, Some(move_side));
            if next_cost < best_cost.get(&next_key).copied().unwrap_or(f64::INFINITY) {
                best_cost.insert(next_key, next_cost);
                prev.insert(next_key, key);
                heap.push(Entry { cost: next_cost, bends: next_bends, node: next, dir: Some(move_side) });
            }
        }
    }

    let Some(mut key) = reached_end else {
        return Err(OrthogramError::unroutable(start_name, end_name, "no path satisfies entry/exit constraints"));
    };

    let mut path = vec![key.0];
    while let Some(&p) = prev.get(&key) {
        path.push(p.0);
        key = p;
    }
    path.reverse();

    let segments = collapse_to_segments(&path);
    Ok(Route { connection_idx, path, segments })
}

//fp collapse_to_segments
/// Collapse a node path into axis-aligned segments, merging collinear
/// triples (§3, Segment)
fn collapse_to_segments(path: &[NodeId]) -> Vec<Segment> {
    let mut segments = Vec::new();
    if path.len() < 2 {
        return segments;
    }
    let mut start = 0usize;
    for i in 1..path.len() {
        let horizontal_now = path[i].sub_row == path[i - 1].sub_row;
        let horizontal_prev = i >= 2 && path[i - 1].sub_row == path[i - 2].sub_row;
        let vertical_now = path[i].sub_col == path[i - 1].sub_col;
        let vertical_prev = i >= 2 && path[i - 1].sub_col == path[i - 2].sub_col;
        let continues = (horizontal_now && horizontal_prev) || (vertical_now && vertical_prev);
        if !continues && i > start + 1 {
            segments.push(segment_from_run(&path[start..=i - 1]));
            start = i - 1;
        }
    }
    segments.push(segment_from_run(&path[start..]));
    segments
}

//fp segment_from_run
fn segment_from_run(run: &[NodeId]) -> Segment {
    let first = run[0];
    let last = run[run.len() - 1];
    if first.sub_row == last.sub_row {
        let forward = first.sub_col <= last.sub_col;
        let (begin, end) = if forward { (first.sub_col, last.sub_col) } else { (last.sub_col, first.sub_col) };
        Segment { horizontal: true, axis_line: first.sub_row, begin, end, forward }
    } else {
        let forward = first.sub_row <= last.sub_row;
        let (begin, end) = if forward { (first.sub_row, last.sub_row) } else { (last.sub_row, first.sub_row) };
        Segment { horizontal: false, axis_line: first.sub_col, begin, end, forward }
    }
}

//mt Test for Router
#[cfg(test)]
mod test_router {
    use super::*;
    use crate::attributes::Attributes;
    use crate::grid::{Block, Cover, Grid};

    fn two_block_layout() -> BlockLayout {
        let grid = Grid::from_rows(vec![vec![Some("a".into()), None, Some("b".into())]]);
        let a = Block { name: "a".into(), cover: Cover { row0: 0, row1: 0, col0: 0, col1: 0 }, attributes: Attributes::default(), is_auto: false };
        let b = Block { name: "b".into(), cover: Cover { row0: 0, row1: 0, col0: 2, col1: 2 }, attributes: Attributes::default(), is_auto: false };
        BlockLayout { grid, blocks: vec![a, b] }
    }

    #[test]
    fn test_routes_across_gap() {
        let layout = two_block_layout();
        let grid = RefinementGrid::new(1, 3, 3);
        let start = ConnectionEndpoint { block_idx: 0, sides: SideSet::all(), cell_cover: None };
        let end = ConnectionEndpoint { block_idx: 1, sides: SideSet::all(), cell_cover: None };
        let route = route_connection(0, &grid, &layout, &start, &end, "a", "b").unwrap();
        assert!(route.path.len() >= 2);
        assert!(!route.segments.is_empty());
        for seg in &route.segments {
            assert!(seg.begin != seg.end, "route carries a degenerate zero-length segment: {seg:?}");
        }
    }

    #[test]
    fn test_collapse_no_spurious_leading_segment() {
        // a straight three-node run with no turn must collapse to exactly
        // one segment, not a degenerate single-node segment plus the rest
        let path = vec![NodeId::new(0, 0), NodeId::new(0, 1), NodeId::new(0, 2)];
        let segments = collapse_to_segments(&path);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].begin, 0);
        assert_eq!(segments[0].end, 2);
    }

    #[test]
    fn test_collapse_single_bend_yields_two_segments() {
        let path = vec![NodeId::new(0, 0), NodeId::new(0, 1), NodeId::new(1, 1)];
        let segments = collapse_to_segments(&path);
        assert_eq!(segments.len(), 2);
        for seg in &segments {
            assert!(seg.begin != seg.end);
        }
    }

    #[test]
    fn test_unroutable_when_sides_forbidden() {
        let layout = two_block_layout();
        let grid = RefinementGrid::new(1, 3, 3);
        let start = ConnectionEndpoint { block_idx: 0, sides: SideSet::from_sides(&[Side::Top]), cell_cover: None };
        let end = ConnectionEndpoint { block_idx: 1, sides: SideSet::from_sides(&[Side::Top]), cell_cover: None };
        // exit/entry restricted to top only is still routable (goes around); use
        // an impossible combination instead: both sides disallow everything
        let empty = SideSet::from_sides(&[]);
        let end2 = ConnectionEndpoint { block_idx: 1, sides: empty, cell_cover: None };
        assert!(route_connection(0, &grid, &layout, &start, &end2, "a", "b").is_err());
    }
}
