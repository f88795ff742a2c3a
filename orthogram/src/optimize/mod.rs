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
@brief   Segment Optimizer: group reordering, collapsing, offset-slot assignment
 */

//a Documentation
/*!
# Segment Optimizer

Takes the router's per-connection [Route]s and:

1. Reorders connections so that group members are contiguous, anchored
   at the group's first appearance, and adopts the group's maximum
   `drawing_priority` for every member (§4.4).
2. When a group's `collapse_connections` is set, merges same-axis-line
   overlapping segments within the group into one drawn segment.
3. Assigns every remaining segment an offset slot on its axis line via
   earliest-deadline-first interval colouring, so that any two
   segments with overlapping extents receive distinct slots.
!*/

//a Imports
use crate::router::{Route, Segment};
use std::collections::HashMap;

//a GroupInfo
//tp GroupInfo
/// Per-connection group membership as resolved from the connection table
#[derive(Clone, Debug)]
pub struct GroupInfo {
    /// Group name, if this connection belongs to one
    pub group: Option<String>,
    /// This connection's own drawing priority
    pub drawing_priority: f64,
    /// Whether this connection's group collapses overlapping segments
    pub collapse_connections: bool,
}

//a PlacedSegment
//tp PlacedSegment
/// A segment after optimization: its geometry, the connections that
/// drew it (more than one if collapsed), and its assigned offset slot
#[derive(Clone, Debug)]
pub struct PlacedSegment {
    /// The segment's geometry (post-collapse extent)
    pub segment: Segment,
    /// Connection indices contributing to this drawn segment
    pub connection_idxs: Vec<usize>,
    /// Offset slot index within this axis line's channel track
    pub slot: usize,
}

//a reorder_by_group
//fp reorder_by_group
/// Reorder routes so group members are contiguous at the group's
/// first-appearance position, and return each connection's effective
/// (possibly group-adopted) drawing priority in the new order
pub fn reorder_by_group(routes: Vec<Route>, groups: &HashMap<usize, GroupInfo>) -> (Vec<Route>, Vec<f64>) {
    let mut group_max_priority: HashMap<String, f64> = HashMap::new();
    for (idx, _route) in routes.iter().enumerate() {
        if let Some(info) = groups.get(&idx) {
            if let Some(name) = &info.group {
                let e = group_max_priority.entry(name.clone()).or_insert(f64::NEG_INFINITY);
                *e = e.max(info.drawing_priority);
            }
        }
    }

    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<usize> = (0..routes.len()).collect();
    for (pos, idx) in order.iter().enumerate() {
        if let Some(info) = groups.get(idx) {
            if let Some(name) = &info.group {
                first_seen.entry(name.clone()).or_insert(pos);
            }
        }
    }
    order.sort_by_key(|idx| {
        let anchor = groups
            .get(idx)
            .and_then(|info| info.group.as_ref())
            .and_then(|name| first_seen.get(name))
            .copied()
            .unwrap_or(*idx);
        (anchor, *idx)
    });

    let mut routes_by_idx: HashMap<usize, Route> = routes.into_iter().map(|r| (r.connection_idx, r)).collect();
    let mut out_routes = Vec::new();
    let mut out_priorities = Vec::new();
    for idx in order {
        let priority = groups
            .get(&idx)
            .and_then(|info| info.group.as_ref())
            .and_then(|name| group_max_priority.get(name))
            .copied()
            .or_else(|| groups.get(&idx).map(|info| info.drawing_priority))
            .unwrap_or(0.0);
        if let Some(route) = routes_by_idx.remove(&idx) {
            out_routes.push(route);
            out_priorities.push(priority);
        }
    }
    (out_routes, out_priorities)
}

//a collapse_segments
//fp collapse_segments
/// Merge overlapping same-axis-line segments belonging to connections
/// that share a collapsing group (§4.4 Collapsing).
///
/// Alongside the placed segments, returns a map from `(connection_idx,
/// segment_index_within_that_route)` to the index of the
/// [PlacedSegment] it was merged into, so a route's original polyline
/// can later be reconstructed by looking up the offset slot each of
/// its own segments ended up with.
pub fn collapse_segments(
    routes: &[Route],
    groups: &HashMap<usize, GroupInfo>,
) -> (Vec<PlacedSegment>, HashMap<(usize, usize), usize>) {
    // bucket segments by (group key, horizontal, axis_line); ungrouped or
    // non-collapsing connections get a unique per-connection bucket so they
    // never merge with anything else
    let mut buckets: HashMap<(String, bool, usize), Vec<(usize, usize, Segment)>> = HashMap::new();
    for route in routes {
        let info = groups.get(&route.connection_idx);
        let collapses = info.map(|i| i.collapse_connections && i.group.is_some()).unwrap_or(false);
        for (seg_idx, seg) in route.segments.iter().enumerate() {
            let key = if collapses {
                (info.unwrap().group.clone().unwrap(), seg.horizontal, seg.axis_line)
            } else {
                (format!("__conn_{}", route.connection_idx), seg.horizontal, seg.axis_line)
            };
            buckets.entry(key).or_default().push((route.connection_idx, seg_idx, *seg));
        }
    }

    let mut placed = Vec::new();
    let mut placement: HashMap<(usize, usize), usize> = HashMap::new();
    for (_key, mut members) in buckets {
        members.sort_by_key(|(idx, seg_idx, seg)| (seg.begin, *idx, *seg_idx, seg.end));
        let mut merged: Vec<(Vec<usize>, Vec<(usize, usize)>, Segment)> = Vec::new();
        for (conn_idx, seg_idx, seg) in members {
            if let Some(last) = merged.last_mut() {
                if last.2.begin <= seg.end && seg.begin <= last.2.end {
                    last.2.begin = last.2.begin.min(seg.begin);
                    last.2.end = last.2.end.max(seg.end);
                    last.0.push(conn_idx);
                    last.1.push((conn_idx, seg_idx));
                    continue;
                }
            }
            merged.push((vec![conn_idx], vec![(conn_idx, seg_idx)], seg));
        }
        for (conn_idxs, members, seg) in merged {
            let placed_idx = placed.len();
            for key in members {
                placement.insert(key, placed_idx);
            }
            placed.push(PlacedSegment { segment: seg, connection_idxs: conn_idxs, slot: 0 });
        }
    }
    (placed, placement)
}

//a assign_offset_slots
//fp assign_offset_slots
/// Assign an offset slot to every segment on each axis line using
/// earliest-deadline-first greedy interval colouring (§4.4 Offset
/// assignment): segments are processed in `begin` order; a segment
/// takes the lowest-numbered slot not occupied by a still-overlapping
/// segment already placed on the same axis line
pub fn assign_offset_slots(mut segments: Vec<PlacedSegment>) -> Vec<PlacedSegment> {
    let mut by_line: HashMap<(bool, usize), Vec<usize>> = HashMap::new();
    for (i, s) in segments.iter().enumerate() {
        by_line.entry((s.segment.horizontal, s.segment.axis_line)).or_default().push(i);
    }
    for (_key, mut idxs) in by_line {
        idxs.sort_by_key(|&i| (segments[i].segment.begin, segments[i].segment.end));
        let mut active: Vec<(usize, Segment)> = Vec::new(); // (slot, segment) still in range
        for i in idxs {
            active.retain(|(_, s)| s.end >= segments[i].segment.begin);
            let used_slots: std::collections::HashSet<usize> = active.iter().map(|(slot, _)| *slot).collect();
            let mut slot = 0;
            while used_slots.contains(&slot) {
                slot += 1;
            }
            segments[i].slot = slot;
            active.push((slot, segments[i].segment));
        }
    }
    segments
}

//mt Test for Segment Optimizer
#[cfg(test)]
mod test_optimizer {
    use super::*;
    use crate::refine::NodeId;

    fn seg(begin: usize, end: usize) -> Segment {
        Segment { horizontal: true, axis_line: 0, begin, end, forward: true }
    }

    fn route(idx: usize, segments: Vec<Segment>) -> Route {
        Route { connection_idx: idx, path: vec![NodeId::new(0, 0)], segments }
    }

    #[test]
    fn test_offset_slots_overlap_forces_distinct() {
        let groups = HashMap::new();
        let routes = vec![route(0, vec![seg(0, 5)]), route(1, vec![seg(3, 8)])];
        let (placed, placement) = collapse_segments(&routes, &groups);
        let placed = assign_offset_slots(placed);
        assert_eq!(placed.len(), 2);
        assert_ne!(placed[0].slot, placed[1].slot);
        assert_eq!(placement.len(), 2);
    }

    #[test]
    fn test_non_overlapping_share_slot() {
        let groups = HashMap::new();
        let routes = vec![route(0, vec![seg(0, 2)]), route(1, vec![seg(5, 8)])];
        let (placed, _) = collapse_segments(&routes, &groups);
        let placed = assign_offset_slots(placed);
        assert_eq!(placed[0].slot, 0);
        assert_eq!(placed[1].slot, 0);
    }

    #[test]
    fn test_collapse_merges_overlapping_group_members() {
        let mut groups = HashMap::new();
        groups.insert(0, GroupInfo { group: Some("water".into()), drawing_priority: 0.0, collapse_connections: true });
        groups.insert(1, GroupInfo { group: Some("water".into()), drawing_priority: 0.0, collapse_connections: true });
        let routes = vec![route(0, vec![seg(2, 5)]), route(1, vec![seg(4, 6)])];
        let (placed, placement) = collapse_segments(&routes, &groups);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].segment.begin, 2);
        assert_eq!(placed[0].segment.end, 6);
        assert_eq!(placed[0].connection_idxs.len(), 2);
        assert_eq!(placement[&(0, 0)], 0);
        assert_eq!(placement[&(1, 0)], 0);
    }

    #[test]
    fn test_reorder_groups_contiguous() {
        let mut groups = HashMap::new();
        groups.insert(0, GroupInfo { group: None, drawing_priority: 0.0, collapse_connections: false });
        groups.insert(1, GroupInfo { group: Some("g".into()), drawing_priority: 1.0, collapse_connections: false });
        groups.insert(2, GroupInfo { group: None, drawing_priority: 0.0, collapse_connections: false });
        groups.insert(3, GroupInfo { group: Some("g".into()), drawing_priority: 2.0, collapse_connections: false });
        let routes = vec![route(0, vec![]), route(1, vec![]), route(2, vec![]), route(3, vec![])];
        let (reordered, priorities) = reorder_by_group(routes, &groups);
        let order: Vec<usize> = reordered.iter().map(|r| r.connection_idx).collect();
        assert_eq!(order, vec![0, 1, 3, 2]);
        assert_eq!(priorities[1], 2.0);
        assert_eq!(priorities[2], 2.0);
    }
}
