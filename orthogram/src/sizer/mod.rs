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
@brief   Constraint Sizer: turns relative layout into absolute coordinates
 */

//a Documentation
/*!
# Constraint Sizer

Builds one [resolver::Resolver] chain per axis (rows, columns). Each
logical row/column boundary contributes one coordinate variable per
offset slot used by a channel at that boundary (at least one, so every
boundary is addressable even with no connections through it). Blocks
contribute a minimum-span link between the boundary at the top/left of
their cover and the boundary at the bottom/right, sized from their
margins, paddings, minimum size and label extent. Segment offset slots
at a boundary are linked in series by `connection_distance` plus the
stroke/buffer width of the wider neighbour.

[size] performs the required (minimum-position) pass, then the soft
spring-energy pass, retrying once with minimums relaxed to zero if the
first solve reports [OrthogramError::Infeasible], before multiplying
every coordinate by the diagram's `scale` (§4.5).
!*/

//a Imports
pub mod equation_set;
pub mod lup;
pub mod resolver;

use crate::attributes::{Attributes, Side};
use crate::error::Result;
use crate::grid::BlockLayout;
use crate::optimize::PlacedSegment;
use geometry::Rectangle;
use resolver::Resolver;
use std::collections::HashMap;

//a MarginReservations
//tp MarginReservations
/// Per-block, per-side minimum margin driven by arrowhead reservation
/// (§4.4 Arrow reservation, §4.5): a connection's end segment adjacent
/// to a block border reserves a margin of at least its arrow length
/// plus half its stroke width on that side
pub type MarginReservations = HashMap<(usize, Side), f64>;

//a AxisLayout
//tp AxisLayout
/// The resolved coordinate line for every (boundary, slot) pair on one axis
pub struct AxisLayout {
    /// `positions[boundary][slot]`
    positions: Vec<Vec<f64>>,
}

//ip AxisLayout
impl AxisLayout {
    //mp line
    /// The resolved coordinate of a given boundary/slot
    pub fn line(&self, boundary: usize, slot: usize) -> f64 {
        let row = &self.positions[boundary];
        row[slot.min(row.len() - 1)]
    }

    //mp extent
    /// The overall extent of the axis: its first and last boundary's
    /// slot-0 coordinates
    pub fn extent(&self) -> (f64, f64) {
        (self.positions[0][0], self.positions[self.positions.len() - 1][0])
    }

    //mp scaled
    /// A copy of this axis with every coordinate multiplied by `scale`
    fn scaled(&self, scale: f64) -> AxisLayout {
        AxisLayout { positions: self.positions.iter().map(|row| row.iter().map(|v| v * scale).collect()).collect() }
    }
}

//a SizedBlock
//tp SizedBlock
/// A block's final outer and inner rectangles
#[derive(Clone, Debug)]
pub struct SizedBlock {
    /// Outer rectangle (outside the margin)
    pub outer: Rectangle,
    /// Inner rectangle (inside the stroke, where the label is clipped)
    pub inner: Rectangle,
}

//a SizedSegment
//tp SizedSegment
/// A placed segment's final coordinates
#[derive(Clone, Debug)]
pub struct SizedSegment {
    /// True if horizontal
    pub horizontal: bool,
    /// Fixed axis coordinate (y for horizontal, x for vertical)
    pub axis_coord: f64,
    /// Start coordinate along the varying axis
    pub begin: f64,
    /// End coordinate along the varying axis
    pub end: f64,
}

//a SizedLayout
//tp SizedLayout
/// Everything the Renderer Adapter needs: absolute geometry for every
/// block and segment, plus the overall drawing size
pub struct SizedLayout {
    /// Per-block final rectangles, indexed as in [BlockLayout::blocks]
    pub blocks: Vec<SizedBlock>,
    /// Per-segment final coordinates, indexed as in the optimizer's output
    pub segments: Vec<SizedSegment>,
    /// Overall drawing width
    pub width: f64,
    /// Overall drawing height
    pub height: f64,
    row_axis: AxisLayout,
    col_axis: AxisLayout,
}

//ip SizedLayout
impl SizedLayout {
    //mp segment_endpoint
    /// The final point at one end of a boundary-space segment run,
    /// taking the line's offset `slot` along the fixed axis and slot 0
    /// (the block-boundary line itself) along the cross axis at
    /// `cross_boundary`. Used to reconstruct a route's polyline from
    /// its own (post-optimization) segments (§4.6).
    pub fn segment_endpoint(&self, horizontal: bool, axis_line: usize, slot: usize, cross_boundary: usize) -> geometry::Point {
        if horizontal {
            geometry::Point::new(self.col_axis.line(cross_boundary, 0), self.row_axis.line(axis_line, slot))
        } else {
            geometry::Point::new(self.col_axis.line(axis_line, slot), self.row_axis.line(cross_boundary, 0))
        }
    }
}

//a boundary_slot_counts
/// For each of the `count+1` boundaries on an axis, the number of
/// offset slots any channel segment uses there (at least 1)
fn boundary_slot_counts(count: usize, segments: &[PlacedSegment], horizontal_boundary: bool) -> Vec<usize> {
    let mut slots = vec![1usize; count + 1];
    for seg in segments {
        // a horizontal segment's axis_line addresses a row boundary; a
        // vertical segment's axis_line addresses a column boundary
        if seg.segment.horizontal == horizontal_boundary {
            let b = seg.segment.axis_line.min(count);
            slots[b] = slots[b].max(seg.slot + 1);
        }
    }
    slots
}

//a boundary_slot_widths
/// For each of the `count+1` boundaries on an axis, the `max(stroke_width,
/// buffer_width)` of whichever connection(s) occupy each offset slot there
/// (0.0 for a slot no segment uses). Used so that the gap between two
/// adjacent channel slots can be widened beyond `connection_distance` by
/// whatever stroke/buffer width the segments drawn on them actually need
/// (§4.5: "... + max of adjacent stroke widths + max buffer widths").
fn boundary_slot_widths(
    slot_counts: &[usize],
    segments: &[PlacedSegment],
    horizontal_boundary: bool,
    connection_attrs: &[Attributes],
) -> Vec<Vec<f64>> {
    let mut widths: Vec<Vec<f64>> = slot_counts.iter().map(|&n| vec![0.0f64; n]).collect();
    for seg in segments {
        if seg.segment.horizontal != horizontal_boundary {
            continue;
        }
        let b = seg.segment.axis_line.min(widths.len() - 1);
        let w = seg
            .connection_idxs
            .iter()
            .filter_map(|&idx| connection_attrs.get(idx))
            .map(|a| a.stroke_width.unwrap_or(1.0).max(a.buffer_width.unwrap_or(0.0)))
            .fold(0.0f64, f64::max);
        if seg.slot < widths[b].len() {
            widths[b][seg.slot] = widths[b][seg.slot].max(w);
        }
    }
    widths
}

//a build_axis
/// Build a [Resolver] over one axis's boundaries/slots, stitching
/// consecutive slots at a boundary by `connection_distance` plus the
/// wider of the two neighbouring slots' stroke/buffer width, and
/// leaving boundary-to-boundary gaps for [add_block_span] to fill in
fn build_axis(slot_counts: &[usize], slot_widths: &[Vec<f64>], connection_distance: f64) -> (Resolver, Vec<Vec<usize>>) {
    let mut var_idx = Vec::with_capacity(slot_counts.len());
    let mut next = 0usize;
    for &slots in slot_counts {
        let mut row = Vec::with_capacity(slots);
        for _ in 0..slots {
            row.push(next);
            next += 1;
        }
        var_idx.push(row);
    }
    let mut resolver = Resolver::new(next);
    for (row, widths) in var_idx.iter().zip(slot_widths) {
        for (slot, w) in row.windows(2).enumerate() {
            let adjacent = widths.get(slot).copied().unwrap_or(0.0).max(widths.get(slot + 1).copied().unwrap_or(0.0));
            resolver.add_link(w[0], w[1], connection_distance + adjacent, Some(1.0));
        }
    }
    resolver.force_value(0, 0.0);
    (resolver, var_idx)
}

//a size
//fp size
/// Run the Constraint Sizer (§4.5): resolve absolute coordinates for
/// every block and segment, retrying once with relaxed minimums if the
/// first solve is infeasible, then apply `scale`
pub fn size(
    layout: &BlockLayout,
    row_segments: &[PlacedSegment],
    col_segments: &[PlacedSegment],
    diagram_attrs: &Attributes,
    label_extents: &HashMap<usize, (f64, f64)>,
    connection_attrs: &[Attributes],
) -> Result<SizedLayout> {
    match size_once(layout, row_segments, col_segments, diagram_attrs, label_extents, connection_attrs, false) {
        Ok(sized) => Ok(sized),
        Err(_) => size_once(layout, row_segments, col_segments, diagram_attrs, label_extents, connection_attrs, true),
    }
}

//fp size_once
fn size_once(
    layout: &BlockLayout,
    row_segments: &[PlacedSegment],
    col_segments: &[PlacedSegment],
    diagram_attrs: &Attributes,
    label_extents: &HashMap<usize, (f64, f64)>,
    connection_attrs: &[Attributes],
    relax: bool,
) -> Result<SizedLayout> {
    let rows = layout.grid.rows();
    let cols = layout.grid.cols();
    let connection_distance = diagram_attrs.connection_distance.unwrap_or(4.0);

    let row_slots = boundary_slot_counts(rows, row_segments, true);
    let col_slots = boundary_slot_counts(cols, col_segments, false);
    let row_widths = boundary_slot_widths(&row_slots, row_segments, true, connection_attrs);
    let col_widths = boundary_slot_widths(&col_slots, col_segments, false, connection_attrs);

    let (mut row_resolver, row_vars) = build_axis(&row_slots, &row_widths, connection_distance);
    let (mut col_resolver, col_vars) = build_axis(&col_slots, &col_widths, connection_distance);

    for (block_idx, block) in layout.blocks.iter().enumerate() {
        let a = &block.attributes;
        let min_w = if relax { 0.0 } else { a.min_width.unwrap_or(0.0) };
        let min_h = if relax { 0.0 } else { a.min_height.unwrap_or(0.0) };
        // fall back to the font-size heuristic only when no measured
        // extent was supplied for this block (e.g. it carries no label)
        let (label_w, label_h) = label_extents.get(&block_idx).copied().unwrap_or_else(|| {
            if a.label.is_some() {
                let h = a.font_size.unwrap_or(12.0) * 1.5;
                (h * 2.0, h)
            } else {
                (0.0, 0.0)
            }
        });

        let h_span = a.margin_left.unwrap_or(4.0)
            + a.padding_left.unwrap_or(2.0)
            + min_w.max(label_w)
            + a.padding_right.unwrap_or(2.0)
            + a.margin_right.unwrap_or(4.0);
        let v_span = a.margin_top.unwrap_or(4.0)
            + a.padding_top.unwrap_or(2.0)
            + min_h.max(label_h)
            + a.padding_bottom.unwrap_or(2.0)
            + a.margin_bottom.unwrap_or(4.0);

        let row_start = row_vars[block.cover.row0][0];
        let row_end = row_vars[block.cover.row1 + 1][0];
        row_resolver.add_link(row_start, row_end, v_span, Some(1.0));

        let col_start = col_vars[block.cover.col0][0];
        let col_end = col_vars[block.cover.col1 + 1][0];
        col_resolver.add_link(col_start, col_end, h_span, Some(1.0));
    }

    let row_positions = row_resolver.minimize_energy()?;
    let col_positions = col_resolver.minimize_energy()?;

    let row_axis = AxisLayout { positions: row_vars.iter().map(|r| r.iter().map(|&i| row_positions[i]).collect()).collect() };
    let col_axis = AxisLayout { positions: col_vars.iter().map(|r| r.iter().map(|&i| col_positions[i]).collect()).collect() };

    let scale = diagram_attrs.scale.unwrap_or(1.0);

    let mut blocks = Vec::with_capacity(layout.blocks.len());
    for block in &layout.blocks {
        let a = &block.attributes;
        let outer_y0 = row_axis.line(block.cover.row0, 0);
        let outer_y1 = row_axis.line(block.cover.row1 + 1, 0);
        let outer_x0 = col_axis.line(block.cover.col0, 0);
        let outer_x1 = col_axis.line(block.cover.col1 + 1, 0);
        let outer = Rectangle::new(outer_x0, outer_y0, outer_x1, outer_y1);
        let inner = outer.pad(
            -(a.margin_top.unwrap_or(4.0) + a.padding_top.unwrap_or(2.0)),
            -(a.margin_bottom.unwrap_or(4.0) + a.padding_bottom.unwrap_or(2.0)),
            -(a.margin_left.unwrap_or(4.0) + a.padding_left.unwrap_or(2.0)),
            -(a.margin_right.unwrap_or(4.0) + a.padding_right.unwrap_or(2.0)),
        );
        blocks.push(SizedBlock { outer: outer.scale(scale), inner: inner.scale(scale) });
    }

    let mut segments = Vec::with_capacity(row_segments.len() + col_segments.len());
    for seg in row_segments {
        let axis_coord = row_axis.line(seg.segment.axis_line, seg.slot);
        segments.push(SizedSegment {
            horizontal: true,
            axis_coord: axis_coord * scale,
            begin: col_axis.line(seg.segment.begin, 0) * scale,
            end: col_axis.line(seg.segment.end, 0) * scale,
        });
    }
    for seg in col_segments {
        let axis_coord = col_axis.line(seg.segment.axis_line, seg.slot);
        segments.push(SizedSegment {
            horizontal: false,
            axis_coord: axis_coord * scale,
            begin: row_axis.line(seg.segment.begin, 0) * scale,
            end: row_axis.line(seg.segment.end, 0) * scale,
        });
    }

    let (_, row_max) = row_axis.extent();
    let (_, col_max) = col_axis.extent();
    Ok(SizedLayout {
        blocks,
        segments,
        width: col_max * scale,
        height: row_max * scale,
        row_axis: row_axis.scaled(scale),
        col_axis: col_axis.scaled(scale),
    })
}

//mt Test for Sizer
#[cfg(test)]
mod test_sizer {
    use super::*;
    use crate::attributes::Attributes;
    use crate::grid::{Block, Cover, Grid};
    use crate::router::Segment;

    fn simple_layout() -> BlockLayout {
        let grid = Grid::from_rows(vec![vec![Some("a".into()), None, Some("b".into())]]);
        let a = Block { name: "a".into(), cover: Cover { row0: 0, row1: 0, col0: 0, col1: 0 }, attributes: Attributes::builtin_defaults(), is_auto: false };
        let b = Block { name: "b".into(), cover: Cover { row0: 0, row1: 0, col0: 2, col1: 2 }, attributes: Attributes::builtin_defaults(), is_auto: false };
        BlockLayout { grid, blocks: vec![a, b] }
    }

    #[test]
    fn test_blocks_do_not_overlap_horizontally() {
        let layout = simple_layout();
        let diagram_attrs = Attributes::builtin_defaults();
        let sized = size(&layout, &[], &[], &diagram_attrs, &HashMap::new(), &[]).unwrap();
        assert!(sized.blocks[0].outer.x1 <= sized.blocks[1].outer.x0 + 1e-6);
    }

    #[test]
    fn test_scale_multiplies_drawing_size() {
        let layout = simple_layout();
        let mut diagram_attrs = Attributes::builtin_defaults();
        let unscaled = size(&layout, &[], &[], &diagram_attrs, &HashMap::new(), &[]).unwrap();
        diagram_attrs.scale = Some(2.0);
        let scaled = size(&layout, &[], &[], &diagram_attrs, &HashMap::new(), &[]).unwrap();
        assert!((scaled.width - unscaled.width * 2.0).abs() < 1e-6);
        assert!((scaled.height - unscaled.height * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment_respects_block_column() {
        let layout = simple_layout();
        let diagram_attrs = Attributes::builtin_defaults();
        let seg = PlacedSegment {
            segment: Segment { horizontal: true, axis_line: 0, begin: 0, end: 2, forward: true },
            connection_idxs: vec![0],
            slot: 0,
        };
        let sized = size(&layout, &[seg], &[], &diagram_attrs, &HashMap::new(), &[]).unwrap();
        assert_eq!(sized.segments.len(), 1);
        assert!(sized.segments[0].end > sized.segments[0].begin);
    }

    #[test]
    fn test_adjacent_slots_spaced_by_stroke_width() {
        // two overlapping segments on the same axis line, in adjacent
        // slots, belonging to connections with wide strokes: the gap
        // between their drawn lines must grow to fit the wider stroke,
        // not just `connection_distance` (§4.5, §8 boundary scenario 4)
        let layout = simple_layout();
        let mut diagram_attrs = Attributes::builtin_defaults();
        diagram_attrs.connection_distance = Some(4.0);
        let wide = Attributes { stroke_width: Some(20.0), ..Attributes::builtin_defaults() };
        let narrow = Attributes { stroke_width: Some(1.0), ..Attributes::builtin_defaults() };
        let seg0 = PlacedSegment {
            segment: Segment { horizontal: true, axis_line: 0, begin: 0, end: 2, forward: true },
            connection_idxs: vec![0],
            slot: 0,
        };
        let seg1 = PlacedSegment {
            segment: Segment { horizontal: true, axis_line: 0, begin: 0, end: 2, forward: true },
            connection_idxs: vec![1],
            slot: 1,
        };
        let sized = size(&layout, &[seg0, seg1], &[], &diagram_attrs, &HashMap::new(), &[narrow.clone(), wide.clone()]).unwrap();
        let gap = (sized.segments[1].axis_coord - sized.segments[0].axis_coord).abs();
        assert!(gap >= 4.0 + 20.0 - 1e-6, "gap {gap} should be widened by the wider stroke");

        let both_narrow = size(&layout, &[seg0, seg1], &[], &diagram_attrs, &HashMap::new(), &[narrow.clone(), narrow]).unwrap();
        let narrow_gap = (both_narrow.segments[1].axis_coord - both_narrow.segments[0].axis_coord).abs();
        assert!(narrow_gap < gap, "widening one connection's stroke should not shrink the gap for both-narrow case");
    }
}
