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

@file    diagram.rs
@brief   Orchestration: wires the pipeline stages into one Diagram verb sequence
 */

//a Documentation
/*!
# Diagram

The top-level handle a caller drives through the pipeline, one verb per
stage: [Diagram::load] (DDF Loader), [Diagram::route] (Node Graph +
Router), [Diagram::optimize] (Segment Optimizer), [Diagram::size]
(Constraint Sizer) and [Diagram::render] (Renderer Adapter), mirroring
the teacher's own `uniquify` / `style` / `layout` / `geometry` verb
sequence.

Two things the individual stage modules leave to their caller are done
here:

- The Router's segments are produced in refinement-lattice coordinates;
  [Diagram::route] converts each one into the boundary-indexed space
  the Constraint Sizer expects via
  [crate::router::Segment::to_boundary_space] before storing it.
- Arrow-length margin reservation (§4.5 "connection end segments
  adjacent to a block border") is applied by tightening the relevant
  block's margin attribute before handing the layout to the sizer,
  rather than by adding another required-constraint link to the
  solver's equation set — the two are equivalent for a single scalar
  lower bound, and this avoids widening the Sizer's own surface for a
  one-sided adjustment (see DESIGN.md).
!*/

//a Imports
use crate::attributes::{Attributes, ConnectionLabelPosition, LabelPosition, Side, TextOrientation};
use crate::connection::Connection;
use crate::definition::{self, Document};
use crate::error::{OrthogramError, Result};
use crate::grid::{self, BlockLayout};
use crate::label;
use crate::optimize::{self, GroupInfo, PlacedSegment};
use crate::refine::{self, NodeClass};
use crate::render::{DefaultFontMetrics, FontMetrics, Renderer};
use crate::router::{self, Route};
use crate::sizer::{self, SizedLayout};
use geometry::{Point, Rectangle};
use std::collections::HashMap;
use std::path::Path;

//a Diagram
//tp Diagram
/// A loaded diagram, carried through the pipeline one stage at a time
pub struct Diagram {
    diagram_attrs: Attributes,
    layout: BlockLayout,
    connections: Vec<Connection>,
    connection_attrs: Vec<Attributes>,
    k: usize,

    routes: Vec<Route>,
    margin_reservations: HashMap<(usize, Side), f64>,

    draw_priority: HashMap<usize, f64>,
    row_placed: Vec<PlacedSegment>,
    col_placed: Vec<PlacedSegment>,
    /// `(connection_idx, segment_index_within_route)` -> `(is_row, index within row_placed/col_placed)`
    placement: HashMap<(usize, usize), (bool, usize)>,

    sized: Option<SizedLayout>,
}

//ip Diagram
impl Diagram {
    //fp load
    /// Run the DDF Loader and Grid Builder, and resolve every
    /// connection's attributes (§4.1, §4.7)
    pub fn load(path: &Path) -> Result<Self> {
        let Document { diagram, rows, blocks, connections: conn_defs, styles, groups } = definition::load(path)?;

        let diagram_attrs = styles.resolve_plain(&diagram);
        let grid = grid::Grid::from_rows(rows);
        let layout = grid::build(grid, blocks, &styles, &Attributes::default())?;

        let mut connections = Vec::new();
        for def in &conn_defs {
            connections.extend(def.expand());
        }
        let connection_attrs = connections.iter().map(|c| c.resolve_attributes(&styles, &groups)).collect();

        Ok(Self {
            diagram_attrs,
            layout,
            connections,
            connection_attrs,
            k: refine::DEFAULT_K,
            routes: Vec::new(),
            margin_reservations: HashMap::new(),
            draw_priority: HashMap::new(),
            row_placed: Vec::new(),
            col_placed: Vec::new(),
            placement: HashMap::new(),
            sized: None,
        })
    }

    //mp route
    /// Run the Node Graph and Router over every connection, in
    /// definition order, converting each route's segments into
    /// boundary space and recording arrow-length margin reservations
    /// at the border each route crosses (§4.2, §4.3)
    pub fn route(&mut self) -> Result<()> {
        let rows = self.layout.grid.rows();
        let cols = self.layout.grid.cols();
        let grid = refine::RefinementGrid::new(rows, cols, self.k);

        let mut routes = Vec::with_capacity(self.connections.len());
        let mut reservations: HashMap<(usize, Side), f64> = HashMap::new();
        for (idx, conn) in self.connections.iter().enumerate() {
            let resolved = &self.connection_attrs[idx];
            let (start, end) = conn.resolve_endpoints(&self.layout, resolved)?;
            let route = router::route_connection(idx, &grid, &self.layout, &start, &end, conn.start.block_name(), conn.end.block_name())?;

            reserve_border_margin(&grid, &self.layout, route.path.first().copied(), resolved.arrow_back.unwrap_or(false), resolved, &mut reservations);
            reserve_border_margin(&grid, &self.layout, route.path.last().copied(), resolved.arrow_forward.unwrap_or(true), resolved, &mut reservations);

            let segments = route.segments.into_iter().map(|s| s.to_boundary_space(self.k)).collect();
            routes.push(Route { connection_idx: idx, path: route.path, segments });
        }
        self.routes = routes;
        self.margin_reservations = reservations;
        Ok(())
    }

    //mp optimize
    /// Run the Segment Optimizer: group reorder, collapse, offset-slot
    /// assignment, then split the result by axis for the Sizer (§4.4)
    pub fn optimize(&mut self) {
        let mut groups = HashMap::with_capacity(self.connection_attrs.len());
        for (idx, attrs) in self.connection_attrs.iter().enumerate() {
            groups.insert(
                idx,
                GroupInfo {
                    group: attrs.group.clone(),
                    drawing_priority: attrs.drawing_priority.unwrap_or(0.0),
                    collapse_connections: attrs.collapse_connections.unwrap_or(false),
                },
            );
        }

        let (reordered, priorities) = optimize::reorder_by_group(std::mem::take(&mut self.routes), &groups);
        self.draw_priority = reordered.iter().zip(&priorities).map(|(r, p)| (r.connection_idx, *p)).collect();

        let (placed, placement) = optimize::collapse_segments(&reordered, &groups);
        let placed = optimize::assign_offset_slots(placed);

        let mut row_placed = Vec::new();
        let mut col_placed = Vec::new();
        let mut split_index = HashMap::with_capacity(placed.len());
        for (i, seg) in placed.into_iter().enumerate() {
            if seg.segment.horizontal {
                split_index.insert(i, (true, row_placed.len()));
                row_placed.push(seg);
            } else {
                split_index.insert(i, (false, col_placed.len()));
                col_placed.push(seg);
            }
        }
        self.placement = placement.into_iter().map(|(k, v)| (k, split_index[&v])).collect();
        self.row_placed = row_placed;
        self.col_placed = col_placed;
        self.routes = reordered;
    }

    //mp size
    /// Run the Constraint Sizer, folding in measured label extents and
    /// the margin reservations gathered by [Diagram::route] (§4.5)
    pub fn size(&mut self) -> Result<()> {
        let label_extents = self.measure_label_extents();
        let layout = self.layout_with_margin_reservations();
        self.sized =
            Some(sizer::size(&layout, &self.row_placed, &self.col_placed, &self.diagram_attrs, &label_extents, &self.connection_attrs)?);
        Ok(())
    }

    //fp measure_label_extents
    fn measure_label_extents(&self) -> HashMap<usize, (f64, f64)> {
        let metrics = DefaultFontMetrics;
        let mut out = HashMap::new();
        for (idx, block) in self.layout.blocks.iter().enumerate() {
            if let Some(label) = &block.attributes.label {
                let m = metrics.measure(label, &block.attributes);
                out.insert(idx, (m.width, m.height()));
            }
        }
        out
    }

    //fp layout_with_margin_reservations
    fn layout_with_margin_reservations(&self) -> BlockLayout {
        let mut layout = self.layout.clone();
        for (idx, block) in layout.blocks.iter_mut().enumerate() {
            for side in Side::ALL {
                let Some(&reserved) = self.margin_reservations.get(&(idx, side)) else { continue };
                let field = match side {
                    Side::Top => &mut block.attributes.margin_top,
                    Side::Bottom => &mut block.attributes.margin_bottom,
                    Side::Left => &mut block.attributes.margin_left,
                    Side::Right => &mut block.attributes.margin_right,
                };
                *field = Some(field.unwrap_or(4.0).max(reserved));
            }
        }
        layout
    }

    //mp render
    /// Drive a [Renderer] through the full draw sequence of §4.6:
    /// diagram background, blocks in draw order, connection groups by
    /// priority, then the diagram label
    pub fn render(&self, renderer: &mut dyn Renderer, path: &Path) -> Result<()> {
        let sized = self.sized.as_ref().ok_or_else(|| OrthogramError::render("size() must run before render()"))?;
        renderer.begin_image(sized.width, sized.height)?;

        let mut background = self.diagram_attrs.clone();
        background.stroke = None;
        renderer.rectangle(Rectangle::new(0.0, 0.0, sized.width, sized.height), &background);

        for (block, sized_block) in self.layout.blocks.iter().zip(&sized.blocks) {
            renderer.rectangle(sized_block.outer, &block.attributes);
            if let Some(text) = &block.attributes.label {
                let metrics = renderer.measure_text(text, &block.attributes);
                let position = block.attributes.label_position.unwrap_or(LabelPosition::Center);
                let anchor = label::block_label_anchor(&sized_block.inner, &metrics, position);
                let orientation = resolve_orientation(block.attributes.text_orientation, Point::new(1.0, 0.0));
                renderer.text(anchor.x, anchor.y, text, &block.attributes, orientation);
            }
        }

        let mut order: Vec<usize> = (0..self.connections.len()).collect();
        order.sort_by(|&a, &b| {
            let pa = self.draw_priority.get(&a).copied().unwrap_or(0.0);
            let pb = self.draw_priority.get(&b).copied().unwrap_or(0.0);
            pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
        });
        for idx in order {
            self.render_connection(renderer, idx);
        }

        if let Some(text) = &self.diagram_attrs.label {
            let metrics = renderer.measure_text(text, &self.diagram_attrs);
            let full = Rectangle::new(0.0, 0.0, sized.width, sized.height);
            let position = self.diagram_attrs.label_position.unwrap_or(LabelPosition::Bottom);
            let anchor = label::block_label_anchor(&full, &metrics, position);
            let orientation = resolve_orientation(self.diagram_attrs.text_orientation, Point::new(1.0, 0.0));
            renderer.text(anchor.x, anchor.y, text, &self.diagram_attrs, orientation);
        }

        renderer.end_image(path)
    }

    //fp render_connection
    fn render_connection(&self, renderer: &mut dyn Renderer, connection_idx: usize) {
        let attrs = &self.connection_attrs[connection_idx];
        let points = self.reconstruct_polyline(connection_idx);
        if points.len() < 2 {
            return;
        }
        renderer.polyline(&points, attrs);

        if attrs.arrow_forward.unwrap_or(true) {
            let tip = points[points.len() - 1];
            let prev = points[points.len() - 2];
            renderer.arrowhead(tip, Point::new(tip.x - prev.x, tip.y - prev.y), attrs);
        }
        if attrs.arrow_back.unwrap_or(false) {
            let tip = points[0];
            let next = points[1];
            renderer.arrowhead(tip, Point::new(tip.x - next.x, tip.y - next.y), attrs);
        }

        for (text, position) in [
            (&attrs.start_label, ConnectionLabelPosition::Start),
            (&attrs.middle_label, ConnectionLabelPosition::Middle),
            (&attrs.end_label, ConnectionLabelPosition::End),
        ] {
            if let Some(text) = text {
                let (anchor, direction) = label::connection_label_anchor(&points, position);
                let orientation = resolve_orientation(attrs.text_orientation, direction);
                renderer.text(anchor.x, anchor.y, text, attrs, orientation);
            }
        }
    }

    //fp reconstruct_polyline
    /// Stitch a connection's final drawn polyline from its own
    /// (pre-collapse) segments, using each one's assigned placement and
    /// offset slot, in travel order (§4.6)
    fn reconstruct_polyline(&self, connection_idx: usize) -> Vec<Point> {
        let Some(sized) = &self.sized else { return Vec::new() };
        let Some(route) = self.routes.iter().find(|r| r.connection_idx == connection_idx) else { return Vec::new() };

        let mut points = Vec::with_capacity(route.segments.len() + 1);
        for (seg_idx, seg) in route.segments.iter().enumerate() {
            let Some(&(is_row, placed_idx)) = self.placement.get(&(connection_idx, seg_idx)) else { continue };
            let placed = if is_row { &self.row_placed[placed_idx] } else { &self.col_placed[placed_idx] };
            let p_begin = sized.segment_endpoint(seg.horizontal, placed.segment.axis_line, placed.slot, seg.begin);
            let p_end = sized.segment_endpoint(seg.horizontal, placed.segment.axis_line, placed.slot, seg.end);
            let (first, second) = if seg.forward { (p_begin, p_end) } else { (p_end, p_begin) };
            if points.is_empty() {
                points.push(first);
            }
            points.push(second);
        }
        points
    }

    //zz All done
}

//fp reserve_border_margin
/// If `node` classifies as a border of some block, record the margin
/// that block's side must reserve for this route's arrowhead (its
/// length, if drawn here) plus half the connection's stroke width
fn reserve_border_margin(
    grid: &refine::RefinementGrid,
    layout: &BlockLayout,
    node: Option<refine::NodeId>,
    has_arrow: bool,
    attrs: &Attributes,
    reservations: &mut HashMap<(usize, Side), f64>,
) {
    let Some(node) = node else { return };
    if let NodeClass::Border { block_idx, side } = grid.classify(node, layout) {
        let len = attrs.stroke_width.unwrap_or(1.0) / 2.0 + if has_arrow { attrs.arrow_base.unwrap_or(8.0) } else { 0.0 };
        let e = reservations.entry((block_idx, side)).or_insert(0.0);
        *e = e.max(len);
    }
}

//fp resolve_orientation
/// Resolve `follow` to horizontal or vertical by the direction it
/// would follow; routes are orthogonal, so this is always an exact
/// match rather than an approximation (§9, resolved Open Question)
fn resolve_orientation(orientation: Option<TextOrientation>, direction: Point) -> TextOrientation {
    match orientation.unwrap_or(TextOrientation::Horizontal) {
        TextOrientation::Follow => {
            if direction.x.abs() >= direction.y.abs() {
                TextOrientation::Horizontal
            } else {
                TextOrientation::Vertical
            }
        }
        other => other,
    }
}
