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
@brief   The Node Graph: a K-subdivided refinement lattice over the block layout
 */

//a Documentation
/*!
# Node Graph

Subdivides every logical row and column into `K` sub-tracks (default 3:
a channel before the interior, the interior itself, and a channel
after), and classifies every resulting node as lying inside a block's
interior, on a block's border, or free (§4.2).

A [NodeId] is addressed directly by its sub-row/sub-column in the
flattened lattice; `logical_row`/`row_sub`/`logical_col`/`col_sub` are
derived, not stored, since they are a pure function of `K`.
!*/

//a Imports
use crate::attributes::{Side, SideSet};
use crate::grid::{BlockLayout, Cover};

//a Constants
/// Default per-axis subdivision count: one channel track before the
/// interior, the interior, one channel track after
pub const DEFAULT_K: usize = 3;

/// A cost added per direction change along a route; must exceed the
/// longest possible length saved by a single bend across the whole
/// grid (`R + C`) so that (length, bends) is minimized lexicographically
pub fn bend_cost(logical_rows: usize, logical_cols: usize) -> f64 {
    (logical_rows + logical_cols) as f64 + 1.0
}

//a to_boundary
//fp to_boundary
/// Convert a refinement sub-line index into the logical boundary index
/// the Constraint Sizer addresses (`0..=logical_count`): a sub-line in
/// the first half of its row/column's `k` tracks belongs to that
/// row/column's own boundary, the second half (including the interior
/// track, which carries no geometry of its own — see §4.5) belongs to
/// the next boundary. A segment's two ends on adjacent logical
/// cells' facing channel tracks convert to the same boundary index,
/// since they address the same physical channel band.
pub fn to_boundary(sub: usize, k: usize) -> usize {
    let r = sub / k;
    let rs = sub % k;
    if rs * 2 < k {
        r
    } else {
        r + 1
    }
}

//a NodeId
//tp NodeId
/// A point in the refinement lattice, addressed by flattened
/// sub-row/sub-column; `K` is needed to decompose it back into
/// `(logical_row, row_sub, logical_col, col_sub)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    /// Sub-row index in `0..logical_rows*K`
    pub sub_row: usize,
    /// Sub-column index in `0..logical_cols*K`
    pub sub_col: usize,
}

//ip NodeId
impl NodeId {
    //fp new
    /// Construct directly from flattened sub-row/sub-column
    pub fn new(sub_row: usize, sub_col: usize) -> Self {
        Self { sub_row, sub_col }
    }

    //mp logical_row
    /// The logical row this node's cell belongs to
    pub fn logical_row(&self, k: usize) -> usize {
        self.sub_row / k
    }

    //mp row_sub
    /// This node's sub-track within its logical row
    pub fn row_sub(&self, k: usize) -> usize {
        self.sub_row % k
    }

    //mp logical_col
    /// The logical column this node's cell belongs to
    pub fn logical_col(&self, k: usize) -> usize {
        self.sub_col / k
    }

    //mp col_sub
    /// This node's sub-track within its logical column
    pub fn col_sub(&self, k: usize) -> usize {
        self.sub_col % k
    }
}

//a NodeClass
//tp NodeClass
/// What a node's relationship is to the blocks covering its logical cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
    /// Strictly interior to block `block_idx`'s cover, on the interior track
    Inside {
        /// Index into [BlockLayout::blocks] of the containing block
        block_idx: usize,
    },
    /// On the named side of block `block_idx`'s cover, the permitted
    /// entry/exit track for that side
    Border {
        /// Index into [BlockLayout::blocks] of the bordered block
        block_idx: usize,
        /// Which side of the block this node sits on
        side: Side,
    },
    /// Not associated with any block's cover
    Free,
}

//a RefinementGrid
//tp RefinementGrid
/// The K-subdivided lattice built over a [BlockLayout]
pub struct RefinementGrid {
    logical_rows: usize,
    logical_cols: usize,
    k: usize,
}

//ip RefinementGrid
impl RefinementGrid {
    //fp new
    /// Build the lattice description for a layout with the given
    /// per-axis subdivision (must be `>= 3`)
    pub fn new(logical_rows: usize, logical_cols: usize, k: usize) -> Self {
        assert!(k >= 3, "refinement subdivision K must be >= 3");
        Self { logical_rows, logical_cols, k }
    }

    //mp k
    /// The per-axis subdivision count
    pub fn k(&self) -> usize {
        self.k
    }

    //mp interior_band
    /// The (inclusive) range of sub-track indices considered "interior"
    fn interior_band(&self) -> (usize, usize) {
        (1, self.k - 2)
    }

    //mp sub_rows
    /// Total number of sub-rows in the flattened lattice
    pub fn sub_rows(&self) -> usize {
        self.logical_rows * self.k
    }

    //mp sub_cols
    /// Total number of sub-columns in the flattened lattice
    pub fn sub_cols(&self) -> usize {
        self.logical_cols * self.k
    }

    //mp classify
    /// Classify a node against the block layout (§4.2)
    pub fn classify(&self, node: NodeId, layout: &BlockLayout) -> NodeClass {
        let k = self.k;
        let (lo, hi) = self.interior_band();
        let row = node.logical_row(k);
        let col = node.logical_col(k);
        let rs = node.row_sub(k);
        let cs = node.col_sub(k);
        for (idx, block) in layout.blocks.iter().enumerate() {
            if !block.cover.contains(row, col) {
                continue;
            }
            let on_top = row == block.cover.row0;
            let on_bottom = row == block.cover.row1;
            let on_left = col == block.cover.col0;
            let on_right = col == block.cover.col1;
            let rs_interior = rs >= lo && rs <= hi;
            let cs_interior = cs >= lo && cs <= hi;

            if rs_interior && cs_interior {
                return NodeClass::Inside { block_idx: idx };
            }
            // a node on a channel track at the cover's outer perimeter is a
            // border node for the side that track faces
            if on_top && rs < lo && cs_interior {
                return NodeClass::Border { block_idx: idx, side: Side::Top };
            }
            if on_bottom && rs > hi && cs_interior {
                return NodeClass::Border { block_idx: idx, side: Side::Bottom };
            }
            if on_left && cs < lo && rs_interior {
                return NodeClass::Border { block_idx: idx, side: Side::Left };
            }
            if on_right && cs > hi && rs_interior {
                return NodeClass::Border { block_idx: idx, side: Side::Right };
            }
            // any other sub-track within the cover (e.g. a corner channel
            // cell) is still inside the block for passage purposes
            return NodeClass::Inside { block_idx: idx };
        }
        NodeClass::Free
    }

    //mp neighbors
    /// The up-to-four orthogonal neighbours of a node, paired with the
    /// [Side] of travel from `node` to reach them
    pub fn neighbors(&self, node: NodeId) -> Vec<(Side, NodeId)> {
        let mut out = Vec::new();
        if node.sub_row > 0 {
            out.push((Side::Top, NodeId::new(node.sub_row - 1, node.sub_col)));
        }
        if node.sub_row + 1 < self.sub_rows() {
            out.push((Side::Bottom, NodeId::new(node.sub_row + 1, node.sub_col)));
        }
        if node.sub_col > 0 {
            out.push((Side::Left, NodeId::new(node.sub_row, node.sub_col - 1)));
        }
        if node.sub_col + 1 < self.sub_cols() {
            out.push((Side::Right, NodeId::new(node.sub_row, node.sub_col + 1)));
        }
        out
    }

    //mp is_traversable
    /// Whether `node` may be entered by a connection whose endpoint
    /// blocks are `start_block_idx`/`end_block_idx`
    pub fn is_traversable(&self, node: NodeId, layout: &BlockLayout, start_block_idx: usize, end_block_idx: usize) -> bool {
        match self.classify(node, layout) {
            NodeClass::Inside { block_idx } => {
                block_idx == start_block_idx
                    || block_idx == end_block_idx
                    || layout.blocks[block_idx].attributes.pass_through == Some(true)
            }
            NodeClass::Border { .. } | NodeClass::Free => true,
        }
    }

    //mp border_nodes_of
    /// All border nodes of `block_idx` on the permitted sides in `sides`
    pub fn border_nodes_of(&self, layout: &BlockLayout, block_idx: usize, sides: &SideSet) -> Vec<(Side, NodeId)> {
        self.border_nodes_of_cover(&layout.blocks[block_idx].cover, sides)
    }

    //mp border_nodes_of_cover
    /// All border nodes of an arbitrary rectangular `cover` on the
    /// permitted sides in `sides`; used both for a whole block's cover
    /// and for a connection endpoint narrowed to a single cell within a
    /// block (a `{block: tag}` endpoint target, §6)
    pub fn border_nodes_of_cover(&self, cover: &Cover, sides: &SideSet) -> Vec<(Side, NodeId)> {
        let k = self.k;
        let (lo, hi) = self.interior_band();
        let cover = *cover;
        let mut out = Vec::new();
        for (side, allowed) in [
            (Side::Top, sides.contains(Side::Top)),
            (Side::Bottom, sides.contains(Side::Bottom)),
            (Side::Left, sides.contains(Side::Left)),
            (Side::Right, sides.contains(Side::Right)),
        ] {
            if !allowed {
                continue;
            }
            match side {
                Side::Top => {
                    let rs = if lo == 0 { 0 } else { lo - 1 };
                    for col in cover.col0..=cover.col1 {
                        for cs in lo..=hi {
                            out.push((side, NodeId::new(cover.row0 * k + rs, col * k + cs)));
                        }
                    }
                }
                Side::Bottom => {
                    let rs = (hi + 1).min(k - 1);
                    for col in cover.col0..=cover.col1 {
                        for cs in lo..=hi {
                            out.push((side, NodeId::new(cover.row1 * k + rs, col * k + cs)));
                        }
                    }
                }
                Side::Left => {
                    let cs = if lo == 0 { 0 } else { lo - 1 };
                    for row in cover.row0..=cover.row1 {
                        for rs in lo..=hi {
                            out.push((side, NodeId::new(row * k + rs, cover.col0 * k + cs)));
                        }
                    }
                }
                Side::Right => {
                    let cs = (hi + 1).min(k - 1);
                    for row in cover.row0..=cover.row1 {
                        for rs in lo..=hi {
                            out.push((side, NodeId::new(row * k + rs, cover.col1 * k + cs)));
                        }
                    }
                }
            }
        }
        out
    }

    //zz All done
}

//mt Test for RefinementGrid
#[cfg(test)]
mod test_refinement_grid {
    use super::*;
    use crate::attributes::Attributes;
    use crate::grid::{Block, Cover, Grid};

    fn one_block_layout() -> BlockLayout {
        let grid = Grid::from_rows(vec![vec![Some("a".into())]]);
        let block = Block {
            name: "a".into(),
            cover: Cover { row0: 0, row1: 0, col0: 0, col1: 0 },
            attributes: Attributes::default(),
            is_auto: false,
        };
        BlockLayout { grid, blocks: vec![block] }
    }

    #[test]
    fn test_classify_inside_and_border() {
        let layout = one_block_layout();
        let rg = RefinementGrid::new(1, 1, 3);
        let inside = rg.classify(NodeId::new(1, 1), &layout);
        assert_eq!(inside, NodeClass::Inside { block_idx: 0 });
        let top = rg.classify(NodeId::new(0, 1), &layout);
        assert_eq!(top, NodeClass::Border { block_idx: 0, side: Side::Top });
    }

    #[test]
    fn test_neighbors_bounded() {
        let rg = RefinementGrid::new(2, 2, 3);
        let corner = rg.neighbors(NodeId::new(0, 0));
        assert_eq!(corner.len(), 2);
        let center = rg.neighbors(NodeId::new(3, 3));
        assert_eq!(center.len(), 4);
    }

    #[test]
    fn test_is_traversable_respects_pass_through() {
        let mut layout = one_block_layout();
        let rg = RefinementGrid::new(1, 1, 3);
        assert!(!rg.is_traversable(NodeId::new(1, 1), &layout, 5, 6));
        layout.blocks[0].attributes.pass_through = Some(true);
        assert!(rg.is_traversable(NodeId::new(1, 1), &layout, 5, 6));
    }
}
