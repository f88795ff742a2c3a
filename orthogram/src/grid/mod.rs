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
@brief   The Grid Builder: tags on a rectangular grid to rectangular blocks
 */

//a Documentation
/*!
# Grid Builder

Turns the user's row-of-tags grid and block definitions into the
*Block Layout*: a padded grid plus an ordered list of [Block]s, each
with a validated rectangular cover and resolved attributes.

Leftover tags (cells tagged with something that is neither a block
name nor listed as one of a block's extra `tags`) become *autoblocks*,
drawn before the explicit blocks (§4.1).
!*/

//a Imports
use crate::attributes::{style::StyleTable, Attributes};
use crate::error::{OrthogramError, Result};
use std::collections::HashMap;

//a Cover
//tp Cover
/// An inclusive rectangular range of grid cells: `[row0,row1] x [col0,col1]`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cover {
    /// First (topmost) row, inclusive
    pub row0: usize,
    /// Last (bottommost) row, inclusive
    pub row1: usize,
    /// First (leftmost) column, inclusive
    pub col0: usize,
    /// Last (rightmost) column, inclusive
    pub col1: usize,
}

//ip Cover
impl Cover {
    //mp contains
    /// Return true if `(row, col)` lies within this cover
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row0 && row <= self.row1 && col >= self.col0 && col <= self.col1
    }

    //mp width
    /// Number of columns spanned
    pub fn width(&self) -> usize {
        self.col1 + 1 - self.col0
    }

    //mp height
    /// Number of rows spanned
    pub fn height(&self) -> usize {
        self.row1 + 1 - self.row0
    }
}

//a Grid
//tp Grid
/// The `R x C` matrix of cells, each optionally tagged; rows are
/// padded to the width of the longest row with anonymous cells
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<String>>,
}

//ip Grid
impl Grid {
    //fp from_rows
    /// Build a padded grid from ordered row tag lists
    pub fn from_rows(row_tags: Vec<Vec<Option<String>>>) -> Self {
        let rows = row_tags.len();
        let cols = row_tags.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut cells = vec![None; rows * cols];
        for (r, row) in row_tags.into_iter().enumerate() {
            for (c, tag) in row.into_iter().enumerate() {
                cells[r * cols + c] = tag;
            }
        }
        Self { rows, cols, cells }
    }

    //mp rows
    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    //mp cols
    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    //mp tag_at
    /// The tag at `(row, col)`, if any
    pub fn tag_at(&self, row: usize, col: usize) -> Option<&str> {
        self.cells[row * self.cols + col].as_deref()
    }

    //mp cells_with_tag
    /// All `(row, col)` cells carrying exactly this tag, in row-major order
    pub fn cells_with_tag(&self, tag: &str) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.tag_at(r, c) == Some(tag) {
                    out.push((r, c));
                }
            }
        }
        out
    }

    //mp leftover_tags
    /// Tags present in the grid that are not in `claimed`, in
    /// first-appearance (row-major) order
    pub fn leftover_tags(&self, claimed: &std::collections::HashSet<String>) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if let Some(tag) = self.tag_at(r, c) {
                    if !claimed.contains(tag) && seen.insert(tag.to_string()) {
                        out.push(tag.to_string());
                    }
                }
            }
        }
        out
    }

    //zz All done
}

//a BlockDef
//tp BlockDef
/// An explicit block definition as it appears in a DDF document, prior
/// to cover resolution
#[derive(Clone, Debug)]
pub struct BlockDef {
    /// The block's name; also its primary tag
    pub name: String,
    /// Extra tags whose cells also belong to this block's cover
    pub tags: Vec<String>,
    /// This block's own explicit attributes
    pub attributes: Attributes,
}

//a Block
//tp Block
/// A named rectangular area of the grid with resolved attributes
#[derive(Clone, Debug)]
pub struct Block {
    /// The block's name (its tag, for autoblocks)
    pub name: String,
    /// Validated rectangular cover
    pub cover: Cover,
    /// Fully resolved attributes (styles folded in)
    pub attributes: Attributes,
    /// True if this block was synthesized from a leftover tag
    pub is_auto: bool,
}

//a BlockLayout
//tp BlockLayout
/// The Grid Builder's output: the padded grid plus blocks in draw order
#[derive(Clone, Debug)]
pub struct BlockLayout {
    /// The padded grid
    pub grid: Grid,
    /// Blocks in draw order: autoblocks first (first-appearance order
    /// of their tag), then explicit blocks in definition order
    pub blocks: Vec<Block>,
}

//ip BlockLayout
impl BlockLayout {
    //mp find
    /// Look up a block by name
    pub fn find(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }
}

//fp bounding_cover
/// The minimal axis-aligned bounding rectangle of a non-empty set of cells
fn bounding_cover(cells: &[(usize, usize)]) -> Option<Cover> {
    let mut it = cells.iter();
    let &(r0, c0) = it.next()?;
    let (mut row0, mut row1, mut col0, mut col1) = (r0, r0, c0, c0);
    for &(r, c) in it {
        row0 = row0.min(r);
        row1 = row1.max(r);
        col0 = col0.min(c);
        col1 = col1.max(c);
    }
    Some(Cover { row0, row1, col0, col1 })
}

//fp validate_cover
/// Validate that `cells` exactly fill `cover`'s rectangle, and that no
/// cell inside that rectangle is tagged with a *foreign* tag (one
/// belonging to another block's declared tag set)
fn validate_cover(name: &str, grid: &Grid, cover: &Cover, own_tags: &std::collections::HashSet<&str>, foreign_tags: &std::collections::HashSet<&str>) -> Result<()> {
    for r in cover.row0..=cover.row1 {
        for c in cover.col0..=cover.col1 {
            if let Some(tag) = grid.tag_at(r, c) {
                if foreign_tags.contains(tag) && !own_tags.contains(tag) {
                    return Err(OrthogramError::layout(format!(
                        "block '{}' cover at ({},{}) overlaps foreign tag '{}'",
                        name, r, c, tag
                    )));
                }
            }
        }
    }
    let covered: std::collections::HashSet<(usize, usize)> = (cover.row0..=cover.row1)
        .flat_map(|r| (cover.col0..=cover.col1).map(move |c| (r, c)))
        .filter(|&(r, c)| own_tags.iter().any(|t| grid.tag_at(r, c) == Some(t)))
        .collect();
    let expected: std::collections::HashSet<(usize, usize)> =
        own_tags.iter().flat_map(|t| grid.cells_with_tag(t)).collect();
    if covered != expected {
        return Err(OrthogramError::layout(format!(
            "block '{}' does not have a rectangular cover",
            name
        )));
    }
    Ok(())
}

//fp build
/// Run the Grid Builder: validate explicit blocks, synthesize
/// autoblocks from leftover tags, resolve attributes, and order for
/// drawing (§4.1)
pub fn build(grid: Grid, block_defs: Vec<BlockDef>, styles: &StyleTable, autoblock_attrs: &Attributes) -> Result<BlockLayout> {
    let mut seen_names = std::collections::HashSet::new();
    for b in &block_defs {
        if !seen_names.insert(b.name.clone()) {
            return Err(OrthogramError::definition(format!("duplicate block name '{}'", b.name)));
        }
    }
    // a tag is "claimed" by a block if it is that block's name or one of its extra tags
    let mut tag_owner: HashMap<String, String> = HashMap::new();
    for b in &block_defs {
        for tag in std::iter::once(&b.name).chain(b.tags.iter()) {
            if let Some(owner) = tag_owner.get(tag) {
                if owner != &b.name {
                    return Err(OrthogramError::definition(format!(
                        "tag '{}' claimed by both block '{}' and block '{}'",
                        tag, owner, b.name
                    )));
                }
            }
            tag_owner.insert(tag.clone(), b.name.clone());
        }
    }

    let mut explicit_blocks = Vec::new();
    for b in &block_defs {
        let own_tags: std::collections::HashSet<&str> =
            std::iter::once(b.name.as_str()).chain(b.tags.iter().map(String::as_str)).collect();
        let foreign_tags: std::collections::HashSet<&str> = tag_owner
            .iter()
            .filter(|(_, owner)| *owner != &b.name)
            .map(|(tag, _)| tag.as_str())
            .collect();
        let cells: Vec<(usize, usize)> = own_tags.iter().flat_map(|t| grid.cells_with_tag(t)).collect();
        if cells.is_empty() {
            return Err(OrthogramError::layout(format!("block '{}' has zero-cell cover", b.name)));
        }
        let cover = bounding_cover(&cells).unwrap();
        validate_cover(&b.name, &grid, &cover, &own_tags, &foreign_tags)?;
        let attributes = styles.resolve_block(&b.attributes);
        explicit_blocks.push(Block { name: b.name.clone(), cover, attributes, is_auto: false });
    }

    let claimed: std::collections::HashSet<String> = tag_owner.keys().cloned().collect();
    let leftover = grid.leftover_tags(&claimed);
    let mut auto_blocks = Vec::new();
    for tag in leftover {
        let own_tags: std::collections::HashSet<&str> = std::iter::once(tag.as_str()).collect();
        let cells = grid.cells_with_tag(&tag);
        let cover = bounding_cover(&cells).unwrap();
        // an autoblock's foreign set is every explicit tag; leftover tags cannot
        // collide with each other by construction (each cell has one tag)
        let foreign_tags: std::collections::HashSet<&str> = claimed.iter().map(String::as_str).collect();
        validate_cover(&tag, &grid, &cover, &own_tags, &foreign_tags)?;
        let attributes = styles.resolve_block(autoblock_attrs);
        auto_blocks.push(Block { name: tag, cover, attributes, is_auto: true });
    }

    let mut blocks = auto_blocks;
    blocks.extend(explicit_blocks);
    Ok(BlockLayout { grid, blocks })
}

//mt Test for Grid Builder
#[cfg(test)]
mod test_grid_builder {
    use super::*;

    fn row(tags: &[&str]) -> Vec<Option<String>> {
        tags.iter().map(|t| if t.is_empty() { None } else { Some(t.to_string()) }).collect()
    }

    #[test]
    fn test_padding() {
        let grid = Grid::from_rows(vec![row(&["a", "b"]), row(&["c"])]);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.tag_at(1, 1), None);
    }

    #[test]
    fn test_simple_block_and_autoblock() {
        let grid = Grid::from_rows(vec![row(&["a", "a"]), row(&["leftover", "leftover"])]);
        let defs = vec![BlockDef { name: "a".into(), tags: vec![], attributes: Attributes::default() }];
        let styles = StyleTable::new();
        let layout = build(grid, defs, &styles, &Attributes::default()).unwrap();
        assert_eq!(layout.blocks.len(), 2);
        assert!(layout.blocks[0].is_auto);
        assert_eq!(layout.blocks[0].name, "leftover");
        assert_eq!(layout.blocks[1].name, "a");
    }

    #[test]
    fn test_non_rectangular_cover_errors() {
        let grid = Grid::from_rows(vec![row(&["a", "a"]), row(&["a", "b"])]);
        let defs = vec![
            BlockDef { name: "a".into(), tags: vec![], attributes: Attributes::default() },
            BlockDef { name: "b".into(), tags: vec![], attributes: Attributes::default() },
        ];
        let styles = StyleTable::new();
        assert!(build(grid, defs, &styles, &Attributes::default()).is_err());
    }

    #[test]
    fn test_duplicate_name_errors() {
        let grid = Grid::from_rows(vec![row(&["a"])]);
        let defs = vec![
            BlockDef { name: "a".into(), tags: vec![], attributes: Attributes::default() },
            BlockDef { name: "a".into(), tags: vec![], attributes: Attributes::default() },
        ];
        let styles = StyleTable::new();
        assert!(build(grid, defs, &styles, &Attributes::default()).is_err());
    }
}
