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
@brief   Connection definitions: endpoint targeting, start/end expansion, group attributes
 */

//a Documentation
/*!
# Connections

A DDF connection definition names its `start` and `end` as one of a
block name, a list of block names, or a `{block: tag}` mapping
targeting one cell within a block's cover (§6). [ConnectionDef::expand]
turns the declared lists into the Cartesian product of independent
[Connection]s, preserving declaration order so routing stays
deterministic (§4.3).

A connection's resolved attributes fold in one extra layer the block
and diagram resolution do not have: the `groups` table, keyed by the
connection's own `group` field, sits between the `default_connection`
style and the connection's own named styles (§6, `groups`).
!*/

//a Imports
use crate::attributes::{Attributes, SideSet, StyleTable};
use crate::error::{OrthogramError, Result};
use crate::grid::{BlockLayout, Cover};
use crate::router::ConnectionEndpoint;
use std::collections::HashMap;

//a EndpointRef
//tp EndpointRef
/// One declared connection endpoint, before resolution against a
/// [BlockLayout]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndpointRef {
    /// The whole of a named block
    Block(String),
    /// One cell within a named block's cover, identified by a tag
    /// distinct from the block's own name (`{block: tag}`)
    Cell {
        /// Name of the block the cell belongs to
        block: String,
        /// Tag identifying the target cell within that block's cover
        tag: String,
    },
}

//ip EndpointRef
impl EndpointRef {
    //mp block_name
    /// The name of the block this endpoint refers to, either way
    pub fn block_name(&self) -> &str {
        match self {
            EndpointRef::Block(name) => name,
            EndpointRef::Cell { block, .. } => block,
        }
    }

    //mp resolve
    /// Resolve this endpoint against a built [BlockLayout]: the index
    /// of its block, and (for a `{block: tag}` endpoint) the narrowed
    /// single-cell cover border nodes should be drawn from
    pub fn resolve(&self, layout: &BlockLayout) -> Result<(usize, Option<Cover>)> {
        let name = self.block_name();
        let block_idx = layout
            .blocks
            .iter()
            .position(|b| b.name == name)
            .ok_or_else(|| OrthogramError::layout(format!("connection references unknown block '{}'", name)))?;
        match self {
            EndpointRef::Block(_) => Ok((block_idx, None)),
            EndpointRef::Cell { tag, .. } => {
                let block = &layout.blocks[block_idx];
                let cells: Vec<(usize, usize)> = layout
                    .grid
                    .cells_with_tag(tag)
                    .into_iter()
                    .filter(|&(r, c)| block.cover.contains(r, c))
                    .collect();
                if cells.is_empty() {
                    return Err(OrthogramError::layout(format!(
                        "connection targets tag '{}' which is not a cell of block '{}'",
                        tag, name
                    )));
                }
                let (mut row0, mut row1, mut col0, mut col1) = (cells[0].0, cells[0].0, cells[0].1, cells[0].1);
                for &(r, c) in &cells[1..] {
                    row0 = row0.min(r);
                    row1 = row1.max(r);
                    col0 = col0.min(c);
                    col1 = col1.max(c);
                }
                Ok((block_idx, Some(Cover { row0, row1, col0, col1 })))
            }
        }
    }
}

//a ConnectionDef
//tp ConnectionDef
/// A connection as declared in a DDF document, before start/end
/// Cartesian expansion
#[derive(Clone, Debug)]
pub struct ConnectionDef {
    /// Declared start endpoints; the Cartesian product with `ends`
    /// produces one [Connection] per pair
    pub starts: Vec<EndpointRef>,
    /// Declared end endpoints
    pub ends: Vec<EndpointRef>,
    /// This connection's own explicit attributes, including any
    /// `group`, `entrances`/`exits` restriction and named style list
    pub attributes: Attributes,
}

//ip ConnectionDef
impl ConnectionDef {
    //mp expand
    /// Expand `starts x ends` into independent [Connection]s,
    /// preserving declaration order (all starts x all ends, §4.3)
    pub fn expand(&self) -> Vec<Connection> {
        let mut out = Vec::with_capacity(self.starts.len() * self.ends.len());
        for start in &self.starts {
            for end in &self.ends {
                out.push(Connection { start: start.clone(), end: end.clone(), attributes: self.attributes.clone() });
            }
        }
        out
    }
}

//a Connection
//tp Connection
/// One fully independent connection, after start/end expansion
#[derive(Clone, Debug)]
pub struct Connection {
    /// Resolved start endpoint reference
    pub start: EndpointRef,
    /// Resolved end endpoint reference
    pub end: EndpointRef,
    /// This connection's own explicit attributes (shared across every
    /// member of the same Cartesian expansion)
    pub attributes: Attributes,
}

//ip Connection
impl Connection {
    //mp resolve_attributes
    /// Fold this connection's attributes against built-in defaults,
    /// the `default_connection` style, this connection's `group`
    /// attributes (if it names a group present in `groups`), its own
    /// named styles in order, and finally its own explicit attributes
    pub fn resolve_attributes(&self, styles: &StyleTable, groups: &HashMap<String, Attributes>) -> Attributes {
        resolve_connection_attributes(&self.attributes, styles, groups)
    }

    //mp resolve_endpoints
    /// Resolve this connection's start/end against a built
    /// [BlockLayout] into the pair of [ConnectionEndpoint]s the router
    /// consumes, using `resolved`'s `exits`/`entrances` for the
    /// permitted sides
    pub fn resolve_endpoints(&self, layout: &BlockLayout, resolved: &Attributes) -> Result<(ConnectionEndpoint, ConnectionEndpoint)> {
        let (start_idx, start_cell) = self.start.resolve(layout)?;
        let (end_idx, end_cell) = self.end.resolve(layout)?;
        let exits = resolved.exits.unwrap_or_else(SideSet::all);
        let entrances = resolved.entrances.unwrap_or_else(SideSet::all);
        let start = ConnectionEndpoint { block_idx: start_idx, sides: exits, cell_cover: start_cell };
        let end = ConnectionEndpoint { block_idx: end_idx, sides: entrances, cell_cover: end_cell };
        Ok((start, end))
    }
}

//fp resolve_connection_attributes
/// Resolve a connection's own attributes against the style table and
/// group table: built-in defaults, `default_connection`, this
/// connection's group attributes, its own named styles in order, then
/// its own explicit attributes (§3, §6 `groups`)
pub fn resolve_connection_attributes(own: &Attributes, styles: &StyleTable, groups: &HashMap<String, Attributes>) -> Attributes {
    let mut resolved = Attributes::builtin_defaults();
    if let Some(default_connection) = styles.default_connection() {
        resolved = resolved.fold(default_connection);
    }
    if let Some(group_name) = &own.group {
        if let Some(group_attrs) = groups.get(group_name) {
            resolved = resolved.fold(group_attrs);
        }
    }
    for name in &own.styles {
        if let Some(style) = styles.get(name) {
            resolved = resolved.fold(style);
        }
    }
    resolved.fold(own)
}

//mt Test for Connections
#[cfg(test)]
mod test_connection {
    use super::*;
    use crate::attributes::{Color, Side};
    use crate::grid::{Block, Grid};

    fn two_block_layout() -> BlockLayout {
        let grid = Grid::from_rows(vec![vec![Some("a".into()), Some("a".into()), Some("b".into())]]);
        let a = Block { name: "a".into(), cover: Cover { row0: 0, row1: 0, col0: 0, col1: 1 }, attributes: Attributes::default(), is_auto: false };
        let b = Block { name: "b".into(), cover: Cover { row0: 0, row1: 0, col0: 2, col1: 2 }, attributes: Attributes::default(), is_auto: false };
        BlockLayout { grid, blocks: vec![a, b] }
    }

    #[test]
    fn test_expand_cartesian_product_preserves_order() {
        let def = ConnectionDef {
            starts: vec![EndpointRef::Block("a".into()), EndpointRef::Block("b".into())],
            ends: vec![EndpointRef::Block("c".into())],
            attributes: Attributes::default(),
        };
        let expanded = def.expand();
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].start.block_name(), "a");
        assert_eq!(expanded[1].start.block_name(), "b");
    }

    #[test]
    fn test_resolve_block_endpoint() {
        let layout = two_block_layout();
        let endpoint = EndpointRef::Block("b".into());
        let (idx, cover) = endpoint.resolve(&layout).unwrap();
        assert_eq!(idx, 1);
        assert!(cover.is_none());
    }

    #[test]
    fn test_resolve_unknown_block_errors() {
        let layout = two_block_layout();
        let endpoint = EndpointRef::Block("nope".into());
        assert!(endpoint.resolve(&layout).is_err());
    }

    #[test]
    fn test_resolve_cell_endpoint_narrows_cover() {
        let mut layout = two_block_layout();
        // tag a single cell inside "a"'s cover distinctly, as a DDF doc would
        // via the block's extra `tags`
        layout.grid = Grid::from_rows(vec![vec![Some("pin".into()), Some("a".into()), Some("b".into())]]);
        let endpoint = EndpointRef::Cell { block: "a".into(), tag: "pin".into() };
        let (idx, cover) = endpoint.resolve(&layout).unwrap();
        assert_eq!(idx, 0);
        let cover = cover.unwrap();
        assert_eq!(cover, Cover { row0: 0, row1: 0, col0: 0, col1: 0 });
    }

    #[test]
    fn test_group_attributes_fold_between_style_and_own() {
        let mut styles = StyleTable::new();
        let _ = &styles;
        let mut groups = HashMap::new();
        let mut group_attrs = Attributes::default();
        group_attrs.stroke = Some(Color::new(1.0, 0.0, 0.0));
        groups.insert("alerts".to_string(), group_attrs);

        let mut own = Attributes::default();
        own.group = Some("alerts".to_string());
        let resolved = resolve_connection_attributes(&own, &styles, &groups);
        assert_eq!(resolved.stroke, Some(Color::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_own_explicit_wins_over_group() {
        let styles = StyleTable::new();
        let mut groups = HashMap::new();
        let mut group_attrs = Attributes::default();
        group_attrs.stroke = Some(Color::new(1.0, 0.0, 0.0));
        groups.insert("alerts".to_string(), group_attrs);

        let mut own = Attributes::default();
        own.group = Some("alerts".to_string());
        own.stroke = Some(Color::new(0.0, 1.0, 0.0));
        let resolved = resolve_connection_attributes(&own, &styles, &groups);
        assert_eq!(resolved.stroke, Some(Color::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_resolve_endpoints_uses_exits_and_entrances() {
        let layout = two_block_layout();
        let conn = Connection {
            start: EndpointRef::Block("a".into()),
            end: EndpointRef::Block("b".into()),
            attributes: Attributes::default(),
        };
        let mut resolved = Attributes::builtin_defaults();
        resolved.exits = Some(SideSet::from_sides(&[Side::Right]));
        let (start, end) = conn.resolve_endpoints(&layout, &resolved).unwrap();
        assert!(start.sides.contains(Side::Right));
        assert!(!start.sides.contains(Side::Top));
        assert!(end.sides.contains(Side::Top));
    }
}
