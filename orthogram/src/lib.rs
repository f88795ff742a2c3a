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

@file    lib.rs
@brief   Orthogram library
 */

//a Documentation
#![warn(missing_docs)]
/*!
# Orthogram library

Orthogram lays out block diagrams whose connections are drawn as
orthogonal (Manhattan) lines: boxes placed on a row/column grid, wired
together by connections that only ever run horizontally or vertically,
turning at right angles.

A diagram is described by a small text format (YAML, JSON or a plain
row-oriented grid notation) naming a grid of blocks, the connections
between them, and a stylesheet of named attribute sets blocks and
connections may inherit from. Orthogram turns that description into an
SVG drawing.

## Pipeline

A [Diagram] is carried through five stages, one verb each:

1. **Load** ([Diagram::load]) parses the definition file into a grid of
   blocks and a resolved, expanded list of connections, each with its
   attributes folded down from style, group and built-in defaults.
2. **Route** ([Diagram::route]) refines the block grid into a finer
   lattice (a configurable subdivision factor per cell) and finds a
   shortest `(length, bends)` orthogonal path for every connection
   across it, recording how much margin each block border must reserve
   for any arrowhead drawn against it.
3. **Optimize** ([Diagram::optimize]) reorders connections so that
   members of a drawing group stay contiguous, merges overlapping
   segments within a collapsing group into a single drawn line, and
   assigns every remaining segment a distinct offset slot wherever it
   would otherwise overlap a neighbour on the same grid line.
4. **Size** ([Diagram::size]) solves for every grid line's final
   position: a minimum-satisfying pass followed by a soft pass that
   treats blocks and segments as springs and relaxes them towards their
   preferred sizes, bounded by the hard minimums.
5. **Render** ([Diagram::render]) draws the sized diagram through a
   [render::Renderer] implementation, in practice [render::svg::SvgRenderer].

## Style propagation

An element's final attributes fold together, in increasing precedence,
the built-in defaults, its named styles (applied in declaration order),
its group's attributes, and its own inline attributes. Nothing is
inherited from a parent element — the grid has no containment
hierarchy among blocks, only the block/connection/diagram levels.

# Open issues

K (the lattice subdivision factor) is currently a crate-wide constant
rather than configurable per diagram; a definition-level override would
let dense diagrams trade routing resolution for solve time.

!*/

//a Modules
pub mod attributes;
pub mod connection;
pub mod definition;
mod diagram;
pub mod error;
pub mod grid;
pub mod label;
pub mod optimize;
pub mod refine;
pub mod render;
pub mod router;
pub mod sizer;

//a Exports
pub use diagram::Diagram;
pub use error::{OrthogramError, Result};
