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
@brief   The Renderer Adapter's drawing back-end contract
 */

//a Documentation
/*!
# Renderer Back-End

The core pipeline talks to the drawing surface only through the
[Renderer] trait (§6): text measurement, filled/stroked rectangles,
orthogonal polylines with optional buffer, arrowheads, text runs, and a
scoped image lifecycle (`begin_image`/`end_image`) that brackets
acquisition and release of whatever output resource the backend holds.

[svg::SvgRenderer] is the one concrete backend this workspace ships,
grounded in the teacher's `SvgElement`/`ElementIter` tree-builder
pattern. [DefaultFontMetrics] approximates text extents the way the
teacher's own `Font`/`FontMetrics` pair does, in the absence of a real
font-shaping library.
!*/

//a Imports and exports
pub mod svg;
mod svg_element;

pub use svg_element::{ElementIter, SvgElement};

use crate::attributes::{Attributes, TextOrientation};
use crate::error::Result;
use geometry::{Point, Rectangle};
use std::path::Path;

//a TextMetrics
//tp TextMetrics
/// The measured extent of a run of text set at a given font
#[derive(Clone, Copy, Debug)]
pub struct TextMetrics {
    /// Advance width of the whole run
    pub width: f64,
    /// Distance from the baseline to the top of the font's em-box
    pub ascender: f64,
    /// Distance from the baseline to the bottom of the font's em-box
    pub descender: f64,
}

//ip TextMetrics
impl TextMetrics {
    //mp height
    /// Total em-box height (ascender + descender)
    pub fn height(&self) -> f64 {
        self.ascender + self.descender
    }
}

//a FontMetrics
//tp FontMetrics
/// Something that can measure a run of text set with a given
/// [Attributes]' font fields
pub trait FontMetrics {
    /// Measure `text` as it would be set using `attrs`'s font fields
    fn measure(&self, text: &str, attrs: &Attributes) -> TextMetrics;
}

//tp DefaultFontMetrics
/// An approximate [FontMetrics]: average character advance width is a
/// fixed fraction of the point size, since no real font-shaping
/// backend is in scope (§4.9)
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFontMetrics;

//ip FontMetrics for DefaultFontMetrics
impl FontMetrics for DefaultFontMetrics {
    fn measure(&self, text: &str, attrs: &Attributes) -> TextMetrics {
        let size = attrs.font_size.unwrap_or(12.0);
        let width = text.chars().count() as f64 * size * 0.5;
        let height = size;
        TextMetrics { width, ascender: height * 1.1, descender: height * 0.3 }
    }
}

//a Renderer
//tp Renderer
/// The drawing back-end contract the Renderer Adapter drives (§6)
pub trait Renderer {
    /// Measure a run of text as it would be set using `attrs`
    fn measure_text(&self, text: &str, attrs: &Attributes) -> TextMetrics;

    /// Draw a filled and/or stroked axis-aligned rectangle
    fn rectangle(&mut self, rect: Rectangle, attrs: &Attributes);

    /// Stroke an orthogonal polyline; if `attrs.buffer_fill` is set, a
    /// wider buffer stroke is drawn first, underneath
    fn polyline(&mut self, points: &[Point], attrs: &Attributes);

    /// Draw one arrowhead with its base centred at `tip`, pointing
    /// along `direction` (need not be normalized)
    fn arrowhead(&mut self, tip: Point, direction: Point, attrs: &Attributes);

    /// Draw a text run anchored at `(x, y)` with the given orientation
    fn text(&mut self, x: f64, y: f64, content: &str, attrs: &Attributes, orientation: TextOrientation);

    /// Open the output surface, sized `width` x `height` before `scale`
    /// is applied (the Sizer has already applied `scale` to every
    /// other coordinate, so the surface itself is opened at the final,
    /// scaled size)
    fn begin_image(&mut self, width: f64, height: f64) -> Result<()>;

    /// Close the output surface, writing it to `path`
    fn end_image(&mut self, path: &Path) -> Result<()>;
}

//zz All done
