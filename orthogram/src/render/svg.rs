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

@file    svg.rs
@brief   SVG implementation of the Renderer back-end contract
 */

//a Documentation
/*!
# SVG Renderer

Builds an [SvgElement] tree one primitive at a time, then emits it as
an XML document through [ElementIter] and `xml::writer::EventWriter`,
the same two-stage approach the teacher's own SVG backend takes
(build the tree eagerly, serialize it afterwards) rather than writing
XML events directly as each primitive is drawn.
!*/

//a Imports
use super::{DefaultFontMetrics, ElementIter, FontMetrics, Renderer, SvgElement, TextMetrics};
use crate::attributes::{Attributes, TextOrientation};
use crate::error::{OrthogramError, Result};
use geometry::{Point, Rectangle};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

//a SvgRenderer
//tp SvgRenderer
/// A [Renderer] that accumulates drawing calls into an in-memory SVG
/// element tree, and writes the whole document out on `end_image`
pub struct SvgRenderer {
    font_metrics: DefaultFontMetrics,
    root: Option<SvgElement>,
}

//ip Default for SvgRenderer
impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

//ip SvgRenderer
impl SvgRenderer {
    //fp new
    /// A renderer with no image open yet
    pub fn new() -> Self {
        Self { font_metrics: DefaultFontMetrics, root: None }
    }

    //mp push
    fn push(&mut self, e: SvgElement) {
        self.root.as_mut().expect("begin_image must be called before drawing").add_child(e);
    }

    //fp polyline_path
    fn polyline_path(points: &[Point]) -> String {
        let mut d = String::new();
        for (i, p) in points.iter().enumerate() {
            let cmd = if i == 0 { "M" } else { "L" };
            d.push_str(&format!("{} {:.4},{:.4} ", cmd, p.x, p.y));
        }
        d
    }

    //fp stroke_element
    fn stroke_element(points: &[Point], color_hex: &str, width: f64, dash: Option<&[f64]>) -> SvgElement {
        let mut e = SvgElement::new("path");
        e.add_attribute("fill", "none");
        e.add_attribute("stroke", color_hex);
        e.add_size("stroke-width", width);
        if let Some(d) = dash {
            let pattern = d.iter().map(|v| format!("{:.4}", v)).collect::<Vec<_>>().join(",");
            e.add_attribute("stroke-dasharray", &pattern);
        }
        e.add_attribute("d", &Self::polyline_path(points));
        e
    }
}

//ip Renderer for SvgRenderer
impl Renderer for SvgRenderer {
    //mp measure_text
    fn measure_text(&self, text: &str, attrs: &Attributes) -> TextMetrics {
        self.font_metrics.measure(text, attrs)
    }

    //mp rectangle
    fn rectangle(&mut self, rect: Rectangle, attrs: &Attributes) {
        let mut e = SvgElement::new("rect");
        e.add_size("x", rect.x0);
        e.add_size("y", rect.y0);
        e.add_size("width", rect.width());
        e.add_size("height", rect.height());
        match attrs.fill {
            Some(c) if c.a > 0.0 => e.add_attribute("fill", &c.to_rgb_hex()),
            _ => e.add_attribute("fill", "none"),
        }
        if let Some(stroke) = attrs.stroke {
            e.add_attribute("stroke", &stroke.to_rgb_hex());
            e.add_size("stroke-width", attrs.stroke_width.unwrap_or(1.0));
        }
        self.push(e);
    }

    //mp polyline
    fn polyline(&mut self, points: &[Point], attrs: &Attributes) {
        if points.len() < 2 {
            return;
        }
        let dash = attrs.stroke_dasharray.as_deref();
        if let Some(buffer) = attrs.buffer_fill {
            let buffer_width = attrs.buffer_width.unwrap_or(0.0).max(attrs.stroke_width.unwrap_or(1.0) * 2.0);
            self.push(Self::stroke_element(points, &buffer.to_rgb_hex(), buffer_width, None));
        }
        let stroke = attrs.stroke.unwrap_or(crate::attributes::Color::BLACK);
        let width = attrs.stroke_width.unwrap_or(1.0);
        self.push(Self::stroke_element(points, &stroke.to_rgb_hex(), width, dash));
    }

    //mp arrowhead
    fn arrowhead(&mut self, tip: Point, direction: Point, attrs: &Attributes) {
        let base = attrs.arrow_base.unwrap_or(8.0);
        let aspect = attrs.arrow_aspect.unwrap_or(0.5);
        let len = direction.len();
        let (ux, uy) = if len > 1e-9 { (direction.x / len, direction.y / len) } else { (1.0, 0.0) };
        let (px, py) = (-uy, ux);
        let half_width = base * aspect;
        let back = Point::new(tip.x - ux * base, tip.y - uy * base);
        let left = Point::new(back.x + px * half_width, back.y + py * half_width);
        let right = Point::new(back.x - px * half_width, back.y - py * half_width);

        let mut e = SvgElement::new("polygon");
        let pts = format!("{:.4},{:.4} {:.4},{:.4} {:.4},{:.4}", tip.x, tip.y, left.x, left.y, right.x, right.y);
        e.add_attribute("points", &pts);
        let fill = attrs.stroke.unwrap_or(crate::attributes::Color::BLACK);
        e.add_attribute("fill", &fill.to_rgb_hex());
        self.push(e);
    }

    //mp text
    fn text(&mut self, x: f64, y: f64, content: &str, attrs: &Attributes, orientation: TextOrientation) {
        let mut e = SvgElement::new("text");
        e.add_size("x", x);
        e.add_size("y", y);
        if let Some(fill) = attrs.text_fill {
            e.add_attribute("fill", &fill.to_rgb_hex());
        }
        e.add_attribute("font-family", attrs.font_family.as_deref().unwrap_or("sans-serif"));
        e.add_size("font-size", attrs.font_size.unwrap_or(12.0));
        if matches!(attrs.font_weight, Some(crate::attributes::FontWeight::Bold)) {
            e.add_attribute("font-weight", "bold");
        }
        if matches!(attrs.font_style, Some(crate::attributes::FontStyle::Italic)) {
            e.add_attribute("font-style", "italic");
        } else if matches!(attrs.font_style, Some(crate::attributes::FontStyle::Oblique)) {
            e.add_attribute("font-style", "oblique");
        }
        if matches!(orientation, TextOrientation::Vertical) {
            e.add_attribute("transform", &format!("rotate(-90 {:.4} {:.4})", x, y));
        }
        e.add_attribute("text-anchor", "middle");
        e.add_string(content);
        self.push(e);
    }

    //mp begin_image
    fn begin_image(&mut self, width: f64, height: f64) -> Result<()> {
        let mut svg = SvgElement::new("svg");
        svg.add_attribute("xmlns", "http://www.w3.org/2000/svg");
        svg.add_attribute("version", "1.1");
        svg.add_size("width", width);
        svg.add_size("height", height);
        svg.add_attribute("viewBox", &format!("0 0 {:.4} {:.4}", width, height));
        self.root = Some(svg);
        Ok(())
    }

    //mp end_image
    fn end_image(&mut self, path: &Path) -> Result<()> {
        let root = self.root.take().ok_or_else(|| OrthogramError::render("end_image called with no open image"))?;
        let file = File::create(path).map_err(|e| OrthogramError::render(format!("cannot create '{}': {}", path.display(), e)))?;
        let writer = BufWriter::new(file);
        let mut emitter = xml::writer::EventWriter::new_with_config(writer, xml::writer::EmitterConfig::new().perform_indent(true));
        for event in ElementIter::new(&root) {
            if let Some(we) = event.as_writer_event() {
                emitter.write(we).map_err(|e| OrthogramError::render(format!("writing '{}': {}", path.display(), e)))?;
            }
        }
        Ok(())
    }
}

//mt Test for SvgRenderer
#[cfg(test)]
mod test_svg_renderer {
    use super::*;
    use crate::attributes::Color;

    #[test]
    fn test_measure_text_scales_with_font_size() {
        let renderer = SvgRenderer::new();
        let mut attrs = Attributes::builtin_defaults();
        attrs.font_size = Some(10.0);
        let small = renderer.measure_text("hello", &attrs);
        attrs.font_size = Some(20.0);
        let large = renderer.measure_text("hello", &attrs);
        assert!(large.width > small.width);
    }

    #[test]
    fn test_begin_end_image_roundtrip() {
        let mut renderer = SvgRenderer::new();
        renderer.begin_image(100.0, 50.0).unwrap();
        let mut attrs = Attributes::builtin_defaults();
        attrs.fill = Some(Color::WHITE);
        renderer.rectangle(Rectangle::new(0.0, 0.0, 100.0, 50.0), &attrs);
        let out = std::env::temp_dir().join(format!("orthogram-svg-test-{}.svg", std::process::id()));
        renderer.end_image(&out).unwrap();
        let contents = std::fs::read_to_string(&out).unwrap();
        assert!(contents.contains("<svg"));
        assert!(contents.contains("<rect"));
        let _ = std::fs::remove_file(&out);
    }
}
