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
@brief   Label anchor computation for blocks and connections
 */

//a Documentation
/*!
# Label Placement

A block's label anchors at one of nine positions within its inner
rectangle (§6, `label_position`); a connection's start/middle/end
labels anchor along its drawn polyline by arc-length fraction (§3,
Label). `text_orientation: follow` sets a label's rotation to the
direction of the segment it sits on; when that segment is degenerate
(collapsed to zero length) the fallback is the longest non-degenerate
segment of the route, and failing that, horizontal (§9, resolved Open
Question).
!*/

//a Imports
use crate::attributes::{ConnectionLabelPosition, LabelPosition};
use crate::render::TextMetrics;
use geometry::{Point, Rectangle};

//a block_label_anchor
//fp block_label_anchor
/// The baseline anchor point for a block's label, for SVG
/// `text-anchor="middle"` rendering (the x returned is the label's
/// horizontal center, the y its baseline)
pub fn block_label_anchor(inner: &Rectangle, metrics: &TextMetrics, position: LabelPosition) -> Point {
    let cx = (inner.x0 + inner.x1) / 2.0;
    let cy = (inner.y0 + inner.y1) / 2.0;
    let half_width = metrics.width / 2.0;

    let x = match position {
        LabelPosition::TopLeft | LabelPosition::BottomLeft => (inner.x0 + half_width).min(cx),
        LabelPosition::TopRight | LabelPosition::BottomRight => (inner.x1 - half_width).max(cx),
        LabelPosition::Top | LabelPosition::Bottom | LabelPosition::Center => cx,
    };
    let y = match position {
        LabelPosition::Top | LabelPosition::TopLeft | LabelPosition::TopRight => inner.y0 + metrics.ascender,
        LabelPosition::Bottom | LabelPosition::BottomLeft | LabelPosition::BottomRight => inner.y1 - metrics.descender,
        LabelPosition::Center => cy + metrics.height() / 2.0 - metrics.descender,
    };
    Point::new(x, y)
}

//a total_length
//fp total_length
/// Sum of the Euclidean lengths of every segment of a polyline
pub fn total_length(path: &[Point]) -> f64 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

//a longest_segment_direction
//fp longest_segment_direction
/// The direction vector of the longest (non-degenerate) segment of a
/// polyline, or horizontal if every segment is degenerate
fn longest_segment_direction(path: &[Point]) -> Point {
    let mut best_len = 0.0;
    let mut best_dir = Point::new(1.0, 0.0);
    for w in path.windows(2) {
        let len = w[0].distance(&w[1]);
        if len > best_len {
            best_len = len;
            best_dir = Point::new(w[1].x - w[0].x, w[1].y - w[0].y);
        }
    }
    best_dir
}

//a point_at_fraction
//fp point_at_fraction
/// The point at `fraction` of the way along a polyline's total arc
/// length, paired with the direction of the segment it falls on; if
/// that segment is degenerate, falls back to [longest_segment_direction]
/// (§9, resolved Open Question)
pub fn point_at_fraction(path: &[Point], fraction: f64) -> (Point, Point) {
    if path.len() < 2 {
        return (path.first().copied().unwrap_or_else(Point::origin), Point::new(1.0, 0.0));
    }
    let total = total_length(path);
    if total <= 0.0 {
        return (path[0], Point::new(1.0, 0.0));
    }
    let target = total * fraction.clamp(0.0, 1.0);
    let mut acc = 0.0;
    for w in path.windows(2) {
        let seg_len = w[0].distance(&w[1]);
        if seg_len <= 1e-9 {
            continue;
        }
        if acc + seg_len >= target {
            let t = (target - acc) / seg_len;
            let x = w[0].x + (w[1].x - w[0].x) * t;
            let y = w[0].y + (w[1].y - w[0].y) * t;
            return (Point::new(x, y), Point::new(w[1].x - w[0].x, w[1].y - w[0].y));
        }
        acc += seg_len;
    }
    (path[path.len() - 1], longest_segment_direction(path))
}

//a connection_label_anchor
//fp connection_label_anchor
/// The anchor point and orientation direction for a connection's
/// start/middle/end label (§3, Label; §4.6)
pub fn connection_label_anchor(path: &[Point], position: ConnectionLabelPosition) -> (Point, Point) {
    let fraction = match position {
        ConnectionLabelPosition::Start => 0.0,
        ConnectionLabelPosition::Middle => 0.5,
        ConnectionLabelPosition::End => 1.0,
    };
    point_at_fraction(path, fraction)
}

//mt Test for Label Placement
#[cfg(test)]
mod test_label {
    use super::*;
    use crate::render::{DefaultFontMetrics, FontMetrics};
    use crate::attributes::Attributes;

    #[test]
    fn test_center_anchor_is_rectangle_center_x() {
        let inner = Rectangle::new(0.0, 0.0, 100.0, 40.0);
        let metrics = DefaultFontMetrics.measure("hi", &Attributes::builtin_defaults());
        let anchor = block_label_anchor(&inner, &metrics, LabelPosition::Center);
        assert!((anchor.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_left_anchor_is_left_of_center() {
        let inner = Rectangle::new(0.0, 0.0, 100.0, 40.0);
        let metrics = DefaultFontMetrics.measure("a longer label here", &Attributes::builtin_defaults());
        let anchor = block_label_anchor(&inner, &metrics, LabelPosition::TopLeft);
        assert!(anchor.x <= 50.0);
        assert!(anchor.y < 20.0);
    }

    #[test]
    fn test_middle_point_on_straight_path() {
        let path = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let (p, dir) = point_at_fraction(&path, 0.5);
        assert!((p.x - 5.0).abs() < 1e-9);
        assert!((p.y - 0.0).abs() < 1e-9);
        assert!(dir.x > 0.0);
    }

    #[test]
    fn test_degenerate_middle_segment_falls_back_to_longest() {
        // a path whose middle "segment" is a zero-length point (can occur
        // after collapse-to-segments leaves a repeated vertex) still
        // produces a sensible direction, drawn from the longest real run
        let path = vec![Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(0.0, 20.0)];
        let (_, dir) = point_at_fraction(&path, 0.0);
        assert!(dir.y.abs() > 0.0 || dir.x.abs() > 0.0);
    }

    #[test]
    fn test_start_and_end_are_path_endpoints() {
        let path = vec![Point::new(1.0, 2.0), Point::new(3.0, 2.0), Point::new(3.0, 9.0)];
        let (start, _) = connection_label_anchor(&path, ConnectionLabelPosition::Start);
        let (end, _) = connection_label_anchor(&path, ConnectionLabelPosition::End);
        assert_eq!(start, path[0]);
        assert_eq!(end, path[path.len() - 1]);
    }
}
