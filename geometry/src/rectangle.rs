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

@file    rectangle.rs
@brief   Geometry library
 */

//a Imports
use super::{Point, Range};

//a Rectangle
//tp Rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
/// `Rectangle` describes a region bounded by (x0,y0) and (x1,y1). It
/// requires x0 <= x1 and y0 <= y1; if either are equal the region is
/// deemed to be *none*.
pub struct Rectangle {
    /// smaller x coordinate of region
    pub x0: f64,
    /// larger x coordinate of region
    pub x1: f64,
    /// smaller y coordinate of region
    pub y0: f64,
    /// larger y coordinate of region
    pub y1: f64,
}

//ti Display for Rectangle
impl std::fmt::Display for Rectangle {
    //mp fmt - format a Rectangle for display
    /// Display the `Rectangle`
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[({},{}):({},{})]", self.x0, self.y0, self.x1, self.y1)
    }

    //zz All done
}

//ti Rectangle
impl Rectangle {
    //fp none
    /// Create an empty rectangle at the origin
    pub const fn none() -> Self {
        Self { x0: 0., x1: 0., y0: 0., y1: 0. }
    }

    //mp is_none
    /// Return `true` if the rectangle describes a 'none' region
    pub fn is_none(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    //fp new
    /// Make a rectangle from the coordinates supplied, ensuring that
    /// it is correctly ordered
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (x0, x1) = if x0 < x1 { (x0, x1) } else { (x1, x0) };
        let (y0, y1) = if y0 < y1 { (y0, y1) } else { (y1, y0) };
        Self { x0, x1, y0, y1 }
    }

    //cp to_ranges
    /// Set the rectangle to the ranges supplied
    pub fn to_ranges(mut self, x: Range, y: Range) -> Self {
        self.x0 = x.min;
        self.x1 = x.max;
        self.y0 = y.min;
        self.y1 = y.max;
        self
    }

    //fp of_cwh
    /// Generate a rectangle from a centre `Point` and a width/height
    pub fn of_cwh(centre: Point, width: f64, height: f64) -> Self {
        Self::new(
            centre.x - width / 2.,
            centre.y - height / 2.,
            centre.x + width / 2.,
            centre.y + height / 2.,
        )
    }

    //mp xrange
    /// Return the X extent of the rectangle as a `Range`
    pub fn xrange(&self) -> Range {
        Range::new(self.x0, self.x1)
    }

    //mp yrange
    /// Return the Y extent of the rectangle as a `Range`
    pub fn yrange(&self) -> Range {
        Range::new(self.y0, self.y1)
    }

    //mp width
    /// Return the width of the rectangle (`x1` - `x0`)
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    //mp height
    /// Return the height of the rectangle (`y1` - `y0`)
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    //mp get_center
    /// Return the centre of the rectangle
    pub fn get_center(&self) -> Point {
        Point::new((self.x1 + self.x0) / 2., (self.y1 + self.y0) / 2.)
    }

    //cp scale
    /// Consume the rectangle and return a new one scaled by a value
    pub fn scale(mut self, value: f64) -> Self {
        self.x0 *= value;
        self.y0 *= value;
        self.x1 *= value;
        self.y1 *= value;
        self
    }

    //cp enlarge
    /// Consume the rectangle and return a new one enlarged uniformly
    /// by a fixed value on every side
    pub fn enlarge(mut self, value: f64) -> Self {
        self.x0 -= value;
        self.y0 -= value;
        self.x1 += value;
        self.y1 += value;
        self
    }

    //cp reduce
    /// Consume the rectangle and return a new one shrunk uniformly
    /// about its centre by a fixed value on every side
    pub fn reduce(self, value: f64) -> Self {
        self.enlarge(-value)
    }

    //cp pad
    /// Consume the rectangle and return a new one with independent
    /// top/bottom/left/right padding applied outward
    pub fn pad(mut self, top: f64, bottom: f64, left: f64, right: f64) -> Self {
        self.x0 -= left;
        self.x1 += right;
        self.y0 -= top;
        self.y1 += bottom;
        self
    }

    //mp union
    /// Return the union of this rectangle and another
    pub fn union(&self, other: &Rectangle) -> Self {
        if self.is_none() {
            *other
        } else if other.is_none() {
            *self
        } else {
            Self::new(
                self.x0.min(other.x0),
                self.y0.min(other.y0),
                self.x1.max(other.x1),
                self.y1.max(other.y1),
            )
        }
    }

    //mp overlaps
    /// Return true if this rectangle shares any area with another
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        self.xrange().overlaps(&other.xrange()) && self.yrange().overlaps(&other.yrange())
    }

    //mp contains
    /// Return true if this rectangle fully contains another
    pub fn contains(&self, other: &Rectangle) -> bool {
        !self.is_none()
            && !other.is_none()
            && self.x0 <= other.x0
            && other.x1 <= self.x1
            && self.y0 <= other.y0
            && other.y1 <= self.y1
    }

    //zz All done
}

//mt Test for Rectangle
#[cfg(test)]
mod test_rectangle {
    use super::*;

    #[test]
    fn test_simple() {
        let r = Rectangle::new(15., 12., 29., 30.);
        assert_eq!(r.width(), 14.);
        assert_eq!(r.height(), 18.);
        let r2 = r.scale(2.);
        assert_eq!(r2.x0, 30.);
        assert_eq!(r2.x1, 58.);
    }

    #[test]
    fn test_enlarge_reduce() {
        let r = Rectangle::new(15., 12., 29., 30.).enlarge(1.);
        assert_eq!(r.x0, 14.);
        assert_eq!(r.x1, 30.);
        let r2 = r.reduce(1.);
        assert_eq!(r2.x0, 15.);
        assert_eq!(r2.x1, 29.);
    }

    #[test]
    fn test_overlap_contains() {
        let a = Rectangle::new(0., 0., 10., 10.);
        let b = Rectangle::new(5., 5., 15., 15.);
        let c = Rectangle::new(2., 2., 8., 8.);
        assert!(a.overlaps(&b));
        assert!(!a.contains(&b));
        assert!(a.contains(&c));
        assert!(!c.contains(&a));
    }
}
