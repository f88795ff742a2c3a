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

@file    point.rs
@brief   Part of geometry library
 */

//a Point
//tp Point
#[derive(Clone, Copy, PartialEq, Debug)]
/// A simple point class for two dimensions
pub struct Point {
    /// Coordinate
    pub x: f64,
    /// Coordinate
    pub y: f64,
}

//ti Display for Point
impl std::fmt::Display for Point {
    //mp fmt - format a Point for display
    /// Display the `Point` as (x,y)
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }

    //zz All done
}

//ti Point
impl Point {
    //fp new
    /// Create a new point from (x,y)
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    //fp origin
    /// Create a new point at (0,0)
    pub const fn origin() -> Self {
        Self { x: 0., y: 0. }
    }

    //mp is_origin
    /// Return true if the point is the origin
    pub fn is_origin(&self) -> bool {
        self.x == 0. && self.y == 0.
    }

    //cp scale
    /// Consume the point and return a new point scaled in x and y by
    /// a single factor
    pub fn scale(mut self, s: f64) -> Self {
        self.x *= s;
        self.y *= s;
        self
    }

    //cp scale_xy
    /// Consume the point and return a new point scaled in x and y by
    /// two different factors
    pub fn scale_xy(mut self, sx: f64, sy: f64) -> Self {
        self.x *= sx;
        self.y *= sy;
        self
    }

    //cp add
    /// Consume the point and return the sum of this point and a
    /// scaled other point
    pub fn add(mut self, other: &Self, scale: f64) -> Self {
        self.x += other.x * scale;
        self.y += other.y * scale;
        self
    }

    //mp len2
    /// Return the squared distance of the point from the origin
    pub fn len2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    //mp len
    /// Return the distance of the point from the origin
    pub fn len(&self) -> f64 {
        self.len2().sqrt()
    }

    //mp distance
    /// Return the distance between this and another point
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    //zz All done
}

//mt Test for Point
#[cfg(test)]
mod test_point {
    use super::*;
    pub fn pt_eq(pt: &Point, x: f64, y: f64) {
        assert!((pt.x - x).abs() < 1E-8, "mismatch in x {:?} {} {}", pt, x, y);
        assert!((pt.y - y).abs() < 1E-8, "mismatch in y {:?} {} {}", pt, x, y);
    }

    #[test]
    fn test_simple() {
        pt_eq(&Point::origin(), 0., 0.);
        pt_eq(&Point::new(1., 2.), 1., 2.);
        assert!(Point::origin().is_origin());
        assert!(!Point::new(0.1, 0.).is_origin());
        pt_eq(&Point::new(1., 2.).scale_xy(3., 4.), 3., 8.);
        assert_eq!(Point::origin().len2(), 0.);
        assert_eq!(Point::new(3., 4.).len(), 5.);
        assert_eq!(Point::new(0., 0.).distance(&Point::new(3., 4.)), 5.);
    }
}
