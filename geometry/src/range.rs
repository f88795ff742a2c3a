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

@file    range.rs
@brief   Part of geometry library
 */

//a Range
//tp Range
#[derive(Clone, Copy, PartialEq, Debug)]
/// A simple one-dimensional range
///
/// `min < max` for a valid range; `min >= max` indicates an empty range
pub struct Range {
    /// Minimum coordinate of the range
    pub min: f64,
    /// Maximum coordinate of the range
    pub max: f64,
}

//ti Display for Range
impl std::fmt::Display for Range {
    //mp fmt - format a Range for display
    /// Display the `Range` as (min to max)
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({} to {})", self.min, self.max)
    }

    //zz All done
}

//ti Range
impl Range {
    //fp new
    /// Create a new range from (min,max)
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    //fp none
    /// Create a new empty range
    pub const fn none() -> Self {
        Self { min: 0., max: 0. }
    }

    //mp is_none
    /// Return true if the range is empty
    pub fn is_none(&self) -> bool {
        self.min >= self.max
    }

    //cp scale
    /// Consume the range and return a new range scaled by a factor
    pub fn scale(mut self, scale: f64) -> Self {
        self.min *= scale;
        self.max *= scale;
        self
    }

    //cp add
    /// Consume the range and return a new range translated by a value
    pub fn add(mut self, translate: f64) -> Self {
        self.min += translate;
        self.max += translate;
        self
    }

    //mp size
    /// Return the size of the range
    pub fn size(&self) -> f64 {
        if self.is_none() {
            0.
        } else {
            self.max - self.min
        }
    }

    //mp overlaps
    /// Return true if this range shares any point with another
    /// non-empty range
    pub fn overlaps(&self, other: &Range) -> bool {
        !self.is_none() && !other.is_none() && self.min < other.max && other.min < self.max
    }

    //cp union
    /// Consume the range, and find the union with another, returning
    /// the new range
    pub fn union(mut self, other: &Range) -> Self {
        if other.is_none() {
            self
        } else if self.is_none() {
            self.min = other.min;
            self.max = other.max;
            self
        } else {
            if other.min < self.min {
                self.min = other.min;
            }
            if other.max > self.max {
                self.max = other.max;
            }
            self
        }
    }

    //cp intersect
    /// Consume the range, and find the intersection with another,
    /// returning the new region
    pub fn intersect(mut self, other: &Range) -> Self {
        if other.is_none() {
            self
        } else if self.is_none() {
            self.min = other.min;
            self.max = other.max;
            self
        } else {
            if other.min > self.min {
                self.min = other.min;
            }
            if other.max < self.max {
                self.max = other.max;
            }
            self
        }
    }

    //zz All done
}

//mt Test for Range
#[cfg(test)]
mod test_range {
    use super::*;
    pub fn rng_eq(rng: &Range, min: f64, max: f64) {
        assert!((rng.min - min).abs() < 1E-8, "mismatch in min {:?} {} {}", rng, min, max);
        assert!((rng.max - max).abs() < 1E-8, "mismatch in max {:?} {} {}", rng, min, max);
    }

    #[test]
    fn test_simple() {
        assert!(Range::none().is_none());
        rng_eq(&Range::new(1., 2.), 1., 2.);
        assert!(Range::new(0.1, 0.).is_none());
        assert!(!Range::new(0., 0.1).is_none());
        rng_eq(&Range::new(1., 2.).scale(3.), 3., 6.);
        assert_eq!(Range::none().size(), 0.);
        assert_eq!(Range::new(0., 2.).size(), 2.);
    }

    #[test]
    fn test_union_intersect() {
        rng_eq(&Range::new(0., 4.).union(&Range::new(2., 5.)), 0., 5.);
        rng_eq(&Range::new(0., 4.).intersect(&Range::new(2., 5.)), 2., 4.);
    }

    #[test]
    fn test_overlaps() {
        assert!(Range::new(0., 4.).overlaps(&Range::new(2., 5.)));
        assert!(!Range::new(0., 4.).overlaps(&Range::new(4., 5.)));
        assert!(!Range::new(0., 4.).overlaps(&Range::new(5., 6.)));
    }
}
