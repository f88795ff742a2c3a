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

@file    side.rs
@brief   The four sides of a block, and sets of them
 */

//a Imports
use serde::{Deserialize, Serialize};

//a Side
//tp Side
/// One of the four sides of a block's outer rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// North edge (towards decreasing row)
    Top,
    /// South edge (towards increasing row)
    Bottom,
    /// West edge (towards decreasing column)
    Left,
    /// East edge (towards increasing column)
    Right,
}

//ip Side
impl Side {
    /// All four sides, in a fixed canonical order used for
    /// deterministic tie-breaking in the router
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    //mp opposite
    /// Return the side directly across the block from this one
    pub fn opposite(&self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    //mp is_horizontal
    /// Return true if this side runs along a row boundary (top/bottom)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

//a SideSet
//tp SideSet
/// A subset of `{top, bottom, left, right}`, used for `entrances` and
/// `exits` on a connection
///
/// A DDF document spells this as a YAML sequence of side names
/// (`exits: [right, bottom]`), so this type (de)serializes via
/// `Vec<Side>` rather than deriving directly over its four booleans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Side>", into = "Vec<Side>")]
pub struct SideSet {
    top: bool,
    bottom: bool,
    left: bool,
    right: bool,
}

//ip From<Vec<Side>> for SideSet
impl From<Vec<Side>> for SideSet {
    fn from(sides: Vec<Side>) -> Self {
        Self::from_sides(&sides)
    }
}

//ip From<SideSet> for Vec<Side>
impl From<SideSet> for Vec<Side> {
    fn from(set: SideSet) -> Self {
        set.iter().collect()
    }
}

//ip SideSet
impl SideSet {
    //fp all
    /// The set containing all four sides (the default when a
    /// connection does not restrict its entrances/exits)
    pub fn all() -> Self {
        Self { top: true, bottom: true, left: true, right: true }
    }

    //fp from_sides
    /// Build a set from an explicit list of sides
    pub fn from_sides(sides: &[Side]) -> Self {
        let mut s = Self::default();
        for side in sides {
            s.insert(*side);
        }
        s
    }

    //mp insert
    /// Add a side to the set
    pub fn insert(&mut self, side: Side) {
        match side {
            Side::Top => self.top = true,
            Side::Bottom => self.bottom = true,
            Side::Left => self.left = true,
            Side::Right => self.right = true,
        }
    }

    //mp contains
    /// Return true if the set permits this side
    pub fn contains(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    //mp iter
    /// Iterate the permitted sides in `Side::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = Side> + '_ {
        Side::ALL.iter().copied().filter(move |s| self.contains(*s))
    }

    //zz All done
}

//mt Test for SideSet
#[cfg(test)]
mod test_side_set {
    use super::*;

    #[test]
    fn test_all_and_contains() {
        let s = SideSet::all();
        assert!(s.contains(Side::Top) && s.contains(Side::Left));
        let s = SideSet::from_sides(&[Side::Right]);
        assert!(s.contains(Side::Right));
        assert!(!s.contains(Side::Left));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Side::Top.opposite(), Side::Bottom);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }

    #[test]
    fn test_deserializes_from_side_list() {
        let set: SideSet = serde_yaml::from_str("[top, left]").unwrap();
        assert!(set.contains(Side::Top));
        assert!(set.contains(Side::Left));
        assert!(!set.contains(Side::Right));
    }
}
