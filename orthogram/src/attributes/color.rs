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

@file    color.rs
@brief   RGBA color values for fills, strokes and text
 */

//a Imports
use serde::{Deserialize, Serialize};

//a Color
//tp Color
/// An RGBA color, each channel in `[0,1]`
///
/// DDF documents supply colors as `[r,g,b]` or `[r,g,b,a]` triples/quads
/// in `[0,1]`; `a` defaults to fully opaque.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Color {
    /// Red channel, `[0,1]`
    pub r: f64,
    /// Green channel, `[0,1]`
    pub g: f64,
    /// Blue channel, `[0,1]`
    pub b: f64,
    /// Alpha channel, `[0,1]`, 0 is fully transparent
    pub a: f64,
}

//ip Color
impl Color {
    /// Fully transparent black, the default fill for shapes with no
    /// explicit fill
    pub const NONE: Color = Color { r: 0., g: 0., b: 0., a: 0. };
    /// Opaque black
    pub const BLACK: Color = Color { r: 0., g: 0., b: 0., a: 1. };
    /// Opaque white
    pub const WHITE: Color = Color { r: 1., g: 1., b: 1., a: 1. };

    //fp new
    /// Create a new opaque color from `(r,g,b)`
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1. }
    }

    //fp with_alpha
    /// Create a new color from `(r,g,b,a)`
    pub const fn with_alpha(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    //mp to_rgb_hex
    /// Format as a `#rrggbb` hex string suitable for SVG
    pub fn to_rgb_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r.clamp(0., 1.) * 255.).round() as u8,
            (self.g.clamp(0., 1.) * 255.).round() as u8,
            (self.b.clamp(0., 1.) * 255.).round() as u8,
        )
    }

    //zz All done
}

//ip TryFrom<Vec<f64>> for Color
impl TryFrom<Vec<f64>> for Color {
    type Error = String;
    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        match v.len() {
            3 => Ok(Color::new(v[0], v[1], v[2])),
            4 => Ok(Color::with_alpha(v[0], v[1], v[2], v[3])),
            n => Err(format!("color must have 3 or 4 components, found {}", n)),
        }
    }
}

//ip From<Color> for Vec<f64>
impl From<Color> for Vec<f64> {
    fn from(c: Color) -> Self {
        vec![c.r, c.g, c.b, c.a]
    }
}

//mt Test for Color
#[cfg(test)]
mod test_color {
    use super::*;

    #[test]
    fn test_triple_quad() {
        assert_eq!(Color::try_from(vec![1., 0., 0.]).unwrap(), Color::new(1., 0., 0.));
        assert_eq!(
            Color::try_from(vec![1., 0., 0., 0.5]).unwrap(),
            Color::with_alpha(1., 0., 0., 0.5)
        );
        assert!(Color::try_from(vec![1., 0.]).is_err());
    }

    #[test]
    fn test_hex() {
        assert_eq!(Color::new(1., 0., 0.).to_rgb_hex(), "#ff0000");
        assert_eq!(Color::BLACK.to_rgb_hex(), "#000000");
    }
}
