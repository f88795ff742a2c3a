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
@brief   The flat attribute record shared by diagram/block/connection/style
 */

//a Documentation
/*!
# Attributes

A diagram, a block, a connection, a named style and a group all carry
the same flat [Attributes] record: every field is an `Option`, and an
entity's *resolved* attributes are built by folding, in increasing
priority, built-in defaults, a `default_block`/`default_connection`
style if present, the entity's own named style list (later entries
override earlier ones), and finally the entity's own explicit
attributes (§3, §6 of the specification).

Styles cannot reference other styles, so this fold terminates in one
pass — there is no cycle to detect.

The "applicable attribute matrix" of design note 9 is realised as a
set of typed accessor methods grouped by entity kind
([BlockAttributes], [ConnectionAttributes], [DiagramAttributes]) each
returning a required value with its built-in default baked in, rather
than a dynamic map: which accessors a caller may use is fixed at
compile time by which of those three thin wrapper types it holds.
!*/

//a Imports and exports
mod color;
mod side;
pub mod style;

pub use color::Color;
pub use side::{Side, SideSet};
pub use style::StyleTable;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

//a Enums
//tp LabelPosition
/// Anchor position for a block label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    /// Centred
    Center,
    /// Top edge, centred
    Top,
    /// Top-left corner
    TopLeft,
    /// Top-right corner
    TopRight,
    /// Bottom edge, centred
    Bottom,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom-right corner
    BottomRight,
}

//tp ConnectionLabelPosition
/// Anchor position for a connection label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionLabelPosition {
    /// At the first vertex of the route
    Start,
    /// At the midpoint of the route's total length
    Middle,
    /// At the last vertex of the route
    End,
}

//tp TextOrientation
/// How a text run is drawn relative to its containing box or segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOrientation {
    /// Always horizontal
    Horizontal,
    /// Always vertical (rotated 90 degrees)
    Vertical,
    /// Parallel to the segment it labels (connection labels only)
    Follow,
}

//tp FontStyle
/// CSS-style font style
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    /// Upright
    Normal,
    /// Italic
    Italic,
    /// Oblique
    Oblique,
}

//tp FontWeight
/// CSS-style font weight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Regular weight
    Normal,
    /// Bold weight
    Bold,
}

//a Attributes
//tp Attributes
/// The flat, optional-everything attribute record attached to a
/// diagram, a block, a connection, a group or a named style
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// Explicit named styles to inherit from, in increasing priority
    #[serde(default)]
    pub styles: Vec<String>,

    /// Fill color
    pub fill: Option<Color>,
    /// Stroke color
    pub stroke: Option<Color>,
    /// Stroke width
    pub stroke_width: Option<f64>,
    /// Dash pattern, alternating on/off lengths
    pub stroke_dasharray: Option<Vec<f64>>,

    /// Label text
    pub label: Option<String>,
    /// Block label anchor
    pub label_position: Option<LabelPosition>,
    /// Connection start label text
    pub start_label: Option<String>,
    /// Connection middle label text (also settable via `label`)
    pub middle_label: Option<String>,
    /// Connection end label text
    pub end_label: Option<String>,
    /// Minimum distance from a label to the thing it labels
    pub label_distance: Option<f64>,
    /// Text fill color
    pub text_fill: Option<Color>,
    /// Line height multiplier for multi-line labels
    pub text_line_height: Option<f64>,
    /// Text orientation
    pub text_orientation: Option<TextOrientation>,
    /// Font family name
    pub font_family: Option<String>,
    /// Font size in drawing units
    pub font_size: Option<f64>,
    /// Font style
    pub font_style: Option<FontStyle>,
    /// Font weight
    pub font_weight: Option<FontWeight>,

    /// Draw a forward arrowhead at the connection's end
    pub arrow_forward: Option<bool>,
    /// Draw a back arrowhead at the connection's start
    pub arrow_back: Option<bool>,
    /// Arrowhead base (length along the segment) in drawing units
    pub arrow_base: Option<f64>,
    /// Arrowhead aspect ratio (base:width)
    pub arrow_aspect: Option<f64>,

    /// Buffer stroke color (drawn wider, underneath the connection)
    pub buffer_fill: Option<Color>,
    /// Buffer stroke width
    pub buffer_width: Option<f64>,

    /// Top margin (outside the block's stroke)
    pub margin_top: Option<f64>,
    /// Bottom margin
    pub margin_bottom: Option<f64>,
    /// Left margin
    pub margin_left: Option<f64>,
    /// Right margin
    pub margin_right: Option<f64>,
    /// Top padding (inside the block's stroke)
    pub padding_top: Option<f64>,
    /// Bottom padding
    pub padding_bottom: Option<f64>,
    /// Left padding
    pub padding_left: Option<f64>,
    /// Right padding
    pub padding_right: Option<f64>,

    /// Minimum inner width of a block
    pub min_width: Option<f64>,
    /// Minimum inner height of a block
    pub min_height: Option<f64>,

    /// Minimum spacing between adjacent parallel connection channels
    pub connection_distance: Option<f64>,
    /// Whether same-group overlapping segments collapse into one line
    pub collapse_connections: Option<bool>,
    /// Uniform scale applied to the whole diagram at the end of layout
    pub scale: Option<f64>,

    /// Drawing priority (higher draws later/on top); also used to
    /// order connection groups
    pub drawing_priority: Option<f64>,
    /// Connection group name
    pub group: Option<String>,
    /// Permitted entry sides on the end block
    pub entrances: Option<SideSet>,
    /// Permitted exit sides on the start block
    pub exits: Option<SideSet>,
    /// Whether other connections may cross this block's interior
    pub pass_through: Option<bool>,
}

//ip Attributes
impl Attributes {
    //fp builtin_defaults
    /// The built-in fallback values used when nothing else (style,
    /// explicit attribute) supplies a value
    pub fn builtin_defaults() -> Self {
        Self {
            fill: Some(Color::NONE),
            stroke: Some(Color::BLACK),
            stroke_width: Some(1.0),
            stroke_dasharray: None,
            label_position: Some(LabelPosition::Center),
            label_distance: Some(2.0),
            text_fill: Some(Color::BLACK),
            text_line_height: Some(1.2),
            text_orientation: Some(TextOrientation::Horizontal),
            font_family: Some("sans-serif".into()),
            font_size: Some(12.0),
            font_style: Some(FontStyle::Normal),
            font_weight: Some(FontWeight::Normal),
            arrow_forward: Some(true),
            arrow_back: Some(false),
            arrow_base: Some(8.0),
            arrow_aspect: Some(0.5),
            buffer_fill: None,
            buffer_width: Some(0.0),
            margin_top: Some(4.0),
            margin_bottom: Some(4.0),
            margin_left: Some(4.0),
            margin_right: Some(4.0),
            padding_top: Some(2.0),
            padding_bottom: Some(2.0),
            padding_left: Some(2.0),
            padding_right: Some(2.0),
            min_width: Some(0.0),
            min_height: Some(0.0),
            connection_distance: Some(4.0),
            collapse_connections: Some(false),
            scale: Some(1.0),
            drawing_priority: Some(0.0),
            group: None,
            entrances: Some(SideSet::all()),
            exits: Some(SideSet::all()),
            pass_through: Some(false),
            ..Default::default()
        }
    }

    //mp fold
    /// Consume `self` as the base, and return a new record where every
    /// field set in `overlay` replaces the base's field; fields not
    /// set in `overlay` keep the base's value
    pub fn fold(mut self, overlay: &Attributes) -> Self {
        macro_rules! take {
            ($f:ident) => {
                if overlay.$f.is_some() {
                    self.$f = overlay.$f.clone();
                }
            };
        }
        take!(fill);
        take!(stroke);
        take!(stroke_width);
        take!(stroke_dasharray);
        take!(label);
        take!(label_position);
        take!(start_label);
        take!(middle_label);
        take!(end_label);
        take!(label_distance);
        take!(text_fill);
        take!(text_line_height);
        take!(text_orientation);
        take!(font_family);
        take!(font_size);
        take!(font_style);
        take!(font_weight);
        take!(arrow_forward);
        take!(arrow_back);
        take!(arrow_base);
        take!(arrow_aspect);
        take!(buffer_fill);
        take!(buffer_width);
        take!(margin_top);
        take!(margin_bottom);
        take!(margin_left);
        take!(margin_right);
        take!(padding_top);
        take!(padding_bottom);
        take!(padding_left);
        take!(padding_right);
        take!(min_width);
        take!(min_height);
        take!(connection_distance);
        take!(collapse_connections);
        take!(scale);
        take!(drawing_priority);
        take!(group);
        take!(entrances);
        take!(exits);
        take!(pass_through);
        self
    }

    //mp resolve
    /// Resolve an entity's final attributes: built-in defaults, then
    /// (if present) the `default_style`, then each of the entity's
    /// named styles in order, then the entity's own explicit
    /// attributes — matching §3's inheritance order
    pub fn resolve(&self, styles: &HashMap<String, Attributes>, default_style: Option<&Attributes>) -> Attributes {
        let mut resolved = Attributes::builtin_defaults();
        if let Some(d) = default_style {
            resolved = resolved.fold(d);
        }
        for name in &self.styles {
            if let Some(s) = styles.get(name) {
                resolved = resolved.fold(s);
            }
        }
        resolved.fold(self)
    }

    //zz All done
}

//mt Test for Attributes
#[cfg(test)]
mod test_attributes {
    use super::*;

    #[test]
    fn test_fold_precedence() {
        let mut base = Attributes::builtin_defaults();
        let mut overlay = Attributes::default();
        overlay.stroke_width = Some(3.0);
        base = base.fold(&overlay);
        assert_eq!(base.stroke_width, Some(3.0));
        // Fields untouched by the overlay keep the base's value
        assert_eq!(base.fill, Some(Color::NONE));
    }

    #[test]
    fn test_resolve_order() {
        let mut styles = HashMap::new();
        let mut red_stroke = Attributes::default();
        red_stroke.stroke = Some(Color::new(1., 0., 0.));
        styles.insert("red".to_string(), red_stroke);

        let mut default_block = Attributes::default();
        default_block.stroke_width = Some(2.0);

        let mut entity = Attributes::default();
        entity.styles = vec!["red".to_string()];
        entity.fill = Some(Color::WHITE);

        let resolved = entity.resolve(&styles, Some(&default_block));
        assert_eq!(resolved.stroke, Some(Color::new(1., 0., 0.)));
        assert_eq!(resolved.stroke_width, Some(2.0));
        assert_eq!(resolved.fill, Some(Color::WHITE));
    }

    #[test]
    fn test_entity_explicit_wins_over_style() {
        let mut styles = HashMap::new();
        let mut red_stroke = Attributes::default();
        red_stroke.stroke = Some(Color::new(1., 0., 0.));
        styles.insert("red".to_string(), red_stroke);

        let mut entity = Attributes::default();
        entity.styles = vec!["red".to_string()];
        entity.stroke = Some(Color::new(0., 1., 0.));

        let resolved = entity.resolve(&styles, None);
        assert_eq!(resolved.stroke, Some(Color::new(0., 1., 0.)));
    }
}
