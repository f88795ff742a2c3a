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

@file    style.rs
@brief   The named-style table of a diagram
 */

//a Imports
use super::Attributes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

//a StyleTable
//tp StyleTable
/// The `styles` section of a DDF document: a flat map of name to
/// partial [Attributes], plus the two reserved names that are applied
/// automatically to every block or connection that does not otherwise
/// name them
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StyleTable {
    /// Named styles, keyed by name as they appear in a `styles` list
    #[serde(flatten)]
    named: HashMap<String, Attributes>,
}

//ip StyleTable
impl StyleTable {
    /// Reserved style name applied to every block unless overridden
    pub const DEFAULT_BLOCK: &'static str = "default_block";
    /// Reserved style name applied to every connection unless overridden
    pub const DEFAULT_CONNECTION: &'static str = "default_connection";

    //fp new
    /// An empty style table
    pub fn new() -> Self {
        Self::default()
    }

    //mp get
    /// Look up a named style
    pub fn get(&self, name: &str) -> Option<&Attributes> {
        self.named.get(name)
    }

    //mp default_block
    /// The `default_block` style, if the document defines one
    pub fn default_block(&self) -> Option<&Attributes> {
        self.get(Self::DEFAULT_BLOCK)
    }

    //mp default_connection
    /// The `default_connection` style, if the document defines one
    pub fn default_connection(&self) -> Option<&Attributes> {
        self.get(Self::DEFAULT_CONNECTION)
    }

    //mp resolve_plain
    /// Resolve an entity that has no reserved default style of its own
    /// (the diagram itself, or a group record) against this table:
    /// built-in defaults, this entity's own named styles, then its own
    /// explicit attributes
    pub fn resolve_plain(&self, own: &Attributes) -> Attributes {
        own.resolve(&self.named, None)
    }

    //mp resolve_block
    /// Resolve a block's own [Attributes] against this table
    pub fn resolve_block(&self, own: &Attributes) -> Attributes {
        own.resolve(&self.named, self.default_block())
    }

    //mp resolve_connection
    /// Resolve a connection's own [Attributes] against this table
    pub fn resolve_connection(&self, own: &Attributes) -> Attributes {
        own.resolve(&self.named, self.default_connection())
    }

    //mp merge
    /// Merge another style table into this one; entries in `other`
    /// override entries of the same name already present — this is
    /// the rule used when an `include`d document contributes its own
    /// `styles` section
    pub fn merge(&mut self, other: StyleTable) {
        for (name, attrs) in other.named {
            self.named.insert(name, attrs);
        }
    }

    //zz All done
}

//mt Test for StyleTable
#[cfg(test)]
mod test_style_table {
    use super::*;
    use crate::attributes::Color;

    #[test]
    fn test_default_block_applies() {
        let mut table = StyleTable::new();
        let mut default_block = Attributes::default();
        default_block.fill = Some(Color::WHITE);
        table.named.insert(StyleTable::DEFAULT_BLOCK.to_string(), default_block);

        let block_attrs = Attributes::default();
        let resolved = table.resolve_block(&block_attrs);
        assert_eq!(resolved.fill, Some(Color::WHITE));
    }

    #[test]
    fn test_merge_overrides() {
        let mut a = StyleTable::new();
        let mut red = Attributes::default();
        red.stroke = Some(Color::new(1., 0., 0.));
        a.named.insert("alert".to_string(), red);

        let mut b = StyleTable::new();
        let mut blue = Attributes::default();
        blue.stroke = Some(Color::new(0., 0., 1.));
        b.named.insert("alert".to_string(), blue);

        a.merge(b);
        assert_eq!(a.get("alert").unwrap().stroke, Some(Color::new(0., 0., 1.)));
    }
}
