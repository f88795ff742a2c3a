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
@brief   DDF loader: YAML/JSON documents, CSV row includes, include resolution
 */

//a Documentation
/*!
# DDF Loader

Parses a Diagram Definition File (§6) into the typed inputs the Grid
Builder, Attributes resolver and Connection table consume:
[Document::rows], [Document::blocks], [Document::connections],
[Document::styles], [Document::groups] and [Document::diagram].

Grounded in `serde` + `serde_yaml` (primary format) and `serde_json`
(structurally equivalent, read the same way since both implement
`serde::Deserialize`), plus the `csv` crate for CSV row includes — in
place of the teacher's bespoke `hml-rs`/`hmlm` markup reader, which
parses an unrelated indented tag language rather than this
specification's YAML/JSON/CSV contract.

`include` entries are resolved depth-first: each file is loaded at
most once (canonicalized paths recorded in a visited set so cycles
silently deduplicate), an included file's own sections are merged in
first, and finally the including file's own sections are merged on top
— scalars overridden, sequences appended (§6).
!*/

//a Imports
use crate::attributes::{style::StyleTable, Attributes};
use crate::connection::{ConnectionDef, EndpointRef};
use crate::error::{OrthogramError, Result};
use crate::grid::BlockDef;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

//a RawEndpoint
//tp RawEndpoint
/// One `start`/`end` field as it appears in a DDF document: a single
/// block name, a list of names (Cartesian product), or a `{block:
/// tag}` mapping targeting one cell within a block (§6)
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum RawEndpoint {
    /// `{block: tag}`
    Cell(HashMap<String, String>),
    /// `[name, name, ...]`
    List(Vec<String>),
    /// `name`
    Single(String),
}

//ip RawEndpoint
impl RawEndpoint {
    //mp into_refs
    /// Expand into the ordered list of [EndpointRef]s this field denotes
    fn into_refs(self) -> Result<Vec<EndpointRef>> {
        match self {
            RawEndpoint::Single(name) => Ok(vec![EndpointRef::Block(name)]),
            RawEndpoint::List(names) => Ok(names.into_iter().map(EndpointRef::Block).collect()),
            RawEndpoint::Cell(map) => {
                if map.len() != 1 {
                    return Err(OrthogramError::definition(
                        "a {block: tag} connection endpoint must name exactly one block",
                    ));
                }
                let (block, tag) = map.into_iter().next().unwrap();
                Ok(vec![EndpointRef::Cell { block, tag }])
            }
        }
    }
}

//a RawLabel
//tp RawLabel
/// A `start_label`/`middle_label`/`end_label`/`label` field: a plain
/// string, or a mapping carrying its own text plus attribute overrides
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    /// Plain text, no attribute overrides
    Text(String),
    /// `{label: "...", <attrs>}`
    WithAttrs(Attributes),
}

//a RawBlock
//tp RawBlock
/// One entry of the `blocks` sequence
///
/// `#[serde(deny_unknown_fields)]` cannot be combined with `flatten`,
/// so unknown per-block keys surface instead as an "unknown field"
/// error from the flattened [Attributes] deserializer itself.
#[derive(Clone, Debug, Deserialize)]
struct RawBlock {
    name: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(flatten)]
    attributes: Attributes,
}

//a RawConnection
//tp RawConnection
/// One entry of the `connections` sequence (see [RawBlock] for why
/// this cannot also carry `deny_unknown_fields`)
#[derive(Clone, Debug, Deserialize)]
struct RawConnection {
    start: RawEndpoint,
    end: RawEndpoint,
    #[serde(default)]
    start_label: Option<RawLabel>,
    #[serde(default)]
    middle_label: Option<RawLabel>,
    #[serde(default)]
    end_label: Option<RawLabel>,
    /// Alias for `middle_label`
    #[serde(default)]
    label: Option<RawLabel>,
    #[serde(flatten)]
    attributes: Attributes,
}

//ip RawConnection
impl RawConnection {
    //mp into_def
    fn into_def(self) -> Result<ConnectionDef> {
        let mut attributes = self.attributes;
        let start_label = resolve_label(self.start_label, &mut attributes);
        let middle_label = resolve_label(self.middle_label.or(self.label), &mut attributes);
        let end_label = resolve_label(self.end_label, &mut attributes);
        if start_label.is_some() {
            attributes.start_label = start_label;
        }
        if middle_label.is_some() {
            attributes.middle_label = middle_label;
        }
        if end_label.is_some() {
            attributes.end_label = end_label;
        }
        Ok(ConnectionDef { starts: self.start.into_refs()?, ends: self.end.into_refs()?, attributes })
    }
}

//fp resolve_label
/// Resolve one label slot: a plain string just supplies the text; a
/// mapping may additionally override attributes on the owning
/// connection (e.g. a label-specific font), which are folded in
/// immediately since a DDF document has no finer-grained attribute
/// carrier than the connection itself
fn resolve_label(raw: Option<RawLabel>, owner: &mut Attributes) -> Option<String> {
    match raw {
        None => None,
        Some(RawLabel::Text(s)) => Some(s),
        Some(RawLabel::WithAttrs(attrs)) => {
            let text = attrs.label.clone();
            *owner = owner.clone().fold(&attrs);
            text
        }
    }
}

//a RawInclude
//tp RawInclude
/// One entry of the `include` sequence
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInclude {
    path: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    delimiter: Option<String>,
}

//a RawDocument
//tp RawDocument
/// The top-level shape of one DDF file; unknown keys are rejected (§6)
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct RawDocument {
    diagram: Attributes,
    rows: Vec<Vec<Option<String>>>,
    blocks: Vec<RawBlock>,
    connections: Vec<RawConnection>,
    styles: StyleTable,
    groups: HashMap<String, Attributes>,
    include: Vec<RawInclude>,
}

//a Document
//tp Document
/// The fully merged, include-resolved DDF document
pub struct Document {
    /// The diagram's own explicit attributes, before style resolution
    pub diagram: Attributes,
    /// Row-of-tags grid source
    pub rows: Vec<Vec<Option<String>>>,
    /// Explicit block definitions, pre-cover-resolution
    pub blocks: Vec<BlockDef>,
    /// Connection definitions, pre-Cartesian-expansion
    pub connections: Vec<ConnectionDef>,
    /// Merged named-style table
    pub styles: StyleTable,
    /// Merged `groups` table
    pub groups: HashMap<String, Attributes>,
}

//fp detect_format
/// Decide whether a path denotes a YAML/JSON document or a CSV rows
/// file, by extension (`.csv`/`.txt` => CSV, everything else => YAML),
/// unless an explicit `type` is given
fn detect_format(path: &Path, explicit: Option<&str>) -> &'static str {
    if let Some(t) = explicit {
        return if t.eq_ignore_ascii_case("csv") { "csv" } else { "yaml" };
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("txt") => "csv",
        _ => "yaml",
    }
}

//fp load_csv_rows
/// Load a CSV file as `rows` contributions only (§6 `include`)
fn load_csv_rows(path: &Path, delimiter: &str) -> Result<Vec<Vec<Option<String>>>> {
    let delim = delimiter.as_bytes().first().copied().unwrap_or(b',');
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| OrthogramError::definition(format!("reading CSV include '{}': {}", path.display(), e)))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| OrthogramError::definition(format!("reading CSV include '{}': {}", path.display(), e)))?;
        rows.push(
            record
                .iter()
                .map(|field| if field.trim().is_empty() { None } else { Some(field.to_string()) })
                .collect(),
        );
    }
    Ok(rows)
}

//fp parse_yaml_text
/// Parse YAML (or structurally-equivalent JSON) document text into a
/// [RawDocument]
fn parse_yaml_text(text: &str, origin: &str) -> Result<RawDocument> {
    serde_yaml::from_str(text).map_err(|e| OrthogramError::definition(format!("parsing '{}': {}", origin, e)))
}

//a MergedSections
//tp MergedSections
/// The running accumulator folded depth-first across `include` files
/// and the main document (§6)
#[derive(Default)]
struct MergedSections {
    diagram: Attributes,
    rows: Vec<Vec<Option<String>>>,
    blocks: Vec<RawBlock>,
    connections: Vec<RawConnection>,
    styles: StyleTable,
    groups: HashMap<String, Attributes>,
}

//ip From<RawDocument> for MergedSections
impl From<RawDocument> for MergedSections {
    fn from(doc: RawDocument) -> Self {
        Self {
            diagram: doc.diagram,
            rows: doc.rows,
            blocks: doc.blocks,
            connections: doc.connections,
            styles: doc.styles,
            groups: doc.groups,
        }
    }
}

//ip MergedSections
impl MergedSections {
    //mp merge_in
    /// Fold `other`'s sections on top of `self`: the diagram's scalar
    /// attributes are overridden (later wins), sequences are appended,
    /// and the style/group maps are overridden entry-by-entry (§6) —
    /// used both for a nested include's already-merged sections and
    /// for the owning file's own raw sections
    fn merge_in(&mut self, other: MergedSections) {
        self.diagram = self.diagram.clone().fold(&other.diagram);
        self.rows.extend(other.rows);
        self.blocks.extend(other.blocks);
        self.connections.extend(other.connections);
        self.styles.merge(other.styles);
        for (name, attrs) in other.groups {
            self.groups.insert(name, attrs);
        }
    }
}

//fp load_file
/// Load one DDF file (recursively resolving its own `include`
/// entries), returning the merged sections contributed by it and
/// everything it includes
fn load_file(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<MergedSections> {
    let canonical = path
        .canonicalize()
        .map_err(|e| OrthogramError::definition(format!("cannot read '{}': {}", path.display(), e)))?;
    if !visited.insert(canonical.clone()) {
        // already loaded on this include path: silently deduplicate (§6)
        return Ok(MergedSections::default());
    }

    let text = std::fs::read_to_string(&canonical)
        .map_err(|e| OrthogramError::definition(format!("cannot read '{}': {}", path.display(), e)))?;
    let doc = parse_yaml_text(&text, &path.display().to_string())?;
    let base_dir = canonical.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut merged = MergedSections::default();
    for inc in &doc.include {
        let inc_path = base_dir.join(&inc.path);
        let format = detect_format(&inc_path, inc.kind.as_deref());
        if format == "csv" {
            let delimiter = inc.delimiter.clone().unwrap_or_else(|| ",".to_string());
            // a CSV include contributes rows only, and is not itself
            // subject to include-cycle tracking beyond a single visit
            if visited.insert(inc_path.canonicalize().unwrap_or_else(|_| inc_path.clone())) {
                merged.rows.extend(load_csv_rows(&inc_path, &delimiter)?);
            }
        } else {
            let nested = load_file(&inc_path, visited)?;
            merged.merge_in(nested);
        }
    }
    merged.merge_in(MergedSections::from(doc));
    Ok(merged)
}

//a load
//fp load
/// Load a DDF document from `path`, resolving `include`s depth-first,
/// and return the merged, typed [Document] ready for the Grid Builder
/// and Attributes resolver
pub fn load(path: &Path) -> Result<Document> {
    let mut visited = HashSet::new();
    let merged = load_file(path, &mut visited)?;

    let mut block_defs = Vec::with_capacity(merged.blocks.len());
    for b in merged.blocks {
        block_defs.push(BlockDef { name: b.name, tags: b.tags, attributes: b.attributes });
    }

    let mut connections = Vec::with_capacity(merged.connections.len());
    for c in merged.connections {
        connections.push(c.into_def()?);
    }

    Ok(Document {
        diagram: merged.diagram,
        rows: merged.rows,
        blocks: block_defs,
        connections,
        styles: merged.styles,
        groups: merged.groups,
    })
}

//mt Test for DDF Loader
#[cfg(test)]
mod test_loader {
    use super::*;
    use std::io::Write;

    fn write_tmp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("orthogram-test-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_minimal_document_parses() {
        let path = write_tmp(
            "minimal.yaml",
            r#"
rows:
  - [a]
  - [~, b]
blocks:
  - name: a
  - name: b
connections:
  - start: a
    end: b
"#,
        );
        let doc = load(&path).unwrap();
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.connections.len(), 1);
    }

    #[test]
    fn test_unknown_key_is_definition_error() {
        let path = write_tmp("bad.yaml", "bogus_key: 1\n");
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_cartesian_endpoint_list() {
        let path = write_tmp(
            "cart.yaml",
            r#"
rows:
  - [a, b, c]
blocks:
  - name: a
  - name: b
  - name: c
connections:
  - start: [a, b]
    end: c
"#,
        );
        let doc = load(&path).unwrap();
        let expanded = doc.connections[0].expand();
        assert_eq!(expanded.len(), 2);
    }

    #[test]
    fn test_diamond_include_loads_shared_file_once() {
        let d_path = write_tmp("d.yaml", "rows:\n  - [d]\n");
        let b_path = write_tmp("b.yaml", &format!("include:\n  - path: {}\nrows:\n  - [b]\n", d_path.display()));
        let c_path = write_tmp("c.yaml", &format!("include:\n  - path: {}\nrows:\n  - [c]\n", d_path.display()));
        let a_path = write_tmp(
            "a.yaml",
            &format!(
                "include:\n  - path: {}\n  - path: {}\nrows:\n  - [a]\n",
                b_path.display(),
                c_path.display()
            ),
        );
        let doc = load(&a_path).unwrap();
        // d's row appears exactly once even though both b and c include it
        let d_rows = doc.rows.iter().filter(|r| r.first() == Some(&Some("d".to_string()))).count();
        assert_eq!(d_rows, 1);
        assert_eq!(doc.rows.len(), 4);
    }

    #[test]
    fn test_scalar_attribute_override_by_including_file() {
        let base = write_tmp("base.yaml", "diagram:\n  scale: 1.0\nrows:\n  - [a]\n");
        let top = write_tmp("top.yaml", &format!("include:\n  - path: {}\ndiagram:\n  scale: 2.0\n", base.display()));
        let doc = load(&top).unwrap();
        assert_eq!(doc.diagram.scale, Some(2.0));
    }
}
