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

@file    svg_element.rs
@brief   A tiny in-memory XML element tree and its event iterator
 */

//a Imports
use xml::attribute::Attribute;
use xml::common::XmlVersion;
use xml::name::Name;
use xml::namespace::Namespace;
use xml::reader::XmlEvent;

//a SvgElement
//tp SvgElement
/// One element of the tree being built up for the final document; a
/// document is a single root [SvgElement] with nested `contents`
pub struct SvgElement {
    pub(super) name: String,
    pub(super) attributes: Vec<(String, String)>,
    pub(super) contents: Vec<SvgElement>,
    pub(super) characters: Option<String>,
}

//ip SvgElement
impl SvgElement {
    //fp new
    /// Start a new, childless element with the given tag name
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), attributes: Vec::new(), contents: Vec::new(), characters: None }
    }

    //mp add_attribute
    /// Add one `name="value"` attribute
    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.attributes.push((name.to_string(), value.to_string()));
    }

    //mp add_size
    /// Add a numeric attribute, formatted to four decimal places
    pub fn add_size(&mut self, name: &str, value: f64) {
        self.add_attribute(name, &format!("{:.4}", value));
    }

    //mp add_string
    /// Set this element's text content
    pub fn add_string(&mut self, s: &str) {
        self.characters = Some(s.to_string());
    }

    //mp add_child
    /// Append a fully-built child element
    pub fn add_child(&mut self, child: SvgElement) {
        self.contents.push(child);
    }

    //zz All done
}

//a ElementIter
//ti IterState
#[derive(Debug)]
enum IterState {
    PreDocument,
    PreElement,
    PreString,
    PreContent,
    PostContent,
    FindNextElement,
    DocumentEnd,
    Completed,
}

//tp ElementIter
/// Walks an [SvgElement] tree depth-first, yielding the
/// `xml::reader::XmlEvent`s an `xml::writer::EventWriter` needs to
/// reproduce it, in the same style as the teacher's SVG emitter
pub struct ElementIter<'a> {
    state: IterState,
    elements: Vec<(&'a SvgElement, usize)>,
}

//ip ElementIter
impl<'a> ElementIter<'a> {
    //fp new
    /// Start iterating the document rooted at `e`
    pub fn new(e: &'a SvgElement) -> Self {
        Self { state: IterState::PreDocument, elements: vec![(e, 0)] }
    }
}

//ip Iterator for ElementIter
impl<'a> Iterator for ElementIter<'a> {
    type Item = XmlEvent;
    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            IterState::PreDocument => {
                self.state = IterState::PreElement;
                Some(XmlEvent::StartDocument { version: XmlVersion::Version10, encoding: "UTF-8".to_string(), standalone: None })
            }
            IterState::PreElement => {
                let (ele, n) = self.elements.pop().unwrap();
                self.state = IterState::PreString;
                let name = Name::local(&ele.name).to_owned();
                let namespace = Namespace::empty();
                let mut attributes = Vec::new();
                for (n, v) in &ele.attributes {
                    let name = Name::local(n);
                    attributes.push(Attribute::new(name, v).to_owned());
                }
                self.elements.push((ele, n));
                Some(XmlEvent::StartElement { name, attributes, namespace })
            }
            IterState::PreString => {
                let (ele, n) = self.elements.pop().unwrap();
                self.state = IterState::PreContent;
                if let Some(s) = &ele.characters {
                    self.elements.push((ele, n));
                    Some(XmlEvent::Characters(s.to_string()))
                } else {
                    self.elements.push((ele, n));
                    self.next()
                }
            }
            IterState::PreContent => {
                let (ele, n) = self.elements.pop().unwrap();
                if n < ele.contents.len() {
                    let next_ele = &ele.contents[n];
                    self.elements.push((ele, n));
                    self.elements.push((next_ele, 0));
                    self.state = IterState::PreElement;
                } else {
                    self.state = IterState::PostContent;
                    self.elements.push((ele, n));
                }
                self.next()
            }
            IterState::PostContent => {
                let (ele, n) = self.elements.pop().unwrap();
                self.state = IterState::FindNextElement;
                let name = Name::local(&ele.name).to_owned();
                self.elements.push((ele, n));
                Some(XmlEvent::EndElement { name })
            }
            IterState::FindNextElement => {
                if self.elements.len() > 1 {
                    let (_ele, _n) = self.elements.pop().unwrap();
                    let (ele, n) = self.elements.pop().unwrap();
                    if n + 1 < ele.contents.len() {
                        let next_ele = &ele.contents[n + 1];
                        self.elements.push((ele, n + 1));
                        self.elements.push((next_ele, 0));
                        self.state = IterState::PreElement;
                    } else {
                        self.elements.push((ele, n + 1));
                        self.state = IterState::PostContent;
                    }
                } else {
                    self.state = IterState::DocumentEnd;
                }
                self.next()
            }
            IterState::DocumentEnd => {
                self.state = IterState::Completed;
                Some(XmlEvent::EndDocument)
            }
            IterState::Completed => None,
        }
    }
}
