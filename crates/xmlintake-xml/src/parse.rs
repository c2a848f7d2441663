//! XML parsing: converting an XML document into an [`XmlNode`] tree.
//!
//! The conversion produces the JSON shape of xml2js with `explicitArray: false`:
//!
//! - The result is a single-entry map keyed by the root element name.
//! - An element with only text becomes that text; an empty element becomes `""`.
//! - Otherwise an element becomes a map of, in order, its text under the char
//!   key (`"_"`), its attributes under the attribute key (`"$"`), then its
//!   children by name.
//! - A child name seen once maps to the child value directly; a repeated name
//!   maps to a list of all occurrences.
//!
//! # Example
//!
//! ```
//! use xmlintake_xml::from_xml;
//!
//! let tree = from_xml("<root><a>1</a><a>2</a></root>")?;
//! let json = serde_json::to_string(&tree).unwrap();
//! assert_eq!(json, r#"{"root":{"a":["1","2"]}}"#);
//! # Ok::<(), xmlintake_xml::XmlError>(())
//! ```

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;
use typed_builder::TypedBuilder;

use crate::error::XmlError;
use crate::node::XmlNode;

/// Options controlling the shape of the produced tree.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct ParseOptions {
    /// Key under which an element's attributes are grouped.
    #[builder(default = String::from("$"), setter(into))]
    pub attr_key: String,

    /// Key under which an element's text is stored when it also has attributes or children.
    #[builder(default = String::from("_"), setter(into))]
    pub char_key: String,

    /// Always wrap child values in a list, even for a single occurrence.
    #[builder(default = false)]
    pub explicit_array: bool,

    /// Maximum element nesting depth.
    #[builder(default = 512)]
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            attr_key: String::from("$"),
            char_key: String::from("_"),
            explicit_array: false,
            max_depth: 512,
        }
    }
}

/// Parse an XML document into a tree using the default [`ParseOptions`].
///
/// # Errors
///
/// Returns `XmlError` if the document is not well-formed.
pub fn from_xml(xml: &str) -> Result<XmlNode, XmlError> {
    from_xml_with(xml, &ParseOptions::default())
}

/// Parse an XML document into a tree.
///
/// # Errors
///
/// Returns `XmlError` if the document is not well-formed, contains an unknown
/// entity reference, or nests deeper than [`ParseOptions::max_depth`].
pub fn from_xml_with(xml: &str, options: &ParseOptions) -> Result<XmlNode, XmlError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let element = open_element(&e, &stack, root.as_ref(), options)?;
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = open_element(&e, &stack, root.as_ref(), options)?;
                close_element(element, &mut stack, &mut root, options);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedContent("end tag without matching start tag".to_owned())
                })?;
                close_element(element, &mut stack, &mut root, options);
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|err| XmlError::Decode(err.to_string()))?;
                append_text(&mut stack, &text, false)?;
            }
            Event::CData(e) => {
                let text =
                    std::str::from_utf8(&e).map_err(|err| XmlError::Decode(err.to_string()))?;
                append_text(&mut stack, text, true)?;
            }
            Event::GeneralRef(e) => {
                let name =
                    std::str::from_utf8(&e).map_err(|err| XmlError::Decode(err.to_string()))?;
                let reference = format!("&{name};");
                let resolved = quick_xml::escape::unescape(&reference)
                    .map_err(|err| XmlError::Decode(err.to_string()))?;
                append_text(&mut stack, &resolved, false)?;
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::UnclosedElement(open.name.clone()));
    }

    root.ok_or(XmlError::MissingRoot)
}

/// An element whose end tag has not been seen yet.
#[derive(Debug)]
struct Element {
    name: String,
    text: String,
    cdata: bool,
    attrs: Vec<(String, XmlNode)>,
    children: Vec<(String, XmlNode)>,
    /// Position of each child name in `children`.
    index: HashMap<String, usize>,
}

impl Element {
    /// Add a closed child, merging repeated names into a list.
    fn push_child(&mut self, name: String, value: XmlNode, explicit_array: bool) {
        if let Some(&pos) = self.index.get(&name) {
            append_to(&mut self.children[pos].1, value);
            return;
        }
        let value = if explicit_array {
            XmlNode::List(vec![value])
        } else {
            value
        };
        self.index.insert(name.clone(), self.children.len());
        self.children.push((name, value));
    }

    /// Build the element's value from everything collected between its tags.
    fn into_node(self, options: &ParseOptions) -> XmlNode {
        if self.attrs.is_empty() && self.children.is_empty() {
            return XmlNode::Text(self.text);
        }

        let keep_text = self.cdata || !self.text.chars().all(char::is_whitespace);
        let mut entries = Vec::with_capacity(self.children.len() + 2);
        if keep_text {
            entries.push((options.char_key.clone(), XmlNode::Text(self.text)));
        }
        if !self.attrs.is_empty() {
            entries.push((options.attr_key.clone(), XmlNode::Map(self.attrs)));
        }

        // Only the char and attribute entries can collide with a child name.
        let reserved = entries.len();
        for (name, value) in self.children {
            match entries[..reserved].iter_mut().find(|(key, _)| *key == name) {
                Some((_, existing)) => append_to(existing, value),
                None => entries.push((name, value)),
            }
        }

        XmlNode::Map(entries)
    }
}

/// Turn `slot` into a list (if it is not one already) and append `value`.
fn append_to(slot: &mut XmlNode, value: XmlNode) {
    match slot {
        XmlNode::List(items) => items.push(value),
        other => {
            let first = std::mem::replace(other, XmlNode::List(Vec::with_capacity(2)));
            *other = XmlNode::List(vec![first, value]);
        }
    }
}

fn open_element(
    start: &BytesStart<'_>,
    stack: &[Element],
    root: Option<&XmlNode>,
    options: &ParseOptions,
) -> Result<Element, XmlError> {
    if stack.is_empty() && root.is_some() {
        return Err(XmlError::UnexpectedContent(
            "multiple root elements".to_owned(),
        ));
    }
    if stack.len() >= options.max_depth {
        return Err(XmlError::TooDeep(options.max_depth));
    }

    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| XmlError::Decode(e.to_string()))?
        .to_owned();

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| XmlError::Decode(e.to_string()))?
            .to_owned();
        let raw = std::str::from_utf8(&attr.value).map_err(|e| XmlError::Decode(e.to_string()))?;
        let value =
            quick_xml::escape::unescape(raw).map_err(|e| XmlError::Decode(e.to_string()))?;
        attrs.push((key, XmlNode::Text(value.into_owned())));
    }

    trace!(element = %name, depth = stack.len(), "open element");

    Ok(Element {
        name,
        text: String::new(),
        cdata: false,
        attrs,
        children: Vec::new(),
        index: HashMap::new(),
    })
}

fn close_element(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<XmlNode>,
    options: &ParseOptions,
) {
    let name = element.name.clone();
    let value = element.into_node(options);
    match stack.last_mut() {
        Some(parent) => parent.push_child(name, value, options.explicit_array),
        None => *root = Some(XmlNode::Map(vec![(name, value)])),
    }
}

fn append_text(stack: &mut [Element], text: &str, cdata: bool) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            current.cdata |= cdata;
            Ok(())
        }
        None if !cdata && text.chars().all(char::is_whitespace) => Ok(()),
        None => Err(XmlError::UnexpectedContent(
            "text outside the root element".to_owned(),
        )),
    }
}
