//! The generic document tree produced from XML.
//!
//! [`XmlNode`] has exactly the three shapes a JSON rendering of an XML document
//! needs: text, an ordered list of repeated siblings, and an ordered map of
//! named entries. Maps keep insertion order so the serialized JSON lists keys
//! in document order.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A node of a converted XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Character data, attribute values and text-only elements.
    Text(String),
    /// Repeated same-named siblings, in document order.
    List(Vec<XmlNode>),
    /// Named entries (char key, attribute key, child elements) in insertion order.
    Map(Vec<(String, XmlNode)>),
}

impl XmlNode {
    /// Create a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the text if this is a [`XmlNode::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items if this is a [`XmlNode::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[XmlNode]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up an entry by key if this is a [`XmlNode::Map`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&XmlNode> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl Serialize for XmlNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
