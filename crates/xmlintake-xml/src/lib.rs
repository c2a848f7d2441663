//! XML to JSON-shaped tree conversion for xmlintake.
//!
//! This crate turns an XML document into an [`XmlNode`] tree whose serde
//! serialization is the JSON document stored by the intake function.
//!
//! # Key components
//!
//! - [`from_xml`] / [`from_xml_with`] parse a document into a tree
//! - [`ParseOptions`] controls attribute/text keys, list wrapping and depth limit
//! - [`XmlNode`] is the tagged tree (text, list, ordered map)
//! - [`XmlError`] covers every way a document can be rejected

pub mod error;
pub mod node;
pub mod parse;

pub use error::XmlError;
pub use node::XmlNode;
pub use parse::{ParseOptions, from_xml, from_xml_with};
