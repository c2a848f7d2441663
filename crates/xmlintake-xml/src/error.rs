//! Error types for XML to tree conversion.

/// Errors that can occur while converting an XML document into an [`XmlNode`](crate::XmlNode).
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling (malformed or duplicate attributes).
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Text, names or references that could not be decoded.
    #[error("failed to decode XML content: {0}")]
    Decode(String),

    /// The document contains no root element.
    #[error("missing root element")]
    MissingRoot,

    /// Content that is not allowed at its position, such as text outside the root.
    #[error("unexpected XML content: {0}")]
    UnexpectedContent(String),

    /// The document ended before the element was closed.
    #[error("unclosed element: <{0}>")]
    UnclosedElement(String),

    /// Element nesting exceeds the configured limit.
    #[error("element nesting exceeds the maximum depth of {0}")]
    TooDeep(usize),
}
