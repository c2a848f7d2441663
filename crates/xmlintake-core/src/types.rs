//! Invocation request and response types.

use serde::{Deserialize, Serialize};

use crate::decode::encode_body;

/// One invocation's input.
///
/// Unknown event fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRequest {
    /// Base64-encoded XML document.
    pub body: String,
    /// Destination bucket; falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Session/namespace identifier used as key prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

impl IntakeRequest {
    /// Build a request from raw XML text.
    #[must_use]
    pub fn from_xml(xml: &str) -> Self {
        Self {
            body: encode_body(xml),
            bucket: None,
            sid: None,
        }
    }

    /// Set the destination bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }
}

/// One invocation's successful result: where the document went and what the
/// store reported for the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntakeResponse {
    /// Bucket the document was written to.
    pub bucket: String,
    /// Key the document was written to.
    pub key: String,
    /// Entity tag reported by the store.
    #[serde(rename = "ETag", default, skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    /// Version ID reported by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}
