//! Base64 body decoding.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Standard alphabet; padding may be present or omitted.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors produced while turning a request body into XML text.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body is not valid base64.
    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not valid UTF-8.
    #[error("decoded body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Decode a base64 request body into text.
///
/// ASCII whitespace (line wrapping) is ignored.
pub fn decode_body(body: &str) -> Result<String, DecodeError> {
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BODY_ENGINE.decode(compact.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

/// Encode XML text as a request body.
#[must_use]
pub fn encode_body(xml: &str) -> String {
    BODY_ENGINE.encode(xml.as_bytes())
}
