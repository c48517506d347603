// src/library/decode.rs
// =============================================================================
// Turns the README payload GitHub sends into plain text.
//
// GitHub's contents API declares an encoding next to the content. In
// practice it is almost always "base64", with the base64 text wrapped at 60
// columns by newlines. We also accept an empty or "utf-8" encoding, meaning
// the content is already text. Anything else (GitHub uses "none" for files
// it refuses to inline) is unsupported.
//
// decode_content() is a pure function: same input, same output.
// =============================================================================

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::DecodeError;
use crate::github::EncodedContent;

/// Transport encodings we know how to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Base64,
    Utf8,
}

impl ContentEncoding {
    /// Interprets the `encoding` field of a content response.
    pub fn parse(declared: Option<&str>) -> Result<Self, DecodeError> {
        match declared.map(str::trim) {
            Some("base64") => Ok(Self::Base64),
            None | Some("") | Some("utf-8") | Some("utf8") => Ok(Self::Utf8),
            Some(other) => Err(DecodeError::Unsupported(other.to_string())),
        }
    }
}

/// Decodes README content into text.
pub fn decode_content(encoded: &EncodedContent) -> Result<String, DecodeError> {
    let encoding = ContentEncoding::parse(encoded.encoding.as_deref())?;
    let content = encoded
        .content
        .as_deref()
        .ok_or(DecodeError::MissingContent)?;

    match encoding {
        ContentEncoding::Utf8 => Ok(content.to_string()),
        ContentEncoding::Base64 => {
            // Drop the line wrapping before handing it to the decoder
            let compact: String = content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = STANDARD.decode(compact)?;
            Ok(String::from_utf8(bytes)?)
        }
    }
}
