//! Text decoding for Unity asset files
//!
//! Asset files written by different editor versions and locales arrive as
//! UTF-8 (with or without a byte-order mark), a legacy regional code page or
//! UTF-16. Each candidate is tried strictly, in order, and the first one that
//! decodes without a malformed sequence wins.

use encoding_rs::{EUC_KR, Encoding, UTF_8, UTF_16BE, UTF_16LE};
use std::borrow::Cow;
use std::fmt;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// A text encoding the reader knows how to try
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8 without a byte-order mark
    Utf8,
    /// UTF-8 preceded by a byte-order mark
    Utf8Bom,
    /// Korean legacy code page (EUC-KR / windows-949)
    EucKr,
    Utf16Le,
    Utf16Be,
}

/// Fallback order used when loading asset files
pub const DEFAULT_ENCODINGS: [TextEncoding; 5] = [
    TextEncoding::Utf8,
    TextEncoding::Utf8Bom,
    TextEncoding::EucKr,
    TextEncoding::Utf16Le,
    TextEncoding::Utf16Be,
];

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Bom => "utf-8-bom",
            TextEncoding::EucKr => "euc-kr",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
        }
    }

    /// Decode `bytes` strictly. Returns `None` on any malformed sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            // A leading BOM is left to the BOM-aware variant
            TextEncoding::Utf8 if bytes.starts_with(UTF8_BOM) => None,
            TextEncoding::Utf8 => decode_strict(UTF_8, bytes),
            TextEncoding::Utf8Bom => bytes
                .strip_prefix(UTF8_BOM)
                .and_then(|rest| decode_strict(UTF_8, rest)),
            TextEncoding::EucKr => decode_strict(EUC_KR, bytes),
            // The opposite byte-order mark decodes without error but yields garbage
            TextEncoding::Utf16Le if bytes.starts_with(UTF16BE_BOM) => None,
            TextEncoding::Utf16Be if bytes.starts_with(UTF16LE_BOM) => None,
            TextEncoding::Utf16Le => {
                decode_strict(UTF_16LE, bytes.strip_prefix(UTF16LE_BOM).unwrap_or(bytes))
            }
            TextEncoding::Utf16Be => {
                decode_strict(UTF_16BE, bytes.strip_prefix(UTF16BE_BOM).unwrap_or(bytes))
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

/// Try each encoding in order and return the first successful decode
pub fn decode_with(bytes: &[u8], encodings: &[TextEncoding]) -> Option<(String, TextEncoding)> {
    encodings
        .iter()
        .find_map(|&encoding| encoding.decode(bytes).map(|text| (text, encoding)))
}

/// Decode with [`DEFAULT_ENCODINGS`]
pub fn decode(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    decode_with(bytes, &DEFAULT_ENCODINGS)
}

/// Comma-separated names, for error messages
pub fn describe(encodings: &[TextEncoding]) -> String {
    encodings
        .iter()
        .map(|encoding| encoding.name())
        .collect::<Vec<_>>()
        .join(", ")
}
