// crates/rpcdef-core/src/annotations/tags.rs
// ============================================================================
// Module: Field Tag Parser
// Description: Parser for `key:"value,opt,opt"` field annotation strings.
// Purpose: Turn raw field annotations into namespace-keyed FieldTag records.
// Dependencies: crate::core::definition, thiserror
// ============================================================================

//! ## Overview
//! Field annotations are space-separated `key:"value"` pairs. Each quoted
//! value is unescaped and split on commas: the first segment is the primary
//! value and the rest are option tokens.
//!
//! Only the `json` namespace carries meaning for the schema builder (see
//! [`JsonDirective`]); other namespaces are retained verbatim.
//!
//! ### Grammar (informal)
//! - **Key**: one or more bytes greater than space, excluding `:`, `"`, and DEL.
//! - **Pair**: key, `:`, then a double-quoted string with backslash escapes.
//! - **Separators**: any number of spaces between pairs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::FieldTag;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Namespace governing serialized names.
pub const JSON_NAMESPACE: &str = "json";
/// Primary value that removes a field from the payload.
pub const SKIP_VALUE: &str = "-";
/// Option token that omits empty values.
pub const OMIT_EMPTY_OPTION: &str = "omitempty";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Malformed annotation syntax.
///
/// # Invariants
/// - Offsets are byte offsets into the raw annotation string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagParseError {
    /// A pair did not start with a key.
    #[error("bad syntax for struct tag key at offset {offset}")]
    KeySyntax {
        /// Byte offset of the offending byte.
        offset: usize,
    },
    /// A key was not followed by `:` and a value.
    #[error("bad syntax for struct tag pair at offset {offset}")]
    PairSyntax {
        /// Byte offset of the offending byte.
        offset: usize,
    },
    /// A value was not a well-formed quoted string.
    #[error("bad syntax for struct tag value at offset {offset}")]
    ValueSyntax {
        /// Byte offset of the opening quote.
        offset: usize,
    },
    /// The same namespace appeared twice.
    #[error("duplicate struct tag key `{key}`")]
    DuplicateKey {
        /// Repeated namespace.
        key: String,
    },
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a raw annotation string into namespace-keyed tags.
///
/// # Errors
///
/// Returns [`TagParseError`] on malformed keys, missing values, bad quoting,
/// or a repeated namespace.
///
/// # Examples
/// ```
/// use rpcdef_core::annotations::parse_tags;
///
/// let tags = parse_tags(r#"json:"name,omitempty" db:"user_name""#)?;
/// assert_eq!(tags["json"].value, "name");
/// assert_eq!(tags["json"].options, vec!["omitempty".to_string()]);
/// assert_eq!(tags["db"].value, "user_name");
/// # Ok::<(), rpcdef_core::annotations::TagParseError>(())
/// ```
pub fn parse_tags(raw: &str) -> Result<BTreeMap<String, FieldTag>, TagParseError> {
    let bytes = raw.as_bytes();
    let len = bytes.len();
    let mut tags = BTreeMap::new();
    let mut pos = 0;
    while pos < len {
        while pos < len && bytes[pos] == b' ' {
            pos += 1;
        }
        if pos == len {
            break;
        }

        let key_start = pos;
        while pos < len
            && bytes[pos] > b' '
            && bytes[pos] != b':'
            && bytes[pos] != b'"'
            && bytes[pos] != 0x7f
        {
            pos += 1;
        }
        if pos == key_start {
            return Err(TagParseError::KeySyntax {
                offset: pos,
            });
        }
        if pos + 1 >= len || bytes[pos] != b':' {
            return Err(TagParseError::PairSyntax {
                offset: pos,
            });
        }
        if bytes[pos + 1] != b'"' {
            return Err(TagParseError::ValueSyntax {
                offset: pos + 1,
            });
        }
        let key = &raw[key_start..pos];

        let quote = pos + 1;
        let mut end = quote + 1;
        while end < len && bytes[end] != b'"' {
            if bytes[end] == b'\\' {
                end += 1;
            }
            end += 1;
        }
        if end >= len {
            return Err(TagParseError::ValueSyntax {
                offset: quote,
            });
        }
        let value = unquote(&raw[quote + 1..end]).ok_or(TagParseError::ValueSyntax {
            offset: quote,
        })?;
        pos = end + 1;

        if tags.contains_key(key) {
            return Err(TagParseError::DuplicateKey {
                key: key.to_string(),
            });
        }
        let mut segments = value.split(',');
        let primary = segments.next().unwrap_or_default().to_string();
        let options = segments.map(str::to_string).collect();
        tags.insert(key.to_string(), FieldTag {
            value: primary,
            options,
        });
    }
    Ok(tags)
}

/// Resolves backslash escapes in a double-quoted body.
///
/// Returns `None` for unknown escapes, raw newlines, or escapes that do not
/// produce a valid character.
fn unquote(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\n' => return None,
            '\\' => {
                let escaped = match chars.next()? {
                    'a' => '\u{07}',
                    'b' => '\u{08}',
                    'f' => '\u{0c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\u{0b}',
                    '\\' => '\\',
                    '"' => '"',
                    'x' => hex_escape(&mut chars, 2)?,
                    'u' => hex_escape(&mut chars, 4)?,
                    'U' => hex_escape(&mut chars, 8)?,
                    first @ '0'..='7' => octal_escape(first, &mut chars)?,
                    _ => return None,
                };
                out.push(escaped);
            }
            other => out.push(other),
        }
    }
    Some(out)
}

/// Reads `digits` hex digits and converts them to a character.
fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code: u32 = 0;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    // Single-byte escapes must stay within ASCII to keep the result UTF-8.
    if digits == 2 && code > 0x7f {
        return None;
    }
    char::from_u32(code)
}

/// Reads the remaining two octal digits of a three-digit escape.
fn octal_escape(first: char, chars: &mut std::str::Chars<'_>) -> Option<char> {
    let mut code = first.to_digit(8)?;
    for _ in 0..2 {
        code = code * 8 + chars.next()?.to_digit(8)?;
    }
    if code > 0x7f {
        return None;
    }
    char::from_u32(code)
}

// ============================================================================
// SECTION: Serialization Directive
// ============================================================================

/// Meaning of the `json` namespace for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonDirective {
    /// Field is removed from the payload entirely.
    pub skip: bool,
    /// Serialized name override.
    pub rename: Option<String>,
    /// Empty values are omitted.
    pub omit_empty: bool,
}

impl JsonDirective {
    /// Reads the `json` namespace from parsed tags.
    ///
    /// A primary value of `-` skips the field, whatever options follow it.
    #[must_use]
    pub fn from_tags(tags: &BTreeMap<String, FieldTag>) -> Self {
        let Some(tag) = tags.get(JSON_NAMESPACE) else {
            return Self::default();
        };
        let skip = tag.value == SKIP_VALUE;
        let rename = (!tag.value.is_empty()).then(|| tag.value.clone());
        Self {
            skip,
            rename,
            omit_empty: tag.has_option(OMIT_EMPTY_OPTION),
        }
    }
}
