//! RFC 6901 JSON Pointers over Kson value trees.

use crate::value::Kson;
use percent_encoding::percent_decode_str;

/// Decode a `$ref` fragment into text: percent-decoding applies to the
/// fragment as a whole before pointer interpretation.
pub fn decode_fragment(fragment: &str) -> String {
    percent_decode_str(fragment)
        .decode_utf8()
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| fragment.to_string())
}

/// Split a pointer (`""` or `/a/b/0`) into decoded reference tokens.
/// Returns `None` when the text is not a pointer at all.
pub fn parse_pointer(pointer: &str) -> Option<Vec<String>> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    if !pointer.starts_with('/') {
        return None;
    }
    Some(pointer.split('/').skip(1).map(decode_token).collect())
}

/// `~1` before `~0`, per RFC 6901 §4.
fn decode_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Navigate tokens through a value tree. Object steps use the
/// first-occurrence lookup; numeric tokens index arrays.
pub fn navigate<'a>(root: &'a Kson, tokens: &[String]) -> Option<&'a Kson> {
    let mut current = root;
    for token in tokens {
        current = match &current.kind {
            crate::value::ValueKind::Object(o) => o.get(token)?,
            crate::value::ValueKind::Array { elements, .. } => {
                elements.get(token.parse::<usize>().ok()?)?
            }
            _ => return None,
        };
    }
    Some(current)
}
