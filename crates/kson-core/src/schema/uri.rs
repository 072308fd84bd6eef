//! The slice of RFC 3986 reference resolution that `$id`/`$ref` need.
//!
//! Schema identifiers are allowed to be relative or opaque in ways a strict
//! URL parser rejects, so joining is done structurally: scheme and
//! authority are inherited from the base when the reference lacks them, an
//! absolute path replaces the base path, and a relative path joins against
//! the base's directory.

/// Split a URI into the document part and its fragment (without `#`).
pub fn split_fragment(uri: &str) -> (&str, Option<&str>) {
    match uri.find('#') {
        Some(i) => (&uri[..i], Some(&uri[i + 1..])),
        None => (uri, None),
    }
}

/// `scheme:` prefix when present.
fn scheme(uri: &str) -> Option<&str> {
    let colon = uri.find(':')?;
    let candidate = &uri[..colon];
    let mut chars = candidate.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}

fn has_scheme(uri: &str) -> bool {
    scheme(uri).is_some()
}

/// `scheme://authority` prefix, or the scheme alone for opaque URIs.
fn scheme_and_authority(uri: &str) -> &str {
    if let Some(rest_at) = uri.find("://") {
        let after = &uri[rest_at + 3..];
        match after.find('/') {
            Some(p) => &uri[..rest_at + 3 + p],
            None => uri,
        }
    } else {
        match uri.find(':') {
            Some(c) => &uri[..c + 1],
            None => "",
        }
    }
}

/// The base document's directory: everything up to and including the last
/// `/` of its path.
fn directory(uri: &str) -> String {
    let head = scheme_and_authority(uri);
    let path = &uri[head.len()..];
    match path.rfind('/') {
        Some(p) => format!("{head}{}", &path[..=p]),
        None => format!("{head}/"),
    }
}

/// Resolve `reference` against `base`, fragments carried through.
pub fn resolve_reference(base: &str, reference: &str) -> String {
    if reference.is_empty() {
        return base.to_string();
    }
    if has_scheme(reference) {
        return reference.to_string();
    }
    let (base_doc, _) = split_fragment(base);
    if let Some(rest) = reference.strip_prefix("//") {
        return match scheme(base_doc) {
            Some(s) => format!("{s}://{rest}"),
            None => reference.to_string(),
        };
    }
    if reference.starts_with('#') {
        return format!("{base_doc}{reference}");
    }
    if reference.starts_with('/') {
        return format!("{}{reference}", scheme_and_authority(base_doc));
    }
    format!("{}{reference}", directory(base_doc))
}

/// Canonical map key for a document URI: a bare trailing `#` is noise.
pub fn normalize(uri: &str) -> &str {
    uri.strip_suffix('#').unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_reference_wins() {
        assert_eq!(
            resolve_reference("http://a/b/c", "http://x/y"),
            "http://x/y"
        );
    }

    #[test]
    fn fragment_joins_base_document() {
        assert_eq!(
            resolve_reference("http://a/b/c#old", "#/definitions/x"),
            "http://a/b/c#/definitions/x"
        );
    }

    #[test]
    fn absolute_path_keeps_authority() {
        assert_eq!(
            resolve_reference("http://a/b/c", "/other"),
            "http://a/other"
        );
    }

    #[test]
    fn relative_path_joins_directory() {
        assert_eq!(
            resolve_reference("http://a/b/c", "other.schema"),
            "http://a/b/other.schema"
        );
        assert_eq!(resolve_reference("", "nested"), "/nested");
    }

    #[test]
    fn trailing_hash_normalizes_away() {
        assert_eq!(
            normalize("http://json-schema.org/draft-07/schema#"),
            "http://json-schema.org/draft-07/schema"
        );
    }
}
