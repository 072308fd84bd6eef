//! Embed block content processing.
//!
//! An embed block carries literal text between `%`...`%%` (or `$`...`$$`)
//! delimiters. The raw bytes between the preamble newline and the close
//! delimiter go through two transformations:
//!
//! 1. **Escape consumption** — one backslash is removed from every run of
//!    backslashes sitting between two delimiter characters, so `%\%` yields
//!    a literal `%%` and `%\\%` yields `%\%`. Only the zero-backslash form
//!    closes the block.
//! 2. **Indent stripping** — the minimum leading whitespace over all
//!    non-blank content lines and the closing delimiter line is removed
//!    from every line. Tabs and spaces are distinct; if any line's leading
//!    whitespace does not start with the chosen indent, nothing is
//!    stripped. The closing line's own indent participates, which makes it
//!    an authoring control for the content's indent.
//!
//! [`ProcessedEmbed`] keeps a per-line map back to the raw bytes so editor
//! positions inside the processed content can be translated to source
//! offsets: the mapping is additive per line plus one byte for every escape
//! crossed.

/// Find the byte index of the first unescaped close delimiter (`delim`
/// immediately followed by `delim`) in `text`, skipping escaped sequences.
pub fn find_close(text: &str, delim: char) -> Option<usize> {
    let d = delim as u8;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == d {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] == b'\\' {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == d {
                if j == i + 1 {
                    return Some(i);
                }
                // Escaped sequence; not a close.
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }
    None
}

/// One line of the processed-to-raw offset map.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedLineMap {
    /// Byte offset of this line's start within the processed content.
    pub processed_line_start: usize,
    /// Byte offset of this line's start within the raw content.
    pub raw_line_start: usize,
    /// Bytes of leading whitespace stripped from this line.
    pub stripped_indent: usize,
    /// Processed-content offsets after which one raw backslash was dropped.
    pub escape_offsets: Vec<usize>,
}

/// Result of processing raw embed content.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedEmbed {
    pub content: String,
    pub lines: Vec<EmbedLineMap>,
    /// The indent string removed from every line.
    pub stripped_indent: String,
}

impl ProcessedEmbed {
    /// Translate an offset in the processed content back to an offset in
    /// the raw content.
    pub fn map_to_raw(&self, processed_offset: usize) -> usize {
        let line = match self
            .lines
            .iter()
            .rev()
            .find(|l| l.processed_line_start <= processed_offset)
        {
            Some(l) => l,
            None => return processed_offset,
        };
        let within = processed_offset - line.processed_line_start;
        let escapes_crossed = line
            .escape_offsets
            .iter()
            .filter(|&&o| o <= processed_offset)
            .count();
        line.raw_line_start + line.stripped_indent + within + escapes_crossed
    }
}

/// Process raw embed content: strip the common indent and consume one level
/// of delimiter escapes.
///
/// `raw` is the text between the preamble newline and the start of the
/// closing line (every line keeps its `\n`; the final line may lack one if
/// the close delimiter sat mid-line or the input ended). `close_indent` is
/// the closing delimiter line's leading whitespace when the close sat on
/// its own line.
pub fn process_content(raw: &str, close_indent: Option<&str>, delim: char) -> ProcessedEmbed {
    let raw_lines = split_keep_newlines(raw);
    let indent = common_indent(&raw_lines, close_indent);

    let mut content = String::with_capacity(raw.len());
    let mut lines = Vec::with_capacity(raw_lines.len());
    let mut raw_pos = 0usize;

    for line in &raw_lines {
        let strip = strip_len(line, &indent);
        let mut map = EmbedLineMap {
            processed_line_start: content.len(),
            raw_line_start: raw_pos,
            stripped_indent: strip,
            escape_offsets: Vec::new(),
        };
        unescape_into(&line[strip..], delim, &mut content, &mut map.escape_offsets);
        raw_pos += line.len();
        lines.push(map);
    }

    ProcessedEmbed {
        content,
        lines,
        stripped_indent: indent,
    }
}

/// Split text into lines, each retaining its trailing `\n` if present.
pub(crate) fn split_keep_newlines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            lines.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t' || c == '\n' || c == '\r')
}

/// The minimum indent over non-blank lines and the closing delimiter line.
/// Tabs and spaces are distinct: every candidate must start with the chosen
/// indent or nothing is stripped at all.
fn common_indent(lines: &[&str], close_indent: Option<&str>) -> String {
    let mut candidates: Vec<&str> = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| leading_whitespace(l))
        .collect();
    if let Some(ci) = close_indent {
        candidates.push(ci);
    }
    let chosen = match candidates.iter().min_by_key(|c| c.len()) {
        Some(c) => *c,
        None => return String::new(),
    };
    if candidates.iter().all(|c| c.starts_with(chosen)) {
        chosen.to_string()
    } else {
        String::new()
    }
}

/// How many leading bytes to remove from `line` given the chosen indent.
/// Blank lines shorter than the indent lose whatever prefix they share.
fn strip_len(line: &str, indent: &str) -> usize {
    if line.starts_with(indent) {
        return indent.len();
    }
    let ws = leading_whitespace(line);
    ws.bytes()
        .zip(indent.bytes())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Append `text` to `out`, consuming one backslash from every
/// delimiter-backslash-delimiter sequence and recording where.
fn unescape_into(text: &str, delim: char, out: &mut String, escape_offsets: &mut Vec<usize>) {
    let d = delim as u8;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == d {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] == b'\\' {
                j += 1;
            }
            let backslashes = j - (i + 1);
            if backslashes >= 1 && j < bytes.len() && bytes[j] == d {
                out.push(delim);
                escape_offsets.push(out.len());
                for _ in 0..backslashes - 1 {
                    out.push('\\');
                }
                out.push(delim);
                i = j + 1;
                continue;
            }
        }
        let c = text[i..].chars().next().expect("in-bounds char");
        out.push(c);
        i += c.len_utf8();
    }
}

/// Re-escape processed content for emission: insert one backslash into
/// every delimiter-shaped sequence so the block round-trips byte-for-byte.
pub fn escape_content(text: &str, delim: char) -> String {
    let d = delim as u8;
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == d {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] == b'\\' {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == d {
                out.push(delim);
                out.push('\\');
                out.push_str(&text[i + 1..j]);
                out.push(delim);
                i = j + 1;
                continue;
            }
        }
        let c = text[i..].chars().next().expect("in-bounds char");
        out.push(c);
        i += c.len_utf8();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_backslash_is_consumed() {
        let p = process_content("has %\\% literal\n", None, '%');
        assert_eq!(p.content, "has %% literal\n");
        let p = process_content("%\\\\%\n", None, '%');
        assert_eq!(p.content, "%\\%\n");
        let p = process_content("%\\\\\\%\n", None, '%');
        assert_eq!(p.content, "%\\\\%\n");
    }

    #[test]
    fn escape_round_trip() {
        for text in ["%%", "%\\%", "a %% b %\\\\% c", "%%%"] {
            let escaped = escape_content(text, '%');
            assert_eq!(find_close(&escaped, '%'), None, "escaped form must not close");
            let p = process_content(&escaped, None, '%');
            assert_eq!(p.content, text);
        }
    }

    #[test]
    fn indent_stripping_uses_close_line() {
        let p = process_content("    line one\n      line two\n", Some("  "), '%');
        assert_eq!(p.content, "  line one\n    line two\n");
        assert_eq!(p.stripped_indent, "  ");
    }

    #[test]
    fn mixed_tabs_and_spaces_disable_stripping() {
        let p = process_content("\tone\n  two\n", None, '%');
        assert_eq!(p.content, "\tone\n  two\n");
        assert_eq!(p.stripped_indent, "");
    }

    #[test]
    fn blank_lines_do_not_count() {
        let p = process_content("  one\n\n  two\n", Some("  "), '%');
        assert_eq!(p.content, "one\n\ntwo\n");
    }

    #[test]
    fn offsets_map_back_through_indent_and_escapes() {
        // raw: "  a %\% b\n", processed: "a %% b\n"
        let raw = "  a %\\% b\n";
        let p = process_content(raw, Some("  "), '%');
        assert_eq!(p.content, "a %% b\n");
        // 'a' at processed 0 -> raw 2
        assert_eq!(p.map_to_raw(0), 2);
        // 'b' at processed 5 -> raw 8 (2 indent + 1 escape byte crossed)
        assert_eq!(p.map_to_raw(5), 8);
    }

    #[test]
    fn find_close_skips_escapes() {
        assert_eq!(find_close("a %\\% b %% c", '%'), Some(8));
        assert_eq!(find_close("no close here", '%'), None);
        assert_eq!(find_close("$$", '$'), Some(0));
    }
}
