//! Google-style sections → ReST field lines.
//!
//! ```text
//! Args:
//!     name (type): Help text
//!         continued here.
//!     other: Untyped help.
//! ```

use super::indent_of;
use super::rest::FieldEntry;
use regex::Regex;
use std::sync::LazyLock;

static RE_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:Args|Arguments|Parameters):[ \t]*$").unwrap());

pub fn canonicalize(doc: &str) -> Vec<String> {
    let lines: Vec<&str> = doc.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !RE_SECTION.is_match(lines[i]) {
            i += 1;
            continue;
        }

        let header_indent = indent_of(lines[i]);
        let mut entry_indent: Option<usize> = None;
        let mut entry: Option<FieldEntry> = None;
        i += 1;

        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() {
                i += 1;
                continue;
            }
            let indent = indent_of(line);
            if indent <= header_indent {
                break;
            }
            let base = *entry_indent.get_or_insert(indent);
            if indent <= base {
                if let Some(done) = entry.take() {
                    done.emit(&mut out);
                }
                entry = Some(parse_entry(line.trim()));
            } else if let Some(ref mut current) = entry {
                current.help.push(line.trim().to_string());
            }
            i += 1;
        }

        if let Some(done) = entry {
            done.emit(&mut out);
        }
    }

    out
}

/// Parse `name (type): help` or `name: help`.
fn parse_entry(text: &str) -> FieldEntry {
    let (head, help) = match split_on_colon(text) {
        Some((head, help)) => (head.trim(), help.trim()),
        None => (text, ""),
    };

    let (name, type_string) = match (head.find('('), head.ends_with(')')) {
        (Some(open), true) => (
            head[..open].trim(),
            Some(head[open + 1..head.len() - 1].trim().to_string()),
        ),
        _ => (head, None),
    };

    FieldEntry {
        names: vec![name.to_string()],
        type_string: type_string.filter(|t| !t.is_empty()),
        help: if help.is_empty() {
            Vec::new()
        } else {
            vec![help.to_string()]
        },
    }
}

/// Split at the first colon outside brackets.
pub(crate) fn split_on_colon(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return Some((&text[..i], &text[i + 1..])),
            _ => {}
        }
    }
    None
}
