//! NumPy-style `Parameters` section → ReST field lines.
//!
//! ```text
//! Parameters
//! ----------
//! x, y : int
//!     Coordinates.
//! label
//!     Untyped.
//! ```

use super::google::split_on_colon;
use super::indent_of;
use super::rest::FieldEntry;
use regex::Regex;
use std::sync::LazyLock;

static RE_UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*-{3,}[ \t]*$").unwrap());

const SECTION: &str = "Parameters";

pub fn canonicalize(doc: &str) -> Vec<String> {
    let lines: Vec<&str> = doc.lines().collect();
    let is_header = |i: usize| i + 1 < lines.len() && RE_UNDERLINE.is_match(lines[i + 1]);
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim() != SECTION || !is_header(i) {
            i += 1;
            continue;
        }

        let header_indent = indent_of(lines[i]);
        let mut entry: Option<FieldEntry> = None;
        i += 2;

        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() {
                i += 1;
                continue;
            }
            let indent = indent_of(line);
            if indent < header_indent || is_header(i) {
                break;
            }
            if indent == header_indent {
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

/// Parse `name : type`, `a, b : type` or a bare `name`.
fn parse_entry(text: &str) -> FieldEntry {
    let (names, type_string) = match split_on_colon(text) {
        Some((names, ty)) => (names, Some(ty.trim().to_string())),
        None => (text, None),
    };

    FieldEntry {
        names: names
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect(),
        type_string: type_string.filter(|t| !t.is_empty()),
        help: Vec::new(),
    }
}
