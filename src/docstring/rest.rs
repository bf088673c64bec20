//! ReST field-list scanner, the common grammar every style is reduced to.
//!
//! Only `:param` and `:type` fields are modeled. Indented lines directly
//! after a `:param` line continue its help text; everything else
//! (`:returns:`, `:rtype:`, prose) is ignored.

use crate::model::{DocTable, ParameterDoc};

const PARAM_FIELD: &str = ":param ";
const TYPE_FIELD: &str = ":type";

/// Separator between alternative type names in a type string.
const TYPE_ALTERNATIVE: &str = " or ";

/// NumPy/Google marker for an optional parameter, not part of the type.
const OPTIONAL_SUFFIX: &str = ", optional";

/// Scan canonical field lines into a parameter table.
pub fn scan<S: AsRef<str>>(lines: &[S]) -> DocTable {
    let mut table = DocTable::new();
    let mut current: Option<String> = None;

    for line in lines {
        let line = line.as_ref();

        if line.starts_with(PARAM_FIELD) {
            current = None;
            let Some((name, help)) = split_field(line) else {
                continue;
            };
            // Sphinx allows the type inline: `:param int foo: ...`
            let (name, inline_type) = match name.rsplit_once(char::is_whitespace) {
                Some((ty, name)) => (name.to_string(), Some(ty.trim())),
                None => (name.to_string(), None),
            };
            let entry = table.entry(name.clone()).or_default();
            entry.help = non_empty(help);
            if let Some(ty) = inline_type {
                if entry.types.is_empty() {
                    entry.types = tokenize(ty);
                }
            }
            current = Some(name);
        } else if line.starts_with(TYPE_FIELD) {
            current = None;
            if let Some((name, ty)) = split_field(line) {
                table.entry(name.to_string()).or_default().types = tokenize(ty);
            }
        } else if line.starts_with(char::is_whitespace) && !line.trim().is_empty() {
            if let Some(doc) = current.as_ref().and_then(|name| table.get_mut(name)) {
                append_help(doc, line.trim());
            }
        } else {
            current = None;
        }
    }

    table
}

/// Split `:field NAME: REST` into `(NAME, REST)`; REST is left-trimmed.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let start = line.find(' ')? + 1;
    let end = line[1..].find(':')? + 1;
    if end < start {
        return None;
    }
    let name = line[start..end].trim();
    if name.is_empty() {
        return None;
    }
    Some((name, line[end + 1..].trim_start()))
}

/// Split a type string into its alternatives: `"float or str"` →
/// `["float", "str"]`.
pub fn tokenize(type_string: &str) -> Vec<String> {
    let type_string = type_string.trim();
    let type_string = type_string
        .strip_suffix(OPTIONAL_SUFFIX)
        .unwrap_or(type_string);
    type_string
        .split(TYPE_ALTERNATIVE)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn append_help(doc: &mut ParameterDoc, text: &str) {
    match doc.help {
        Some(ref mut help) => {
            help.push(' ');
            help.push_str(text);
        }
        None => doc.help = Some(text.to_string()),
    }
}

/// One documented entry of a sectioned (Google/NumPy) docstring, rendered
/// back as ReST field lines.
#[derive(Debug, Default)]
pub(crate) struct FieldEntry {
    pub names: Vec<String>,
    pub type_string: Option<String>,
    pub help: Vec<String>,
}

impl FieldEntry {
    pub fn emit(self, out: &mut Vec<String>) {
        for name in &self.names {
            let mut help = self.help.iter();
            out.push(format!(
                "{PARAM_FIELD}{name}: {}",
                help.next().map(String::as_str).unwrap_or("")
            ));
            out.extend(help.map(|line| format!("    {line}")));
            if let Some(ref ty) = self.type_string {
                out.push(format!("{TYPE_FIELD} {name}: {ty}"));
            }
        }
    }
}
