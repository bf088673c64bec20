//! Docstring metadata parser.
//!
//! Three docstring grammars are accepted. NumPy and Google sections are
//! first rewritten into ReST field lines (`:param NAME: HELP` /
//! `:type NAME: TYPE`), so a single scanner in [`rest`] extracts the
//! parameter table regardless of the source style.

pub mod google;
pub mod numpy;
pub mod rest;

use crate::error::{Error, Result};
use crate::model::DocTable;
use regex::Regex;
use std::sync::LazyLock;

static RE_NUMPY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Parameters[ \t]*\n[ \t]*-{3,}[ \t]*$").unwrap());

static RE_GOOGLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Args:").unwrap());

const REST_MARKER: &str = ":param ";

const TAB_SIZE: usize = 8;

/// Structural convention a docstring is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocstringStyle {
    Rest,
    Google,
    Numpy,
}

impl DocstringStyle {
    /// Sniff the style from marker substrings. NumPy wins over Google,
    /// which wins over ReST.
    pub fn detect(doc: &str) -> Option<Self> {
        if RE_NUMPY_HEADER.is_match(doc) {
            Some(DocstringStyle::Numpy)
        } else if RE_GOOGLE_HEADER.is_match(doc) {
            Some(DocstringStyle::Google)
        } else if doc.contains(REST_MARKER) {
            Some(DocstringStyle::Rest)
        } else {
            None
        }
    }

    /// Rewrite `doc` into ReST field lines.
    pub fn canonicalize(self, doc: &str) -> Vec<String> {
        match self {
            DocstringStyle::Rest => doc.lines().map(str::to_string).collect(),
            DocstringStyle::Google => google::canonicalize(doc),
            DocstringStyle::Numpy => numpy::canonicalize(doc),
        }
    }
}

/// Parse a raw docstring into parameter name → help/type metadata.
///
/// Fails with [`Error::UnsupportedStyle`] when none of the NumPy, Google
/// or ReST markers is present.
pub fn parse(raw: &str) -> Result<DocTable> {
    let doc = clean(raw);
    let style = DocstringStyle::detect(&doc).ok_or_else(|| Error::unsupported_style(&doc))?;
    tracing::debug!(?style, "detected docstring style");
    Ok(rest::scan(&style.canonicalize(&doc)))
}

/// Normalize docstring indentation.
///
/// Tabs are expanded, the first line loses its leading whitespace, the
/// remaining lines lose their common indentation, and blank lines at
/// either end are dropped.
pub fn clean(raw: &str) -> String {
    let lines: Vec<String> = raw.lines().map(expand_tabs).collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push(line.trim_start());
        } else if line.trim().is_empty() {
            out.push("");
        } else {
            out.push(strip_indent(line, margin));
        }
    }

    while out.first().is_some_and(|l| l.trim().is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.trim().is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Number of leading whitespace characters.
pub(crate) fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn strip_indent(line: &str, n: usize) -> &str {
    let offset = line
        .char_indices()
        .take(n)
        .take_while(|(_, c)| c.is_whitespace())
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &line[offset..]
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_SIZE - column % TAB_SIZE;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterDoc;

    const REST: &str = r#"Short description.

        This is
        the
        long description.

        :param foo: This is foo.
        :type foo: int
        :param bar: This is bar.
        :param baz: This is baz.
        :type baz: float or str
        :param a_b_c: This is a_b_c.
        :type a_b_c: CustomType
        :returns: The return value.
        :rtype: ReturnType
        "#;

    const GOOGLE: &str = r#"Short description.

        This is
        the
        long description.

        Args:
            foo (int): This is foo.
            bar: This is bar.
            baz (float or str): This is baz.
            a_b_c (CustomType): This is a_b_c.

        Returns:
            ReturnType: The return value.
        "#;

    const NUMPY: &str = r#"Short description.

        This is
        the
        long description.

        Parameters
        ----------
        foo : int
            This is foo.
        bar
            This is bar.
        baz : float or str
            This is baz.
        a_b_c : CustomType
            This is a_b_c.

        Returns
        -------
        ReturnType
            The return value.
        "#;

    fn doc(help: &str, types: &[&str]) -> ParameterDoc {
        ParameterDoc {
            help: Some(help.to_string()),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn expected() -> DocTable {
        let mut table = DocTable::new();
        table.insert("foo".into(), doc("This is foo.", &["int"]));
        table.insert("bar".into(), doc("This is bar.", &[]));
        table.insert("baz".into(), doc("This is baz.", &["float", "str"]));
        table.insert("a_b_c".into(), doc("This is a_b_c.", &["CustomType"]));
        table
    }

    #[test]
    fn detects_each_style() {
        assert_eq!(DocstringStyle::detect(&clean(REST)), Some(DocstringStyle::Rest));
        assert_eq!(DocstringStyle::detect(&clean(GOOGLE)), Some(DocstringStyle::Google));
        assert_eq!(DocstringStyle::detect(&clean(NUMPY)), Some(DocstringStyle::Numpy));
    }

    #[test]
    fn numpy_marker_wins_over_google_and_rest() {
        let doc = "Args: mentioned inline\n:param x: y\n\nParameters\n----------\nx : int\n    The x.";
        assert_eq!(DocstringStyle::detect(doc), Some(DocstringStyle::Numpy));
    }

    #[test]
    fn all_styles_yield_the_same_table() {
        assert_eq!(parse(REST).unwrap(), expected());
        assert_eq!(parse(GOOGLE).unwrap(), expected());
        assert_eq!(parse(NUMPY).unwrap(), expected());
    }

    #[test]
    fn unmarked_text_is_rejected_with_an_excerpt() {
        match parse("This docstring contains no parameters") {
            Err(Error::UnsupportedStyle { excerpt }) => {
                assert_eq!(excerpt, "This docstring contains no parameters")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn params_header_is_not_a_google_marker() {
        let doc = "Test func.\n\n    Params:\n        a: This is the only parameter.\n";
        assert!(matches!(parse(doc), Err(Error::UnsupportedStyle { .. })));
    }

    #[test]
    fn empty_docstring_is_unsupported() {
        assert!(matches!(parse(""), Err(Error::UnsupportedStyle { .. })));
    }

    #[test]
    fn clean_removes_common_indent() {
        let raw = "  First line.\n\n      Indented.\n    Body.\n\n";
        assert_eq!(clean(raw), "First line.\n\n  Indented.\nBody.");
    }

    #[test]
    fn clean_drops_leading_blank_lines() {
        let raw = "\n        Args:\n            x (int): The x.\n        ";
        assert_eq!(clean(raw), "Args:\n    x (int): The x.");
    }

    #[test]
    fn clean_expands_tabs() {
        assert_eq!(clean("a\n\tb\n\t\tc"), "a\nb\n        c");
    }
}
