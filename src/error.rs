//! Error type shared by the docstring parser, the type resolver and the
//! option assembly.

use thiserror::Error;

/// Width budget of an error line: the excerpt plus `"<Variant>: "`.
const MAX_WIDTH: usize = 79;

/// Terminator appended to a shortened excerpt.
const PLACEHOLDER: &str = "...";

#[derive(Error, Debug)]
pub enum Error {
    /// The docstring matches none of the NumPy, Google or ReST markers.
    #[error("UnsupportedStyle: {excerpt}")]
    UnsupportedStyle { excerpt: String },

    /// A required parameter's only type signal is a docstring type name
    /// that is not one of the builtin primitives.
    #[error("{name} (only builtin types are supported)")]
    UnresolvableTypeHint { name: String },

    /// A type-hint string could not be parsed.
    #[error("invalid type hint {hint:?}: {reason}")]
    InvalidTypeHint { hint: String, reason: String },

    #[error("invalid function descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an `UnsupportedStyle` error carrying a shortened copy of `doc`.
    pub fn unsupported_style(doc: &str) -> Self {
        let width = MAX_WIDTH - "UnsupportedStyle".len() - 2;
        Error::UnsupportedStyle {
            excerpt: shorten(doc, width),
        }
    }
}

/// Collapse whitespace and truncate at a word boundary so the result,
/// terminator included, fits in `width` characters.
///
/// "This docstring contains no parameters" fits as is; longer text keeps
/// as many whole words as fit before the trailing `...`.
pub fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(PLACEHOLDER.len());
    let mut out = String::new();
    for word in words {
        let extra = if out.is_empty() { 0 } else { 1 };
        if out.chars().count() + extra + word.chars().count() > budget {
            break;
        }
        if extra == 1 {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.push_str(PLACEHOLDER);
    out
}
