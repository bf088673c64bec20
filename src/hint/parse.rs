//! Type-hint string grammars.
//!
//! Annotation syntax: `int`, `List[int]`, `Tuple[int, str]`,
//! `Tuple[int, ...]`, `Union[int, str]`, `Optional[int]`, `int | str`.
//!
//! Docstring syntax adds the prose forms `list of int`, `(int, str)` and
//! `tuple of (int, str)`.

use super::{Primitive, TypeExpr};
use crate::error::{Error, Result};

const IGNORED_PREFIXES: &[&str] = &["typing.", "collections.abc.", "builtins."];

const SEQUENCE_NAMES: &[&str] = &[
    "List",
    "list",
    "Sequence",
    "MutableSequence",
    "Iterable",
    "Collection",
    "Set",
    "set",
    "FrozenSet",
    "frozenset",
];

const PROSE_SEQUENCES: &[&str] = &["list", "sequence", "iterable", "set"];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Open,
    Close,
    Comma,
    Pipe,
    Ellipsis,
}

/// Parse a hint in annotation syntax.
pub fn parse_hint(hint: &str) -> Result<TypeExpr> {
    let tokens = lex(hint)?;
    let mut parser = Parser {
        hint,
        tokens,
        pos: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(parser.error(format!("unexpected {token:?}"))),
    }
}

/// Parse a single docstring type token (already split on `" or "`).
pub fn parse_doc_type(token: &str) -> Result<TypeExpr> {
    let token = token.trim();

    if let Some(inner) = strip_parens(token) {
        let items = split_top_level(inner)
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .map(parse_doc_type)
            .collect::<Result<Vec<_>>>()?;
        return Ok(TypeExpr::Tuple(items));
    }

    if let Some((head, rest)) = token.split_once(" of ") {
        let head = head.trim().to_ascii_lowercase();
        if PROSE_SEQUENCES.contains(&head.as_str()) {
            return Ok(TypeExpr::sequence(parse_doc_type(rest)?));
        }
        if head == "tuple" {
            return match parse_doc_type(rest)? {
                tuple @ TypeExpr::Tuple(_) => Ok(tuple),
                single => Ok(TypeExpr::Tuple(vec![single])),
            };
        }
    }

    parse_hint(token)
}

struct Parser<'a> {
    hint: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::InvalidTypeHint {
            hint: self.hint.to_string(),
            reason: reason.into(),
        }
    }

    /// expr := atom ('|' atom)*
    fn expr(&mut self) -> Result<TypeExpr> {
        let first = self.atom()?;
        if self.peek() != Some(&Token::Pipe) {
            return Ok(first);
        }
        let mut branches = vec![first];
        while self.peek() == Some(&Token::Pipe) {
            self.pos += 1;
            branches.push(self.atom()?);
        }
        Ok(TypeExpr::Union(branches))
    }

    /// atom := NAME ('[' args ']')?
    fn atom(&mut self) -> Result<TypeExpr> {
        let name = match self.next() {
            Some(Token::Ident(name)) => name,
            Some(token) => return Err(self.error(format!("expected a type name, found {token:?}"))),
            None => return Err(self.error("expected a type name")),
        };
        let name = strip_prefixes(&name);

        if self.peek() != Some(&Token::Open) {
            return Ok(plain(name));
        }
        self.pos += 1;
        let args = self.args()?;
        self.generic(name, args)
    }

    /// args := (expr | '...') (',' (expr | '...'))* ']'
    fn args(&mut self) -> Result<Vec<Option<TypeExpr>>> {
        let mut args = Vec::new();
        loop {
            if self.peek() == Some(&Token::Ellipsis) {
                self.pos += 1;
                args.push(None);
            } else {
                args.push(Some(self.expr()?));
            }
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::Close) => return Ok(args),
                Some(token) => return Err(self.error(format!("expected ',' or ']', found {token:?}"))),
                None => return Err(self.error("unclosed '['")),
            }
        }
    }

    fn generic(&self, name: &str, args: Vec<Option<TypeExpr>>) -> Result<TypeExpr> {
        if SEQUENCE_NAMES.contains(&name) {
            return match <[_; 1]>::try_from(args) {
                Ok([Some(element)]) => Ok(TypeExpr::sequence(element)),
                _ => Err(self.error(format!("{name} takes exactly one type argument"))),
            };
        }

        match name {
            "Tuple" | "tuple" => {
                if let [Some(element), None] = args.as_slice() {
                    return Ok(TypeExpr::sequence(element.clone()));
                }
                args.into_iter()
                    .map(|arg| arg.ok_or_else(|| self.error("'...' must follow a single type")))
                    .collect::<Result<Vec<_>>>()
                    .map(TypeExpr::Tuple)
            }
            "Union" => {
                let mut branches = self.no_ellipsis(args)?;
                if branches.len() == 1 {
                    Ok(branches.remove(0))
                } else {
                    Ok(TypeExpr::Union(branches))
                }
            }
            "Optional" => match <[_; 1]>::try_from(self.no_ellipsis(args)?) {
                Ok([inner]) => Ok(TypeExpr::Union(vec![inner, TypeExpr::Named("None".into())])),
                Err(_) => Err(self.error("Optional takes exactly one type argument")),
            },
            // Other generics (Dict[..], custom classes) are opaque.
            _ => {
                self.no_ellipsis(args)?;
                Ok(TypeExpr::Named(name.to_string()))
            }
        }
    }

    fn no_ellipsis(&self, args: Vec<Option<TypeExpr>>) -> Result<Vec<TypeExpr>> {
        args.into_iter()
            .map(|arg| arg.ok_or_else(|| self.error("'...' is only valid in Tuple")))
            .collect()
    }
}

fn plain(name: &str) -> TypeExpr {
    match Primitive::from_name(name) {
        Some(primitive) => TypeExpr::Primitive(primitive),
        None => TypeExpr::Named(name.to_string()),
    }
}

fn strip_prefixes(name: &str) -> &str {
    IGNORED_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

fn lex(hint: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = hint.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '[' => tokens.push(Token::Open),
            ']' => tokens.push(Token::Close),
            ',' => tokens.push(Token::Comma),
            '|' => tokens.push(Token::Pipe),
            '.' if hint[start..].starts_with("...") => {
                chars.next();
                chars.next();
                tokens.push(Token::Ellipsis);
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' || next == '.' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(hint[start..end].to_string()));
            }
            other => {
                return Err(Error::InvalidTypeHint {
                    hint: hint.to_string(),
                    reason: format!("unexpected character {other:?}"),
                })
            }
        }
    }

    Ok(tokens)
}

/// `(a, b)` → `a, b` when the outer parentheses enclose the whole token.
fn strip_parens(token: &str) -> Option<&str> {
    let inner = token.strip_prefix('(')?.strip_suffix(')')?;
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
