//! Data model shared by the parser, the resolver and the option assembly.

use crate::hint::TypeExpr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata documented for a single parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Candidate type names, split on `" or "`, in documented order.
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// Parameter name → documented metadata.
pub type DocTable = BTreeMap<String, ParameterDoc>;

/// How a parameter may be passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    KeywordOnly,
    VarPositional,
    VarKeyword,
}

impl ParamKind {
    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }
}

/// A parameter as extracted by the caller's signature reflection.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<serde_json::Value>,
    pub annotation: Option<TypeExpr>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Parameter {
            name: name.into(),
            kind,
            default: None,
            annotation: None,
        }
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_annotation(mut self, annotation: TypeExpr) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A function's parameters, in declaration order, plus its raw docstring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    pub name: String,
    pub doc: Option<String>,
    pub parameters: Vec<Parameter>,
}
