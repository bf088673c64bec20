//! Type expression → option shape.

use super::{parse_doc_type, Primitive, TypeExpr};
use crate::error::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// How a parameter is exposed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionShape {
    /// Takes one value.
    Scalar(Primitive),
    /// Boolean switch without a value.
    Flag,
    /// May be repeated; every occurrence adds a value.
    Multiple(Primitive),
    /// Takes exactly `n` values, one per element type.
    Tuple(Vec<Primitive>),
}

impl OptionShape {
    pub fn is_flag(&self) -> bool {
        matches!(self, OptionShape::Flag)
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, OptionShape::Multiple(_))
    }

    /// Fixed number of values, for tuple shapes.
    pub fn arity(&self) -> Option<usize> {
        match self {
            OptionShape::Tuple(items) => Some(items.len()),
            _ => None,
        }
    }
}

/// Serialized as option kwargs: `type` plus `is_flag`, `multiple` or
/// `nargs` where they apply.
impl Serialize for OptionShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            OptionShape::Scalar(p) => map.serialize_entry("type", p)?,
            OptionShape::Flag => {
                map.serialize_entry("type", &Primitive::Bool)?;
                map.serialize_entry("is_flag", &true)?;
            }
            OptionShape::Multiple(p) => {
                map.serialize_entry("type", p)?;
                map.serialize_entry("multiple", &true)?;
            }
            OptionShape::Tuple(items) => {
                map.serialize_entry("type", items)?;
                map.serialize_entry("nargs", &items.len())?;
            }
        }
        map.end()
    }
}

/// Resolve a type expression into an option shape.
///
/// Unions take the first branch that resolves, in declaration order.
/// Sequence and tuple elements must resolve to single values. `None`
/// means the expression carries no usable type.
pub fn resolve(expr: &TypeExpr) -> Option<OptionShape> {
    match expr {
        TypeExpr::Primitive(Primitive::Bool) => Some(OptionShape::Flag),
        TypeExpr::Primitive(p) => Some(OptionShape::Scalar(*p)),
        TypeExpr::Named(_) => None,
        TypeExpr::Sequence(element) => element_type(element).map(OptionShape::Multiple),
        TypeExpr::Tuple(items) if items.is_empty() => None,
        TypeExpr::Tuple(items) => items
            .iter()
            .map(element_type)
            .collect::<Option<Vec<_>>>()
            .map(OptionShape::Tuple),
        TypeExpr::Union(branches) => branches.iter().find_map(resolve),
    }
}

fn element_type(expr: &TypeExpr) -> Option<Primitive> {
    match resolve(expr)? {
        OptionShape::Scalar(p) => Some(p),
        OptionShape::Flag => Some(Primitive::Bool),
        OptionShape::Multiple(_) | OptionShape::Tuple(_) => None,
    }
}

/// Resolve docstring type tokens; only the first token is considered.
///
/// No tokens yields `Ok(None)`. A token that does not resolve fails with
/// [`Error::UnresolvableTypeHint`] naming the offending type.
pub fn resolve_tokens(tokens: &[String]) -> Result<Option<OptionShape>> {
    let Some(token) = tokens.first() else {
        return Ok(None);
    };
    let unresolvable = |name: &str| Error::UnresolvableTypeHint {
        name: name.to_string(),
    };

    let expr = parse_doc_type(token).map_err(|_| unresolvable(token))?;
    match resolve(&expr) {
        Some(shape) => Ok(Some(shape)),
        None => Err(unresolvable(expr.first_unknown().unwrap_or(token))),
    }
}

/// Infer a shape from a JSON default value.
pub fn infer_from_default(value: &Value) -> Option<OptionShape> {
    match value {
        Value::Array(items) => {
            let mut types = items.iter().map(scalar_type);
            let first = types.next()??;
            types
                .all(|t| t == Some(first))
                .then_some(OptionShape::Multiple(first))
        }
        other => match scalar_type(other)? {
            Primitive::Bool => Some(OptionShape::Flag),
            p => Some(OptionShape::Scalar(p)),
        },
    }
}

fn scalar_type(value: &Value) -> Option<Primitive> {
    match value {
        Value::Bool(_) => Some(Primitive::Bool),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(Primitive::Int),
        Value::Number(_) => Some(Primitive::Float),
        Value::String(_) => Some(Primitive::Str),
        _ => None,
    }
}
