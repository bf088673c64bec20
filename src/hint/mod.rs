//! Structural type expressions and their resolution into option shapes.

mod parse;
mod resolve;

pub use parse::{parse_doc_type, parse_hint};
pub use resolve::{infer_from_default, resolve, resolve_tokens, OptionShape};

use serde::Serialize;
use std::fmt;

/// Scalar value types an option can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Str,
    Int,
    Float,
    Bool,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Primitive::Str),
            "int" => Some(Primitive::Int),
            "float" => Some(Primitive::Float),
            "bool" => Some(Primitive::Bool),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Str => "str",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parameter's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Primitive(Primitive),
    /// Any non-primitive type name; never resolves.
    Named(String),
    Sequence(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn sequence(element: TypeExpr) -> Self {
        TypeExpr::Sequence(Box::new(element))
    }

    /// First name inside the expression that is not a primitive.
    pub fn first_unknown(&self) -> Option<&str> {
        match self {
            TypeExpr::Primitive(_) => None,
            TypeExpr::Named(name) => Some(name),
            TypeExpr::Sequence(element) => element.first_unknown(),
            TypeExpr::Tuple(items) | TypeExpr::Union(items) => {
                items.iter().find_map(TypeExpr::first_unknown)
            }
        }
    }
}

impl From<Primitive> for TypeExpr {
    fn from(primitive: Primitive) -> Self {
        TypeExpr::Primitive(primitive)
    }
}

/// Renders in annotation syntax, e.g. `List[Union[int, str]]`.
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            TypeExpr::Primitive(p) => write!(f, "{p}"),
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::Sequence(element) => write!(f, "List[{element}]"),
            TypeExpr::Tuple(items) => {
                f.write_str("Tuple[")?;
                list(f, items)?;
                f.write_str("]")
            }
            TypeExpr::Union(items) => {
                f.write_str("Union[")?;
                list(f, items)?;
                f.write_str("]")
            }
        }
    }
}
