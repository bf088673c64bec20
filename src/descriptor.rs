//! JSON function descriptors: a signature extracted by some reflection
//! layer, plus the option policy for it.
//!
//! ```json
//! {
//!   "name": "display_data",
//!   "doc": "Display the given data points.\n\nArgs:\n    size (int): Grid size.",
//!   "parameters": [
//!     {"name": "size", "kind": "keyword_only", "annotation": "int"},
//!     {"name": "symbol", "kind": "keyword_only", "default": "x"}
//!   ],
//!   "exclude": ["symbol"]
//! }
//! ```

use crate::error::Result;
use crate::hint::parse_hint;
use crate::model::{ParamKind, Parameter, Signature};
use crate::options::{present, Policy};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(flatten)]
    pub policy: Policy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: ParamKind,
    /// Absent means required; `null` is a real default.
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Value>,
    /// Type hint in annotation syntax.
    #[serde(default)]
    pub annotation: Option<String>,
}

fn default_kind() -> ParamKind {
    ParamKind::PositionalOrKeyword
}

impl FunctionDescriptor {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the signature, parsing every annotation.
    pub fn signature(&self) -> Result<Signature> {
        let parameters = self
            .parameters
            .iter()
            .map(|p| -> Result<Parameter> {
                Ok(Parameter {
                    name: p.name.clone(),
                    kind: p.kind,
                    default: p.default.clone(),
                    annotation: p.annotation.as_deref().map(parse_hint).transpose()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Signature {
            name: self.name.clone(),
            doc: self.doc.clone(),
            parameters,
        })
    }
}
