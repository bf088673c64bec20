//! optinspect: derive command-line option definitions from a function's
//! signature and docstring.
//!
//! The pipeline has two halves:
//!
//! - [`docstring`] turns a ReST, Google or NumPy docstring into a table of
//!   parameter name → help text and type names.
//! - [`hint`] turns a type annotation (or, failing that, a docstring type
//!   name) into an [`OptionShape`]: scalar, flag, repeatable or
//!   fixed-arity.
//!
//! [`Inspector`] combines both with defaults and caller policy into
//! [`OptionRecord`]s, and [`command::build`] registers those with `clap`.
//!
//! ```
//! use optinspect::{hint, Inspector, ParamKind, Parameter, Policy, Signature};
//!
//! let signature = Signature {
//!     name: "resize".into(),
//!     doc: Some(":param size: Edge length.\n:type size: int".into()),
//!     parameters: vec![Parameter::new("size", ParamKind::KeywordOnly)],
//! };
//! let inspection = Inspector::new(&signature).options(&Policy::default())?;
//! assert_eq!(inspection.options[0].opts, vec!["--size"]);
//! assert_eq!(
//!     inspection.options[0].shape,
//!     Some(hint::OptionShape::Scalar(hint::Primitive::Int))
//! );
//! # Ok::<(), optinspect::Error>(())
//! ```

pub mod command;
pub mod descriptor;
pub mod docstring;
pub mod error;
pub mod hint;
pub mod model;
pub mod options;

pub use descriptor::FunctionDescriptor;
pub use error::{Error, Result};
pub use hint::{OptionShape, Primitive, TypeExpr};
pub use model::{DocTable, ParamKind, Parameter, ParameterDoc, Signature};
pub use options::{Inspection, Inspector, OptionRecord, Overrides, Policy};

/// Parse `signature`'s docstring and derive its options in one call.
pub fn inspect(signature: &Signature, policy: &Policy) -> Result<Inspection> {
    Inspector::new(signature).options(policy)
}
