//! Option assembly: selects eligible parameters and merges docstring help,
//! defaults, resolved shapes and caller overrides into option records.

use crate::docstring;
use crate::error::Result;
use crate::hint::{infer_from_default, parse_hint, resolve, resolve_tokens, OptionShape};
use crate::model::{DocTable, ParamKind, Parameter, ParameterDoc, Signature};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Caller policy for which parameters become options and how.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Option switches per parameter, replacing the derived `--name`.
    pub names: BTreeMap<String, Vec<String>>,
    /// Parameters to use; empty means all of them.
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
    pub custom: BTreeMap<String, Overrides>,
}

impl Policy {
    /// Whether `param` becomes an option. Exclusion is checked before
    /// anything else, so excluded parameters are never resolved.
    pub fn selects(&self, param: &Parameter) -> bool {
        let name = param.name.as_str();
        if self.exclude.contains(name) || param.kind.is_variadic() {
            return false;
        }
        if !self.include.is_empty() && !self.include.contains(name) {
            return false;
        }
        self.include.contains(name)
            || self.names.contains_key(name)
            || self.custom.contains_key(name)
            || param.kind == ParamKind::KeywordOnly
            || (param.kind == ParamKind::PositionalOrKeyword && param.has_default())
    }
}

/// Per-parameter values that win over everything inferred.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    pub help: Option<String>,
    #[serde(deserialize_with = "present")]
    pub default: Option<Value>,
    pub required: Option<bool>,
    /// Type in annotation syntax.
    #[serde(rename = "type")]
    pub type_hint: Option<String>,
}

impl Overrides {
    fn apply(&self, record: &mut OptionRecord) -> Result<()> {
        if let Some(ref help) = self.help {
            record.help = Some(help.clone());
        }
        if let Some(ref default) = self.default {
            record.default = Some(default.clone());
            record.required = false;
        }
        if let Some(required) = self.required {
            record.required = required;
        }
        if let Some(ref hint) = self.type_hint {
            record.shape = resolve(&parse_hint(hint)?);
        }
        Ok(())
    }
}

/// Deserialize a field that may be an explicit `null` as `Some(Null)`.
pub(crate) fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Everything needed to register one command-line option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionRecord {
    /// Parameter name the option value binds to.
    pub name: String,
    pub opts: Vec<String>,
    pub secondary_opts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(flatten)]
    pub shape: Option<OptionShape>,
}

/// Options derived from one function, plus advisory warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inspection {
    pub options: Vec<OptionRecord>,
    pub warnings: Vec<String>,
}

/// Derives options from a signature. The docstring is parsed once, when
/// the inspector is created.
#[derive(Debug)]
pub struct Inspector<'a> {
    signature: &'a Signature,
    docs: DocTable,
}

impl<'a> Inspector<'a> {
    pub fn new(signature: &'a Signature) -> Self {
        let docs = match docstring::parse(signature.doc.as_deref().unwrap_or_default()) {
            Ok(docs) => docs,
            Err(err) => {
                tracing::debug!(function = %signature.name, %err, "docstring skipped");
                DocTable::new()
            }
        };
        Inspector { signature, docs }
    }

    /// Parsed docstring metadata; empty when the docstring is unsupported.
    pub fn docs(&self) -> &DocTable {
        &self.docs
    }

    /// Build option records for every parameter `policy` selects, in
    /// signature order.
    pub fn options(&self, policy: &Policy) -> Result<Inspection> {
        let mut inspection = Inspection::default();
        for param in &self.signature.parameters {
            if !policy.selects(param) {
                continue;
            }
            let record = self.record(param, policy, &mut inspection.warnings)?;
            inspection.options.push(record);
        }
        drop_claimed_negations(&mut inspection.options);
        Ok(inspection)
    }

    fn record(
        &self,
        param: &Parameter,
        policy: &Policy,
        warnings: &mut Vec<String>,
    ) -> Result<OptionRecord> {
        let doc = self.docs.get(&param.name);
        let renamed = policy.names.get(&param.name);
        let opts = match renamed {
            Some(names) => names.clone(),
            None => vec![switch_name(&param.name)],
        };

        let mut record = OptionRecord {
            name: param.name.clone(),
            opts,
            secondary_opts: Vec::new(),
            help: doc.and_then(|d| d.help.clone()),
            required: !param.has_default(),
            default: param.default.clone(),
            shape: self.shape(param, doc, warnings)?,
        };

        if let Some(custom) = policy.custom.get(&param.name) {
            custom.apply(&mut record)?;
        }

        if renamed.is_none() && record.shape.as_ref().is_some_and(OptionShape::is_flag) {
            record.secondary_opts = record
                .opts
                .iter()
                .filter_map(|opt| opt.strip_prefix("--"))
                .map(|opt| format!("--no-{opt}"))
                .collect();
        }

        Ok(record)
    }

    /// Annotation first; a required parameter then falls back to its
    /// docstring type, a defaulted one to the type of its default. Only a
    /// required parameter left without a type is warned about.
    fn shape(
        &self,
        param: &Parameter,
        doc: Option<&ParameterDoc>,
        warnings: &mut Vec<String>,
    ) -> Result<Option<OptionShape>> {
        let shape = match param.annotation {
            Some(ref annotation) => resolve(annotation),
            None if !param.has_default() => {
                let tokens = doc.map(|d| d.types.as_slice()).unwrap_or_default();
                resolve_tokens(tokens)?
            }
            None => None,
        };
        let shape = shape.or_else(|| param.default.as_ref().and_then(infer_from_default));

        if shape.is_none() && !param.has_default() {
            let message = match param.annotation {
                Some(ref annotation) => format!(
                    "Type hint '{annotation}' for parameter '{}' cannot be resolved",
                    param.name
                ),
                None => format!("No type hint for parameter '{}'", param.name),
            };
            warn(warnings, message);
        }
        Ok(shape)
    }
}

/// A generated `--no-x` switch is kept only while no other option uses it.
fn drop_claimed_negations(options: &mut [OptionRecord]) {
    let mut claimed: BTreeSet<String> = options
        .iter()
        .flat_map(|record| record.opts.iter().cloned())
        .collect();
    for record in options.iter_mut() {
        record.secondary_opts.retain(|opt| claimed.insert(opt.clone()));
    }
}

/// `max_count` → `--max-count`.
pub fn switch_name(param: &str) -> String {
    format!("--{}", param.replace('_', "-"))
}

fn warn(warnings: &mut Vec<String>, message: String) {
    tracing::warn!("{message}");
    warnings.push(message);
}
