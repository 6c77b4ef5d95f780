//! Runtime JSON schema checks for flow inputs and outputs

use std::fmt;

use jsonschema::{Draft, JSONSchema};
use serde::Serialize;
use serde_json::Value;

/// Schema keyword mapping sibling keywords to user-facing messages,
/// e.g. `"errorMessage": { "minItems": "Pick two." }`.
pub const ERROR_MESSAGE_KEYWORD: &str = "errorMessage";

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value ("" for the document root)
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (at {})", self.message, self.path)
        }
    }
}

/// A compiled Draft 7 schema plus the document it was compiled from.
pub struct JsonSchema {
    raw: Value,
    compiled: JSONSchema,
}

impl JsonSchema {
    /// Compile a schema document. Returns the compiler's message when the document is not a valid schema.
    pub fn compile(raw: Value) -> Result<Self, String> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&raw)
            .map_err(|e| e.to_string())?;
        Ok(Self { raw, compiled })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Validate an instance, collecting every violation.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<SchemaViolation>> {
        match self.compiled.validate(instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|error| {
                    let schema_path = error.schema_path.to_string();
                    let message = self
                        .custom_message(&schema_path)
                        .unwrap_or_else(|| error.to_string());
                    SchemaViolation {
                        path: error.instance_path.to_string(),
                        message,
                    }
                })
                .collect()),
        }
    }

    /// Look up the `errorMessage` entry for the failed keyword on its owning subschema.
    fn custom_message(&self, schema_path: &str) -> Option<String> {
        let (owner, keyword) = schema_path.rsplit_once('/')?;
        self.raw
            .pointer(owner)
            .and_then(|subschema| subschema.get(ERROR_MESSAGE_KEYWORD))
            .and_then(|messages| messages.get(keyword))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema").field("raw", &self.raw).finish()
    }
}

/// Join violations into one line for error messages.
pub fn summarize(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
