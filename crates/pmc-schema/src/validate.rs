//! # Runtime Schema Validation
//!
//! Validates resolved collection documents against the embedded collection
//! schema (JSON Schema draft-07) using the `jsonschema` crate.
//!
//! ## Design
//!
//! [`SchemaValidator`] compiles its schema once at construction and is
//! `Send + Sync`, so one instance serves every document of a batch. The
//! keyword audit runs before compilation when the config asks for it.
//!
//! Engine errors are converted to [`Diagnostic`]s: the message is the
//! engine's own text and the instance location (a JSON pointer) is split
//! into unescaped path segments.

use pmc_core::pointer;
use serde_json::Value;
use thiserror::Error;

use crate::config::ValidatorConfig;
use crate::diagnostic::{format_diagnostics, Diagnostic};
use crate::keywords::{audit_keywords, UnknownKeyword};

/// The collection schema, embedded at compile time.
pub const COLLECTION_SCHEMA: &str = include_str!("../../../schemas/collection.schema.json");

/// First line of every validation failure message. The trailing space is
/// part of the text other tooling matches on.
pub const FAILURE_HEADER: &str = "Postman Collection schema validation failed. ";

/// Errors returned by schema validation operations.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document does not conform to the schema.
    #[error("{message}")]
    ValidationFailed {
        /// Header plus the rendered diagnostic tree.
        message: String,
        /// The structured violations behind `message`.
        diagnostics: Vec<Diagnostic>,
    },

    /// The schema text is not valid JSON.
    #[error("failed to load schema: {0}")]
    SchemaLoadError(#[from] serde_json::Error),

    /// The schema uses keywords the engine does not recognize.
    #[error("schema uses unrecognized keywords: {}", list_keywords(.0))]
    UnknownKeyword(Vec<UnknownKeyword>),

    /// The schema could not be compiled into a validator.
    #[error("failed to compile schema {schema_id}: {reason}")]
    SchemaCompileError {
        /// The schema title or identifier.
        schema_id: String,
        /// Human-readable reason.
        reason: String,
    },
}

fn list_keywords(findings: &[UnknownKeyword]) -> String {
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl SchemaValidationError {
    /// Structured violations, if this is a validation failure.
    pub fn diagnostics(&self) -> Option<&[Diagnostic]> {
        match self {
            SchemaValidationError::ValidationFailed { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }

    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let message = format!("{FAILURE_HEADER}\n{}", format_diagnostics(&diagnostics));
        SchemaValidationError::ValidationFailed {
            message,
            diagnostics,
        }
    }
}

/// A compiled collection schema validator.
pub struct SchemaValidator {
    config: ValidatorConfig,
    schema_id: String,
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_id", &self.schema_id)
            .field("config", &self.config)
            .finish()
    }
}

impl SchemaValidator {
    /// Compile the embedded collection schema.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded schema is broken: unparseable, using
    /// unknown keywords, or rejected by the engine.
    pub fn new(config: ValidatorConfig) -> Result<Self, SchemaValidationError> {
        let schema: Value = serde_json::from_str(COLLECTION_SCHEMA)?;
        Self::from_schema(&schema, config)
    }

    /// Compile an arbitrary schema value with the given config.
    pub fn from_schema(schema: &Value, config: ValidatorConfig) -> Result<Self, SchemaValidationError> {
        let schema_id = schema
            .get("$id")
            .or_else(|| schema.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("<anonymous schema>")
            .to_string();

        if config.reject_unknown_keywords {
            let findings = audit_keywords(schema);
            if !findings.is_empty() {
                return Err(SchemaValidationError::UnknownKeyword(findings));
            }
        }

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft7)
            .should_validate_formats(true)
            .should_ignore_unknown_formats(config.ignore_unknown_formats)
            .build(schema)
            .map_err(|e| SchemaValidationError::SchemaCompileError {
                schema_id: schema_id.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(schema_id = %schema_id, ?config, "compiled collection schema");

        Ok(Self {
            config,
            schema_id,
            validator,
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Schema `$id`, or its title when it has none.
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Collect violations for `instance` without building an error.
    ///
    /// With `break_on_first_error` at most one diagnostic is returned.
    pub fn diagnose(&self, instance: &Value) -> Vec<Diagnostic> {
        let limit = if self.config.break_on_first_error {
            1
        } else {
            usize::MAX
        };
        self.validator
            .iter_errors(instance)
            .take(limit)
            .map(|err| {
                let location = err.instance_path.to_string();
                let path = pointer::split(&location).unwrap_or_else(|| vec![location.clone()]);
                Diagnostic::new(err.to_string(), path)
            })
            .collect()
    }

    /// Validate `instance`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidationFailed`] whose message is
    /// the failure header followed by the rendered diagnostics.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let diagnostics = self.diagnose(instance);
        if diagnostics.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::from_diagnostics(diagnostics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> SchemaValidator {
        SchemaValidator::new(ValidatorConfig::default()).unwrap()
    }

    fn valid_collection() -> Value {
        json!({
            "info": {"name": "Demo", "version": "1.0.0"},
            "scripts": {"setup": "pm.globals.set('x', 1);"},
            "requests": {
                "name": "root",
                "items": [
                    {"name": "List users", "request": {"url": "https://api.test/users", "method": "GET"}},
                    {
                        "name": "nested",
                        "items": [
                            {"name": "Ping", "request": "https://api.test/ping", "events": {"test": "pm.test('ok')"}}
                        ]
                    }
                ]
            }
        })
    }

    #[test]
    fn embedded_schema_compiles() {
        let v = validator();
        assert_eq!(v.schema_id(), "Postman Collection v2.0.0-draft.3");
    }

    #[test]
    fn embedded_schema_passes_keyword_audit() {
        let schema: Value = serde_json::from_str(COLLECTION_SCHEMA).unwrap();
        assert!(audit_keywords(&schema).is_empty());
    }

    #[test]
    fn valid_collection_passes() {
        validator().validate(&valid_collection()).unwrap();
    }

    #[test]
    fn missing_info_fails_at_root() {
        let mut doc = valid_collection();
        doc.as_object_mut().unwrap().remove("info");
        let err = validator().validate(&doc).unwrap_err();
        let diagnostics = err.diagnostics().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].path.is_empty());
        assert!(diagnostics[0].message.contains("info"), "{}", diagnostics[0].message);
    }

    #[test]
    fn failure_message_has_header_and_formatted_lines() {
        let mut doc = valid_collection();
        doc["requests"]["items"][0]
            .as_object_mut()
            .unwrap()
            .remove("name");
        let err = validator().validate(&doc).unwrap_err();
        let message = err.to_string();
        let mut lines = message.lines();
        assert_eq!(lines.next(), Some("Postman Collection schema validation failed. "));
        let line = lines.next().unwrap();
        assert!(line.starts_with("  "), "{line:?}");
        assert!(line.ends_with(" at #/requests/items/0"), "{line:?}");
        assert!(message.ends_with('\n'));
        assert!(message.starts_with("Postman Collection schema validation failed. \n  "));
    }

    #[test]
    fn binary_script_value_is_a_violation() {
        let mut doc = valid_collection();
        doc["scripts"]["setup"] = json!([112, 109]);
        let err = validator().validate(&doc).unwrap_err();
        assert_eq!(err.diagnostics().unwrap()[0].path, ["scripts", "setup"]);
    }

    #[test]
    fn break_on_first_error_limits_diagnostics() {
        let doc = json!({"info": {"name": 1, "version": 2}});
        assert_eq!(validator().diagnose(&doc).len(), 1);

        let all = SchemaValidator::new(ValidatorConfig {
            break_on_first_error: false,
            ..ValidatorConfig::default()
        })
        .unwrap();
        assert_eq!(all.diagnose(&doc).len(), 2);
    }

    #[test]
    fn path_segments_are_unescaped() {
        let schema = json!({
            "type": "object",
            "properties": {"a/b": {"type": "string"}}
        });
        let v = SchemaValidator::from_schema(&schema, ValidatorConfig::default()).unwrap();
        let diagnostics = v.diagnose(&json!({"a/b": 3}));
        assert_eq!(diagnostics[0].path, ["a/b"]);
    }

    #[test]
    fn unknown_keyword_rejected_when_configured() {
        let schema = json!({"type": "object", "requried": ["x"]});
        let err = SchemaValidator::from_schema(&schema, ValidatorConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaValidationError::UnknownKeyword(_)));
        assert!(err.to_string().contains("requried"));

        let lenient = ValidatorConfig {
            reject_unknown_keywords: false,
            ..ValidatorConfig::default()
        };
        assert!(SchemaValidator::from_schema(&schema, lenient).is_ok());
    }

    #[test]
    fn unknown_format_rejected_unless_ignored() {
        let schema = json!({"type": "string", "format": "no-such-format"});
        let err = SchemaValidator::from_schema(&schema, ValidatorConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaCompileError { .. }), "{err}");

        let lenient = ValidatorConfig {
            ignore_unknown_formats: true,
            ..ValidatorConfig::default()
        };
        assert!(SchemaValidator::from_schema(&schema, lenient).is_ok());
    }
}
