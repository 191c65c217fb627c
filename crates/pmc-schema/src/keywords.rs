//! # Schema Keyword Audit
//!
//! The validation engine silently ignores keywords it does not know, so a
//! typo such as `requried` would quietly disable a constraint. This module
//! walks a schema and reports every keyword outside the draft-07
//! vocabulary, descending only into positions that hold subschemas.

use std::fmt;

use serde_json::Value;

/// Every keyword recognized in a draft-07 schema object.
const DRAFT7_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "$ref",
    "$comment",
    "title",
    "description",
    "default",
    "readOnly",
    "writeOnly",
    "examples",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "additionalItems",
    "items",
    "maxItems",
    "minItems",
    "uniqueItems",
    "contains",
    "maxProperties",
    "minProperties",
    "required",
    "additionalProperties",
    "definitions",
    "properties",
    "patternProperties",
    "dependencies",
    "propertyNames",
    "const",
    "enum",
    "type",
    "format",
    "contentMediaType",
    "contentEncoding",
    "if",
    "then",
    "else",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
];

/// Keywords whose value is a single subschema.
const SCHEMA_KEYWORDS: &[&str] = &[
    "additionalItems",
    "additionalProperties",
    "contains",
    "propertyNames",
    "not",
    "if",
    "then",
    "else",
];

/// Keywords whose value is a map of names to subschemas.
const SCHEMA_MAP_KEYWORDS: &[&str] = &["properties", "patternProperties", "definitions"];

/// Keywords whose value is an array of subschemas.
const SCHEMA_ARRAY_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf"];

/// A keyword found in a schema that the engine would ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyword {
    /// The unrecognized keyword.
    pub keyword: String,
    /// Path within the schema of the object that contains it.
    pub path: Vec<String>,
}

impl fmt::Display for UnknownKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" at #/{}", self.keyword, self.path.join("/"))
    }
}

/// Return every unrecognized keyword in `schema`, in document order.
pub fn audit_keywords(schema: &Value) -> Vec<UnknownKeyword> {
    let mut findings = Vec::new();
    let mut path = Vec::new();
    walk_schema(schema, &mut path, &mut findings);
    findings
}

fn walk_schema(schema: &Value, path: &mut Vec<String>, findings: &mut Vec<UnknownKeyword>) {
    // Boolean schemas are valid and have no keywords.
    let Value::Object(map) = schema else {
        return;
    };

    for (keyword, value) in map {
        if !DRAFT7_KEYWORDS.contains(&keyword.as_str()) {
            findings.push(UnknownKeyword {
                keyword: keyword.clone(),
                path: path.clone(),
            });
            continue;
        }

        path.push(keyword.clone());
        let keyword = keyword.as_str();
        if SCHEMA_KEYWORDS.contains(&keyword) {
            walk_schema(value, path, findings);
        } else if SCHEMA_MAP_KEYWORDS.contains(&keyword) {
            walk_named(value, path, findings);
        } else if SCHEMA_ARRAY_KEYWORDS.contains(&keyword) {
            walk_indexed(value, path, findings);
        } else if keyword == "items" {
            match value {
                Value::Array(_) => walk_indexed(value, path, findings),
                other => walk_schema(other, path, findings),
            }
        } else if keyword == "dependencies" {
            // Values are either subschemas or arrays of property names.
            if let Value::Object(deps) = value {
                for (name, dep) in deps {
                    if dep.is_object() {
                        path.push(name.clone());
                        walk_schema(dep, path, findings);
                        path.pop();
                    }
                }
            }
        }
        path.pop();
    }
}

fn walk_named(value: &Value, path: &mut Vec<String>, findings: &mut Vec<UnknownKeyword>) {
    if let Value::Object(entries) = value {
        for (name, subschema) in entries {
            path.push(name.clone());
            walk_schema(subschema, path, findings);
            path.pop();
        }
    }
}

fn walk_indexed(value: &Value, path: &mut Vec<String>, findings: &mut Vec<UnknownKeyword>) {
    if let Value::Array(items) = value {
        for (index, subschema) in items.iter().enumerate() {
            path.push(index.to_string());
            walk_schema(subschema, path, findings);
            path.pop();
        }
    }
}
