// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! OpenAPI v3 schema helpers for template parameters.

use crate::error::{InfraError, Result};
use serde_json::Value;

/// The schema of property `key` of an object schema
pub fn extract_sub_schema(schema: &Value, key: &str) -> Result<Value> {
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| InfraError::Schema("properties not found in schema".to_string()))?;

    properties
        .get(key)
        .cloned()
        .ok_or_else(|| InfraError::Schema(format!("{} not found in schema properties", key)))
}

/// Set `additionalProperties: false` on every object schema that declares
/// `properties`, leaving explicit `additionalProperties` untouched.
pub fn disallow_unknown_fields(schema: &mut Value) {
    let Some(node) = schema.as_object_mut() else {
        return;
    };

    let mut has_properties = false;
    if let Some(Value::Object(properties)) = node.get_mut("properties") {
        has_properties = true;
        for property in properties.values_mut() {
            disallow_unknown_fields(property);
        }
    }

    if let Some(items) = node.get_mut("items") {
        disallow_unknown_fields(items);
    }

    if has_properties {
        node.entry("additionalProperties")
            .or_insert(Value::Bool(false));
    }
}

/// Validate `input` against `schema`, reporting every violation
pub fn validate_json_against_schema(schema: &Value, input: &Value) -> Result<()> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| InfraError::Schema(e.to_string()))?;

    if validator.is_valid(input) {
        return Ok(());
    }

    let errors: Vec<String> = validator
        .iter_errors(input)
        .map(|error| error.to_string())
        .collect();

    Err(InfraError::InvalidInput(errors.join("; ")))
}
