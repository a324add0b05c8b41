//! Strict decoding of package.json content
//!
//! Checks run in a fixed order and the first failure wins:
//! object shape, `name` presence, `name` type, `dependencies`, `devDependencies`.
//! Unknown fields are ignored.

use super::ManifestRecord;
use crate::error::ValidationError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Decode a parsed JSON document into a `ManifestRecord`
pub fn decode(value: Value) -> Result<ManifestRecord, ValidationError> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(ValidationError::MalformedManifest {
                found: other.to_string(),
            })
        }
    };

    let name = match fields.remove("name") {
        None => return Err(ValidationError::MissingName),
        Some(Value::String(name)) => name,
        Some(_) => return Err(ValidationError::InvalidNameType),
    };

    let dependencies = string_record(
        &mut fields,
        "dependencies",
        ValidationError::InvalidDependenciesType,
    )?;
    let dev_dependencies = string_record(
        &mut fields,
        "devDependencies",
        ValidationError::InvalidDevDependenciesType,
    )?;

    Ok(ManifestRecord {
        name,
        dependencies,
        dev_dependencies,
    })
}

/// Take `key` out of `fields` as a map of strings; absent keys are `Ok(None)`
///
/// Any other shape is reported as `invalid`.
fn string_record(
    fields: &mut Map<String, Value>,
    key: &str,
    invalid: ValidationError,
) -> Result<Option<BTreeMap<String, String>>, ValidationError> {
    let Some(value) = fields.remove(key) else {
        return Ok(None);
    };
    let Value::Object(entries) = value else {
        return Err(invalid);
    };

    let mut record = BTreeMap::new();
    for (name, version) in entries {
        match version {
            Value::String(version) => {
                record.insert(name, version);
            }
            _ => return Err(invalid),
        }
    }
    Ok(Some(record))
}
