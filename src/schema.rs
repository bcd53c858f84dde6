//! Typed field schemas for flow inputs and outputs
//!
//! A [`Schema`] declares the shape of a structured value: named fields with a
//! primitive kind and a human-readable description. The same schema checks
//! caller input before templating and untrusted model output after
//! generation, and its field descriptions instruct the model what shape to
//! produce.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{DefinitionError, DefinitionResult, ValidationError, ValidationResult};

/// Kind of value a field accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Text,
    Boolean,
    /// String restricted to one of the declared values, case-sensitive
    Choice(Vec<String>),
}

impl FieldKind {
    /// Name used in validation errors and model-facing descriptions.
    pub fn expected_name(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Text => "text",
            FieldKind::Boolean => "boolean",
            FieldKind::Choice(_) => "string",
        }
    }
}

/// A single named field in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub description: String,
    #[serde(default)]
    pub optional: bool,
}

impl Field {
    fn new(name: &str, kind: FieldKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            optional: false,
        }
    }

    pub fn number(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::Number, description)
    }

    pub fn text(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::Text, description)
    }

    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::Boolean, description)
    }

    pub fn choice(name: &str, choices: &[&str], description: &str) -> Self {
        let choices = choices.iter().map(|c| c.to_string()).collect();
        Self::new(name, FieldKind::Choice(choices), description)
    }

    /// Mark the field as optional; absent values pass validation.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Ordered collection of fields forming an input or output contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema. Field names must be unique.
    pub fn new(fields: Vec<Field>) -> DefinitionResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(DefinitionError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Schema with no fields; validates any value trivially.
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate a value against this schema.
    ///
    /// Returns a copy of the value with declared coercions applied
    /// (numeric-from-text only). Undeclared fields pass through untouched and
    /// field order is preserved. Pure; the input value is never mutated.
    pub fn validate(&self, value: &Value) -> ValidationResult<Value> {
        if self.fields.is_empty() {
            return Ok(value.clone());
        }

        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(ValidationError::NotAnObject {
                    actual: json_kind(other).to_string(),
                })
            }
        };

        let mut validated = object.clone();

        for field in &self.fields {
            // An explicit null counts as absent
            let present = match validated.get(&field.name) {
                None | Some(Value::Null) => false,
                Some(_) => true,
            };

            if !present {
                if field.optional {
                    continue;
                }
                return Err(ValidationError::MissingField {
                    field: field.name.clone(),
                });
            }

            let current = &validated[&field.name];
            let checked = check_field(field, current)?;
            if let Some(coerced) = checked {
                validated.insert(field.name.clone(), coerced);
            }
        }

        Ok(Value::Object(validated))
    }

    /// JSON-Schema object describing this schema, used for schema-guided
    /// decoding at the model endpoint.
    pub fn response_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut property = Map::new();
            let json_type = match &field.kind {
                FieldKind::Number => "number",
                FieldKind::Text => "string",
                FieldKind::Boolean => "boolean",
                FieldKind::Choice(_) => "string",
            };
            property.insert("type".to_string(), json!(json_type));
            property.insert("description".to_string(), json!(field.description));
            if let FieldKind::Choice(choices) = &field.kind {
                property.insert("enum".to_string(), json!(choices));
            }
            properties.insert(field.name.clone(), Value::Object(property));

            if !field.optional {
                required.push(field.name.clone());
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// One line per field, suitable for a model-facing instruction block.
    pub fn describe_fields(&self) -> String {
        self.fields
            .iter()
            .map(|field| {
                let kind = match &field.kind {
                    FieldKind::Number => "number".to_string(),
                    FieldKind::Text => "string".to_string(),
                    FieldKind::Boolean => "boolean".to_string(),
                    FieldKind::Choice(choices) => format!("one of {:?}", choices),
                };
                let requirement = if field.optional { ", optional" } else { "" };
                format!(
                    "- \"{}\" ({}{}): {}",
                    field.name, kind, requirement, field.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = DefinitionError;

    fn try_from(fields: Vec<Field>) -> Result<Self, Self::Error> {
        Schema::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

/// Check one present field. `Ok(Some(v))` means replace the value with the
/// coerced `v`; `Ok(None)` means the value is fine as-is.
fn check_field(field: &Field, value: &Value) -> ValidationResult<Option<Value>> {
    match &field.kind {
        FieldKind::Number => match value {
            Value::Number(_) => Ok(None),
            Value::String(text) => match coerce_number(text) {
                Some(number) => Ok(Some(number)),
                None => Err(kind_mismatch(field, value)),
            },
            _ => Err(kind_mismatch(field, value)),
        },
        FieldKind::Text => match value {
            Value::String(_) => Ok(None),
            _ => Err(kind_mismatch(field, value)),
        },
        // Booleans are never coerced; "true" is not true
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(None),
            _ => Err(kind_mismatch(field, value)),
        },
        FieldKind::Choice(choices) => match value {
            Value::String(text) => {
                if choices.iter().any(|c| c == text) {
                    Ok(None)
                } else {
                    Err(ValidationError::InvalidChoice {
                        field: field.name.clone(),
                        allowed: choices.clone(),
                        actual: text.clone(),
                    })
                }
            }
            _ => Err(kind_mismatch(field, value)),
        },
    }
}

fn kind_mismatch(field: &Field, value: &Value) -> ValidationError {
    ValidationError::KindMismatch {
        field: field.name.clone(),
        expected: field.kind.expected_name().to_string(),
        actual: json_kind(value).to_string(),
    }
}

/// Numeric-from-text coercion. Integral text becomes an integer number,
/// decimal text a float. Anything else is a mismatch.
fn coerce_number(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Value::from(integer));
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if float.is_finite() {
            return serde_json::Number::from_f64(float).map(Value::Number);
        }
    }
    None
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
