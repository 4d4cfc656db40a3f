//! Argument validation compiled from a tool's input schema
//!
//! Only the subset of JSON Schema that tool definitions actually use is
//! honored: top-level `required`, primitive `type` per property and `enum`.

use serde_json::{Map, Value};

/// Primitive JSON type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl FieldKind {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(FieldKind::String),
            "number" => Some(FieldKind::Number),
            "integer" => Some(FieldKind::Integer),
            "boolean" => Some(FieldKind::Boolean),
            "object" => Some(FieldKind::Object),
            "array" => Some(FieldKind::Array),
            _ => None,
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Number => "a number",
            FieldKind::Integer => "an integer",
            FieldKind::Boolean => "a boolean",
            FieldKind::Object => "an object",
            FieldKind::Array => "an array",
        }
    }
}

#[derive(Debug, Clone)]
struct FieldRule {
    name: String,
    required: bool,
    kind: Option<FieldKind>,
    allowed: Option<Vec<Value>>,
}

/// Validation rules for one tool's arguments
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    fields: Vec<FieldRule>,
}

impl ParamSchema {
    /// Compile rules from an `inputSchema` object
    ///
    /// Unknown keywords are ignored; a schema without `properties` still
    /// enforces its `required` list.
    pub fn from_input_schema(schema: &Value) -> Self {
        let empty = Map::new();
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut fields: Vec<FieldRule> = properties
            .iter()
            .map(|(name, prop)| FieldRule {
                name: name.clone(),
                required: required.contains(&name.as_str()),
                kind: prop.get("type").and_then(Value::as_str).and_then(FieldKind::parse),
                allowed: prop.get("enum").and_then(Value::as_array).cloned(),
            })
            .collect();

        for name in required {
            if !fields.iter().any(|f| f.name == name) {
                fields.push(FieldRule {
                    name: name.to_string(),
                    required: true,
                    kind: None,
                    allowed: None,
                });
            }
        }

        Self { fields }
    }

    /// Names of required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name.as_str())
    }

    /// Check arguments, returning the violation message on failure
    ///
    /// A required field counts as missing when it is absent, `null` or an
    /// empty string. `null` arguments are treated as an empty object.
    pub fn validate(&self, args: &Value) -> Result<(), String> {
        let empty = Map::new();
        let object = match args {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err("Invalid params: arguments must be an object".to_string()),
        };

        for field in &self.fields {
            let value = match object.get(&field.name) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) if s.is_empty() => None,
                Some(v) => Some(v),
            };

            let Some(value) = value else {
                if field.required {
                    return Err(format!("Invalid params: {} is required", field.name));
                }
                continue;
            };

            if let Some(kind) = field.kind {
                if !kind.matches(value) {
                    return Err(format!(
                        "Invalid params: {} must be {}",
                        field.name,
                        kind.describe()
                    ));
                }
            }

            if let Some(allowed) = &field.allowed {
                if !allowed.contains(value) {
                    let options: Vec<String> = allowed
                        .iter()
                        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                        .collect();
                    return Err(format!(
                        "Invalid params: {} must be one of: {}",
                        field.name,
                        options.join(", ")
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn export_schema() -> ParamSchema {
        ParamSchema::from_input_schema(&json!({
            "type": "object",
            "properties": {
                "projectName": {"type": "string"},
                "format": {"type": "string", "enum": ["json", "atlas", "binary"]},
                "outputName": {"type": "string"}
            },
            "required": ["projectName"]
        }))
    }

    #[test]
    fn test_required_present() {
        assert!(export_schema().validate(&json!({"projectName": "hero"})).is_ok());
    }

    #[test]
    fn test_required_missing_null_or_empty() {
        let schema = export_schema();
        for args in [json!({}), json!({"projectName": null}), json!({"projectName": ""}), Value::Null] {
            let err = schema.validate(&args).unwrap_err();
            assert_eq!(err, "Invalid params: projectName is required");
        }
    }

    #[test]
    fn test_enum_violation_lists_options() {
        let err = export_schema()
            .validate(&json!({"projectName": "hero", "format": "gif"}))
            .unwrap_err();
        assert_eq!(err, "Invalid params: format must be one of: json, atlas, binary");
    }

    #[test]
    fn test_type_mismatch() {
        let err = export_schema()
            .validate(&json!({"projectName": 42}))
            .unwrap_err();
        assert_eq!(err, "Invalid params: projectName must be a string");
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        assert!(export_schema().validate(&json!(["hero"])).is_err());
    }

    #[test]
    fn test_required_without_properties() {
        let schema = ParamSchema::from_input_schema(&json!({"required": ["name"]}));
        assert_eq!(schema.required_fields().collect::<Vec<_>>(), vec!["name"]);
        assert!(schema.validate(&json!({"name": 1})).is_ok());
        assert!(schema.validate(&json!({})).is_err());
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let schema = ParamSchema::from_input_schema(&json!({
            "type": "object",
            "properties": {"includeExamples": {"type": "boolean", "default": true}}
        }));
        assert!(schema.validate(&json!({})).is_ok());
        assert!(schema.validate(&json!({"includeExamples": "yes"})).is_err());
    }
}
