//! Declarative tool parameter schemas.
//!
//! Each tool is described once by a [`ToolSpec`]. The same declaration is
//! rendered as the JSON Schema advertised to clients and consumed by
//! [`ToolSpec::validate`], so adding a tool means adding a declaration plus a
//! handler, never hand-written argument parsing.

use serde_json::{Map, Value, json};

use crate::db::{
    MIN_PREFIX_LEN, parse_due_date,
    resolver::{prefix_pattern, validate_prefix},
};
use crate::mcp::error::ToolError;

/// Shape of a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Boolean,
    StringList,
    /// One of a closed set of strings.
    Enum(&'static [&'static str]),
    /// A full canonical UUID.
    Uuid,
    /// A full task UUID or a unique prefix of it.
    TaskRef,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    DateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }

    fn json_schema(&self) -> Value {
        let mut schema = match self.kind {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Boolean => json!({ "type": "boolean" }),
            ParamKind::StringList => json!({ "type": "array", "items": { "type": "string" } }),
            ParamKind::Enum(values) => json!({ "type": "string", "enum": values }),
            ParamKind::Uuid => json!({ "type": "string", "format": "uuid" }),
            ParamKind::TaskRef => json!({
                "type": "string",
                "minLength": MIN_PREFIX_LEN,
                "pattern": prefix_pattern()
            }),
            ParamKind::DateTime => json!({ "type": "string" }),
        };
        schema["description"] = Value::String(self.description.to_string());
        schema
    }
}

impl ToolSpec {
    /// JSON Schema object describing this tool's arguments.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(required));
        schema.insert("additionalProperties".to_string(), json!(false));
        schema
    }

    /// Check arguments against the declaration before anything touches the store.
    ///
    /// Checks run in phases across all parameters: unknown names, required
    /// presence, JSON types, enumerations, identifier formats, dates. An
    /// explicit `null` counts as absent.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<(), ToolError> {
        if let Some(unknown) = args
            .keys()
            .find(|k| !self.params.iter().any(|p| p.name == k.as_str()))
        {
            return Err(ToolError::validation(format!(
                "Unknown parameter '{}' for {}",
                unknown, self.name
            )));
        }

        for param in self.params.iter().filter(|p| p.required) {
            let missing = match args.get(param.name) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if missing {
                return Err(ToolError::validation(format!(
                    "Missing required parameter '{}'",
                    param.name
                )));
            }
        }

        let present: Vec<(&ParamSpec, &Value)> = self
            .params
            .iter()
            .filter_map(|p| match args.get(p.name) {
                None | Some(Value::Null) => None,
                Some(v) => Some((p, v)),
            })
            .collect();

        for (param, value) in &present {
            check_type(param, value)?;
        }

        for (param, value) in &present {
            if let (ParamKind::Enum(allowed), Value::String(s)) = (param.kind, value)
                && !allowed.contains(&s.as_str())
            {
                return Err(ToolError::validation(format!(
                    "Invalid value '{}' for '{}': must be one of {}",
                    s,
                    param.name,
                    allowed.join(", ")
                )));
            }
        }

        for (param, value) in &present {
            let Value::String(s) = value else { continue };
            match param.kind {
                ParamKind::Uuid => {
                    uuid::Uuid::try_parse(s.trim()).map_err(|_| {
                        ToolError::validation(format!(
                            "Parameter '{}' must be a full UUID, got '{}'",
                            param.name, s
                        ))
                    })?;
                }
                ParamKind::TaskRef => {
                    validate_prefix(s).map_err(ToolError::from)?;
                }
                _ => {}
            }
        }

        for (param, value) in &present {
            if let (ParamKind::DateTime, Value::String(s)) = (param.kind, value) {
                parse_due_date(s).map_err(|e| {
                    ToolError::validation(format!("Parameter '{}': {}", param.name, e))
                })?;
            }
        }

        Ok(())
    }
}

fn check_type(param: &ParamSpec, value: &Value) -> Result<(), ToolError> {
    let ok = match param.kind {
        ParamKind::Boolean => value.is_boolean(),
        ParamKind::StringList => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        ParamKind::String
        | ParamKind::Enum(_)
        | ParamKind::Uuid
        | ParamKind::TaskRef
        | ParamKind::DateTime => value.is_string(),
    };
    if ok {
        return Ok(());
    }
    let expected = match param.kind {
        ParamKind::Boolean => "a boolean",
        ParamKind::StringList => "an array of strings",
        _ => "a string",
    };
    Err(ToolError::validation(format!(
        "Parameter '{}' must be {}",
        param.name, expected
    )))
}
