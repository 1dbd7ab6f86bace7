//! Tool definitions served by `tools/list`.
//!
//! Every definition is generated from the west catalog's parameter tables,
//! so the advertised JSON Schema and the command builder's validation can
//! never drift apart.

use serde_json::{json, Map, Value};

use crate::west::catalog::{ParamKind, ParamSpec, ToolSpec, CATALOG};

/// One advertised tool, in MCP `tools/list` shape.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// All tools, in catalog order.
pub fn list_tools() -> Vec<ToolDefinition> {
    CATALOG
        .iter()
        .map(|spec| ToolDefinition {
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            input_schema: input_schema(spec),
        })
        .collect()
}

/// JSON Schema for one tool's arguments object.
pub fn input_schema(spec: &ToolSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for p in spec.params {
        properties.insert(p.name.to_string(), property_schema(p));
        if p.required {
            required.push(p.name);
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn property_schema(p: &ParamSpec) -> Value {
    match p.kind {
        ParamKind::Flag { .. } => json!({
            "type": "boolean",
            "description": p.description,
        }),
        ParamKind::Value { .. } | ParamKind::Positional => match p.allowed {
            Some(allowed) => json!({
                "type": "string",
                "enum": allowed,
                "description": p.description,
            }),
            None => json!({
                "type": "string",
                "description": p.description,
            }),
        },
        ParamKind::Repeated { .. } | ParamKind::Trailing | ParamKind::Rest => json!({
            "type": "array",
            "items": { "type": "string" },
            "description": p.description,
        }),
    }
}
