//! Output schema model.
//!
//! [`SchemaNode`] is the recursively nested structure the converter builds;
//! its serde serialization is the JSON Schema document itself. Exactly one
//! of the `type` member and the `oneOf` alternatives list describes a node's
//! type: when alternatives are used, `type` is left unset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The draft the generated documents declare.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// A JSON Schema primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

/// The `additionalProperties` keyword: either a blanket allow/deny or a
/// schema every unknown property must match (how maps are expressed, since
/// JSON Schema has no native map type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}

/// One node of the output schema tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Draft declaration; set on top-level documents only.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Human-readable description extracted from source comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Primitive kind. Unset when `one_of` alternatives are used.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<PrimitiveType>,

    /// Alternative sub-schemas, e.g. "null or typed X".
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,

    /// Object properties by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,

    /// Names of required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Array element schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    /// Permitted values; may mix symbolic names and numbers.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    /// Regular expression for string values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Semantic format for string values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Negated sub-schema (deny-lists).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaNode>>,

    /// Whether unknown object properties are allowed, or the schema they
    /// must match.
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,
}

impl SchemaNode {
    /// An empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bare node of the given primitive kind.
    pub fn of_type(ty: PrimitiveType) -> Self {
        Self {
            ty: Some(ty),
            ..Self::default()
        }
    }

    /// The `null` schema.
    pub fn null() -> Self {
        Self::of_type(PrimitiveType::Null)
    }

    /// A string node carrying a semantic format.
    pub fn string_format(format: impl Into<String>) -> Self {
        Self {
            ty: Some(PrimitiveType::String),
            format: Some(format.into()),
            ..Self::default()
        }
    }

    /// A node whose type is an alternatives list.
    pub fn alternatives(alternatives: Vec<SchemaNode>) -> Self {
        Self {
            one_of: alternatives,
            ..Self::default()
        }
    }

    /// Serialize this node into a JSON value.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_type_serializes_minimal() {
        let node = SchemaNode::of_type(PrimitiveType::String);
        assert_eq!(node.to_json().unwrap(), json!({"type": "string"}));
    }

    #[test]
    fn test_alternatives_leave_type_unset() {
        let node = SchemaNode::alternatives(vec![
            SchemaNode::null(),
            SchemaNode::of_type(PrimitiveType::Integer),
        ]);
        assert!(node.ty.is_none());
        assert_eq!(
            node.to_json().unwrap(),
            json!({"oneOf": [{"type": "null"}, {"type": "integer"}]})
        );
    }

    #[test]
    fn test_additional_properties_bool() {
        let node = SchemaNode {
            ty: Some(PrimitiveType::Object),
            additional_properties: Some(AdditionalProperties::Allowed(false)),
            ..SchemaNode::default()
        };
        assert_eq!(
            node.to_json().unwrap(),
            json!({"type": "object", "additionalProperties": false})
        );
    }

    #[test]
    fn test_additional_properties_schema() {
        let node = SchemaNode {
            ty: Some(PrimitiveType::Object),
            additional_properties: Some(AdditionalProperties::Schema(Box::new(
                SchemaNode::of_type(PrimitiveType::Integer),
            ))),
            ..SchemaNode::default()
        };
        assert_eq!(
            node.to_json().unwrap(),
            json!({"type": "object", "additionalProperties": {"type": "integer"}})
        );
    }

    #[test]
    fn test_mixed_enum_values() {
        let node = SchemaNode {
            enum_values: vec![json!("RED"), json!(0)],
            ..SchemaNode::default()
        };
        assert_eq!(node.to_json().unwrap(), json!({"enum": ["RED", 0]}));
    }

    #[test]
    fn test_string_keywords_rename() {
        let node = SchemaNode {
            ty: Some(PrimitiveType::String),
            min_length: Some(2),
            max_length: Some(4),
            ..SchemaNode::default()
        };
        assert_eq!(
            node.to_json().unwrap(),
            json!({"type": "string", "minLength": 2, "maxLength": 4})
        );
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let value = json!({
            "$schema": DRAFT_07,
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "required": ["name"],
            "additionalProperties": true
        });
        let node: SchemaNode = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(node.to_json().unwrap(), value);
    }
}
