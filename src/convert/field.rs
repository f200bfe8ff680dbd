//! Per-field conversion.
//!
//! Maps one field's kind and constraint bundle onto a JSON Schema fragment:
//! a closed dispatch over the field kind picks the base type, string rules
//! refine it, then repetition and object recursion restructure the result.

use serde_json::Value;
use tracing::trace;

use super::{ConversionState, Converter};
use crate::descriptor::{FieldDescriptor, FieldKind, FieldLabel, MessageDescriptor, StringRules};
use crate::descriptor::format_description;
use crate::error::{ConvertError, ConvertResult};
use crate::registry::NodeId;
use crate::schema::{AdditionalProperties, PrimitiveType, SchemaNode};

impl<'a> Converter<'a> {
    /// Convert one field into a schema fragment, reporting whether the
    /// field is required.
    ///
    /// Only an explicit message-level required constraint makes a field
    /// required; JSON Schema has no implicit requiredness.
    pub(super) fn convert_field(
        &self,
        scope: NodeId,
        field: &'a FieldDescriptor,
        message_qualified_name: &str,
        enclosing: &'a MessageDescriptor,
        state: &mut ConversionState,
    ) -> ConvertResult<(SchemaNode, bool)> {
        let constraints = field.constraints.as_ref();
        let required = constraints.is_some_and(|c| c.is_required());
        let allow_null = self.options.allow_null_values;

        let mut schema = SchemaNode::new();

        let comment_path = format!("{}.{}", message_qualified_name, field.name);
        let description = format_description(self.comment_for(&comment_path));
        if !description.is_empty() {
            schema.description = Some(description);
        }

        match field.kind {
            FieldKind::Double | FieldKind::Float => {
                if allow_null {
                    schema.one_of = vec![
                        SchemaNode::null(),
                        SchemaNode::of_type(PrimitiveType::Number),
                    ];
                } else {
                    schema.ty = Some(PrimitiveType::Number);
                }
            }

            FieldKind::Int32
            | FieldKind::Uint32
            | FieldKind::Fixed32
            | FieldKind::Sfixed32
            | FieldKind::Sint32 => {
                if allow_null {
                    schema.one_of = vec![
                        SchemaNode::null(),
                        SchemaNode::of_type(PrimitiveType::Integer),
                    ];
                } else {
                    schema.ty = Some(PrimitiveType::Integer);
                }
            }

            // 64-bit integers get a string fallback because JSON numeric
            // precision cannot represent the full 64-bit range losslessly.
            FieldKind::Int64
            | FieldKind::Uint64
            | FieldKind::Fixed64
            | FieldKind::Sfixed64
            | FieldKind::Sint64 => {
                schema.one_of.push(SchemaNode::of_type(PrimitiveType::Integer));
                if !self.options.disallow_big_ints_as_strings {
                    schema.one_of.push(SchemaNode::of_type(PrimitiveType::String));
                }
                if allow_null {
                    schema.one_of.push(SchemaNode::null());
                }
            }

            FieldKind::String | FieldKind::Bytes => {
                if allow_null {
                    schema.one_of = vec![
                        SchemaNode::null(),
                        SchemaNode::of_type(PrimitiveType::String),
                    ];
                } else {
                    schema.ty = Some(PrimitiveType::String);
                    if let Some(rules) = constraints.and_then(|c| c.string.as_ref()) {
                        apply_string_rules(&mut schema, rules);
                    }
                }
            }

            FieldKind::Enum => {
                schema.one_of.push(SchemaNode::of_type(PrimitiveType::String));
                schema.one_of.push(SchemaNode::of_type(PrimitiveType::Integer));
                if allow_null {
                    schema.one_of.push(SchemaNode::null());
                }

                // Collect values from the enclosing message's locally
                // declared enumerations whose qualified name matches the
                // field's declared type by suffix.
                let type_name = field.type_name.as_deref().unwrap_or_default();
                for enum_desc in &enclosing.enums {
                    let suffix = format!(".{}.{}", enclosing.name, enum_desc.name);
                    if type_name.ends_with(&suffix) {
                        for value in &enum_desc.values {
                            schema.enum_values.push(Value::String(value.name.clone()));
                            schema.enum_values.push(Value::from(value.number));
                        }
                    }
                }
            }

            FieldKind::Bool => {
                if allow_null {
                    schema.one_of = vec![
                        SchemaNode::null(),
                        SchemaNode::of_type(PrimitiveType::Boolean),
                    ];
                } else {
                    schema.ty = Some(PrimitiveType::Boolean);
                }
            }

            FieldKind::Group | FieldKind::Message => {
                schema.ty = Some(PrimitiveType::Object);
                match field.label {
                    FieldLabel::Optional => {
                        schema.additional_properties = Some(AdditionalProperties::Allowed(true));
                    }
                    FieldLabel::Required => {
                        schema.additional_properties = Some(AdditionalProperties::Allowed(false));
                    }
                    FieldLabel::Repeated => {}
                }
            }

            FieldKind::Unknown => {
                return Err(ConvertError::unsupported_field_type(
                    &field.name,
                    &enclosing.name,
                    field.kind.as_str(),
                ));
            }
        }

        // Repeated fields of non-object base types become arrays: the base
        // type moves onto `items`, stripped of any null alternative, and
        // the outer node becomes the array.
        if field.is_repeated() && schema.ty != Some(PrimitiveType::Object) {
            let description = schema.description.take();
            let mut items = std::mem::take(&mut schema);
            schema.description = description;

            items.one_of.retain(|alt| alt.ty != Some(PrimitiveType::Null));
            collapse_single_alternative(&mut items);
            schema.items = Some(Box::new(items));

            if allow_null {
                schema.one_of = vec![
                    SchemaNode::null(),
                    SchemaNode::of_type(PrimitiveType::Array),
                ];
            } else {
                schema.ty = Some(PrimitiveType::Array);
            }

            return Ok((schema, required));
        }

        // Nested messages and groups: resolve the referenced definition and
        // recurse, then structure the result as a map, an array of objects
        // or an inline object.
        if schema.ty == Some(PrimitiveType::Object) {
            let type_name = field.type_name.as_deref().unwrap_or_default();
            let (qualified_name, record_type) = self
                .registry
                .resolve(scope, type_name, Some((message_qualified_name, enclosing)))
                .ok_or_else(|| {
                    ConvertError::unresolved_type(type_name, &field.name, &enclosing.name)
                })?;

            let converted =
                self.convert_message_inner(scope, &qualified_name, record_type, state)?;

            if record_type.map_entry {
                trace!(field = %field.name, message = %enclosing.name, "map entry field");
                let value_schema = converted.properties.get("value").cloned().ok_or_else(|| {
                    ConvertError::malformed_map(&field.name, &enclosing.name)
                })?;
                schema.additional_properties =
                    Some(AdditionalProperties::Schema(Box::new(value_schema)));
            } else if field.is_repeated() {
                schema.items = Some(Box::new(converted));
                schema.ty = Some(PrimitiveType::Array);
            } else {
                schema.properties = converted.properties;
            }

            if allow_null {
                let ty = schema.ty.take();
                schema.one_of = vec![SchemaNode::null(), SchemaNode { ty, ..SchemaNode::new() }];
            }
        }

        Ok((schema, required))
    }
}

/// Refine a string node with its constraint bundle.
///
/// `pattern`, `prefix` and `suffix` all write the single pattern slot, so
/// at most one of them is effective; the last one applied wins. The same
/// holds for the semantic format flags and the format slot. Both are kept
/// from the original policy as known sharp edges.
fn apply_string_rules(schema: &mut SchemaNode, rules: &StringRules) {
    if let Some(value) = &rules.const_value {
        schema.enum_values = vec![Value::String(value.clone())];
    }
    if let Some(min) = rules.min_len {
        schema.min_length = Some(min);
    }
    if let Some(max) = rules.max_len {
        schema.max_length = Some(max);
    }
    if let Some(len) = rules.len {
        schema.min_length = Some(len);
        schema.max_length = Some(len);
    }
    if let Some(pattern) = &rules.pattern {
        schema.pattern = Some(pattern.clone());
    }
    if let Some(prefix) = &rules.prefix {
        schema.pattern = Some(format!("^{prefix}.*"));
    }
    if let Some(suffix) = &rules.suffix {
        schema.pattern = Some(format!(".*{suffix}$"));
    }
    if !rules.in_values.is_empty() {
        schema.enum_values = rules
            .in_values
            .iter()
            .cloned()
            .map(Value::String)
            .collect();
    }
    if !rules.not_in.is_empty() {
        schema.not = Some(Box::new(SchemaNode {
            enum_values: rules.not_in.iter().cloned().map(Value::String).collect(),
            ..SchemaNode::new()
        }));
    }
    if rules.email {
        schema.format = Some("email".to_string());
    }
    if rules.address {
        schema.ty = None;
        schema.one_of = vec![
            SchemaNode::string_format("ipv4"),
            SchemaNode::string_format("ipv6"),
            SchemaNode::string_format("hostname"),
        ];
    }
    if rules.hostname {
        schema.format = Some("hostname".to_string());
    }
    if rules.ip {
        schema.ty = None;
        schema.one_of = vec![
            SchemaNode::string_format("ipv4"),
            SchemaNode::string_format("ipv6"),
        ];
    }
    if rules.ipv4 {
        schema.format = Some("ipv4".to_string());
    }
    if rules.ipv6 {
        schema.format = Some("ipv6".to_string());
    }
    if rules.uri {
        schema.format = Some("uri".to_string());
    }
    if rules.uri_ref {
        schema.format = Some("uri-reference".to_string());
    }
    if rules.uuid {
        schema.format = Some("uuid".to_string());
    }
}

/// Collapse a one-entry alternatives list consisting of a bare type back
/// into the plain `type` member.
fn collapse_single_alternative(schema: &mut SchemaNode) {
    if schema.one_of.len() == 1 {
        if let Some(ty) = schema.one_of[0].ty {
            if schema.one_of[0] == SchemaNode::of_type(ty) {
                schema.ty = Some(ty);
                schema.one_of.clear();
            }
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::descriptor::{FieldConstraints, FieldDescriptor, FileDescriptor, MessageDescriptor};
    use crate::options::ConvertOptions;
    use proptest::prelude::*;

    fn arb_scalar_kind() -> impl Strategy<Value = FieldKind> {
        prop_oneof![
            Just(FieldKind::Double),
            Just(FieldKind::Float),
            Just(FieldKind::Int32),
            Just(FieldKind::Uint32),
            Just(FieldKind::Sint32),
            Just(FieldKind::Int64),
            Just(FieldKind::Uint64),
            Just(FieldKind::Sint64),
            Just(FieldKind::Bool),
            Just(FieldKind::String),
            Just(FieldKind::Bytes),
        ]
    }

    fn convert_scalar(kind: FieldKind, options: ConvertOptions) -> SchemaNode {
        let files = vec![FileDescriptor::default().with_package("test").with_message(
            MessageDescriptor::new("Holder").with_field(FieldDescriptor::new("value", kind)),
        )];
        let converter = Converter::new(&files, options);
        let schema = converter
            .convert_message(Some("test"), &files[0].messages[0])
            .unwrap();
        schema.properties["value"].clone()
    }

    proptest! {
        /// Null wrapping is structurally additive, never nested: at most
        /// one null alternative appears, no alternative nests further
        /// alternatives, and the type member is unset whenever
        /// alternatives are used.
        #[test]
        fn prop_null_wrapping_never_nests(kind in arb_scalar_kind()) {
            let options = ConvertOptions::new().with_allow_null_values(true);
            let fragment = convert_scalar(kind, options);

            prop_assert!(fragment.ty.is_none());
            let nulls = fragment
                .one_of
                .iter()
                .filter(|alt| alt.ty == Some(PrimitiveType::Null))
                .count();
            prop_assert_eq!(nulls, 1);
            for alternative in &fragment.one_of {
                prop_assert!(alternative.one_of.is_empty());
            }
        }

        /// An exact-length constraint sets both bounds to that value.
        #[test]
        fn prop_exact_length_sets_both_bounds(len in 1u64..1024) {
            let files = vec![FileDescriptor::default().with_package("test").with_message(
                MessageDescriptor::new("Holder").with_field(
                    FieldDescriptor::new("value", FieldKind::String).with_constraints(
                        FieldConstraints::string(StringRules::new().with_len(len)),
                    ),
                ),
            )];
            let converter = Converter::new(&files, ConvertOptions::default());
            let schema = converter
                .convert_message(Some("test"), &files[0].messages[0])
                .unwrap();

            let fragment = &schema.properties["value"];
            prop_assert_eq!(fragment.min_length, Some(len));
            prop_assert_eq!(fragment.max_length, Some(len));
        }

        /// Independent bounds land unchanged on the schema.
        #[test]
        fn prop_min_max_bounds_preserved(min in 0u64..100, max in 100u64..1000) {
            let rules = StringRules::new().with_min_len(min).with_max_len(max);
            let files = vec![FileDescriptor::default().with_package("test").with_message(
                MessageDescriptor::new("Holder").with_field(
                    FieldDescriptor::new("value", FieldKind::String)
                        .with_constraints(FieldConstraints::string(rules)),
                ),
            )];
            let converter = Converter::new(&files, ConvertOptions::default());
            let schema = converter
                .convert_message(Some("test"), &files[0].messages[0])
                .unwrap();

            let fragment = &schema.properties["value"];
            prop_assert_eq!(fragment.min_length, Some(min));
            prop_assert_eq!(fragment.max_length, Some(max));
        }
    }
}
