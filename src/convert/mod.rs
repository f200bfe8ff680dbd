//! The conversion engine.
//!
//! [`Converter`] is built once per run from the complete descriptor set and
//! is read-only afterwards, so independent conversions may run in parallel.
//! Each [`Converter::convert_message`] call derives a fresh schema tree
//! from the registry and the message's own field list; no state survives
//! between calls.

mod field;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::descriptor::{format_description, CommentBlock, FileDescriptor, MessageDescriptor};
use crate::error::{ConvertError, ConvertResult};
use crate::options::ConvertOptions;
use crate::registry::{NodeId, PackageRegistry};
use crate::schema::{AdditionalProperties, PrimitiveType, SchemaNode, DRAFT_07};

/// Converts message definitions from a descriptor set into JSON Schema
/// documents.
#[derive(Debug)]
pub struct Converter<'a> {
    options: ConvertOptions,
    registry: PackageRegistry<'a>,
    /// Source comments from every file, keyed by declaration path.
    comments: HashMap<&'a str, &'a CommentBlock>,
}

/// Per-conversion scratch state: the cycle guard and the memo cache.
#[derive(Debug, Default)]
struct ConversionState {
    /// Qualified names currently being converted, outermost first.
    visiting: Vec<String>,
    /// Finished message schemas by qualified name.
    memo: HashMap<String, SchemaNode>,
}

impl<'a> Converter<'a> {
    /// Build a converter from the complete descriptor set for one run.
    pub fn new(files: &'a [FileDescriptor], options: ConvertOptions) -> Self {
        let registry = PackageRegistry::from_files(files);
        let mut comments = HashMap::new();
        for file in files {
            for (path, block) in file.source_info.iter() {
                comments.insert(path, block);
            }
        }
        Self {
            options,
            registry,
            comments,
        }
    }

    /// The options this converter was built with.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert one top-level message into a JSON Schema document.
    ///
    /// `package` is the dotted package the message was declared in (`None`
    /// for the unnamed root package). The produced document carries the
    /// draft declaration; any field-level failure aborts the whole
    /// conversion.
    pub fn convert_message(
        &self,
        package: Option<&str>,
        message: &'a MessageDescriptor,
    ) -> ConvertResult<SchemaNode> {
        let scope = package
            .and_then(|p| self.registry.lookup_package(p))
            .unwrap_or_else(|| self.registry.root());
        let qualified_name = format!("{}.{}", self.registry.node_name(scope), message.name);

        let mut state = ConversionState::default();
        let mut schema = self.convert_message_inner(scope, &qualified_name, message, &mut state)?;
        schema.schema = Some(DRAFT_07.to_string());
        Ok(schema)
    }

    /// Convert a message, guarding against cyclic type graphs and reusing
    /// already-converted schemas within the same conversion.
    fn convert_message_inner(
        &self,
        scope: NodeId,
        qualified_name: &str,
        message: &'a MessageDescriptor,
        state: &mut ConversionState,
    ) -> ConvertResult<SchemaNode> {
        if let Some(start) = state.visiting.iter().position(|name| name == qualified_name) {
            let mut cycle = state.visiting[start..].to_vec();
            cycle.push(qualified_name.to_string());
            return Err(ConvertError::cyclic_type(cycle));
        }
        if let Some(cached) = state.memo.get(qualified_name) {
            return Ok(cached.clone());
        }

        state.visiting.push(qualified_name.to_string());
        let result = self.assemble_message(scope, qualified_name, message, state);
        state.visiting.pop();

        let schema = result?;
        state
            .memo
            .insert(qualified_name.to_string(), schema.clone());
        Ok(schema)
    }

    fn assemble_message(
        &self,
        scope: NodeId,
        qualified_name: &str,
        message: &'a MessageDescriptor,
        state: &mut ConversionState,
    ) -> ConvertResult<SchemaNode> {
        trace!(message = %qualified_name, "converting message");

        let mut schema = SchemaNode::new();
        if self.options.allow_null_values {
            schema.one_of = vec![
                SchemaNode::null(),
                SchemaNode::of_type(PrimitiveType::Object),
            ];
        } else {
            schema.ty = Some(PrimitiveType::Object);
        }
        schema.additional_properties = Some(AdditionalProperties::Allowed(
            !self.options.disallow_additional_properties,
        ));

        let description = format_description(self.comment_for(qualified_name));
        if !description.is_empty() {
            schema.description = Some(description);
        }

        for field_desc in &message.fields {
            let (field_schema, required) = self
                .convert_field(scope, field_desc, qualified_name, message, state)
                .map_err(|err| {
                    debug!(
                        field = %field_desc.name,
                        message = %message.name,
                        error = %err,
                        "failed to convert field"
                    );
                    err
                })?;
            let json_name = field_desc.json_name();
            debug!(field = %json_name, "converted field");
            if required {
                schema.required.push(json_name.clone());
            }
            schema.properties.insert(json_name, field_schema);
        }

        Ok(schema)
    }

    fn comment_for(&self, path: &str) -> Option<&'a CommentBlock> {
        self.comments.get(path).copied()
    }
}
