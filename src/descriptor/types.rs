//! Descriptor model definitions.
//!
//! This module defines the parsed form of a protocol-message schema set as
//! the conversion engine receives it from the invocation layer: files that
//! carry a package name and top-level message definitions, messages that
//! carry fields, nested messages and enums, and fields that carry a kind,
//! a label, a declared type name and an optional constraint bundle.

use serde::{Deserialize, Serialize};

use super::comments::SourceInfo;
use super::constraints::FieldConstraints;

/// One schema file: a package name plus its top-level declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Dotted package name. `None` for the unnamed root package; a leading
    /// separator is tolerated and skipped during registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Top-level message definitions in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageDescriptor>,

    /// Source comments keyed by fully-qualified declaration path.
    #[serde(default, skip_serializing_if = "SourceInfo::is_empty")]
    pub source_info: SourceInfo,
}

impl FileDescriptor {
    /// Set the package name.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Add a top-level message definition.
    pub fn with_message(mut self, message: MessageDescriptor) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the source-comment records for this file.
    pub fn with_source_info(mut self, source_info: SourceInfo) -> Self {
        self.source_info = source_info;
        self
    }
}

/// A message definition: named fields plus locally declared nested types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    /// Local (unqualified) message name.
    pub name: String,

    /// Fields in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,

    /// Nested message definitions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_types: Vec<MessageDescriptor>,

    /// Locally declared enumerations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumDescriptor>,

    /// Marks a synthetic two-field `key`/`value` record standing in for an
    /// associative mapping.
    #[serde(default)]
    pub map_entry: bool,
}

impl MessageDescriptor {
    /// Create a new message definition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a nested message definition.
    pub fn with_nested_type(mut self, nested: MessageDescriptor) -> Self {
        self.nested_types.push(nested);
        self
    }

    /// Add a locally declared enumeration.
    pub fn with_enum(mut self, enumeration: EnumDescriptor) -> Self {
        self.enums.push(enumeration);
        self
    }

    /// Mark this message as a map entry.
    pub fn with_map_entry(mut self, map_entry: bool) -> Self {
        self.map_entry = map_entry;
        self
    }
}

/// A single message field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Declared (snake_case) field name.
    pub name: String,

    /// Wire-compatible name override. Derived from `name` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,

    /// Primitive or composite kind.
    pub kind: FieldKind,

    /// Cardinality label.
    #[serde(default)]
    pub label: FieldLabel,

    /// Declared type name for enum-, message- and group-kinded fields,
    /// absolute (leading separator), package-relative or nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Parsed validation constraints, when the field carries any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<FieldConstraints>,
}

impl FieldDescriptor {
    /// Create a new field with the given name and kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            json_name: None,
            kind,
            label: FieldLabel::default(),
            type_name: None,
            constraints: None,
        }
    }

    /// Set the cardinality label.
    pub fn with_label(mut self, label: FieldLabel) -> Self {
        self.label = label;
        self
    }

    /// Set the declared type name.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set the wire-compatible name override.
    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }

    /// Attach a constraint bundle.
    pub fn with_constraints(mut self, constraints: FieldConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// The wire-compatible (lower-camel-case) property name.
    pub fn json_name(&self) -> String {
        match &self.json_name {
            Some(name) => name.clone(),
            None => to_lower_camel(&self.name),
        }
    }

    /// Whether this field is repeated.
    pub fn is_repeated(&self) -> bool {
        self.label == FieldLabel::Repeated
    }
}

/// The primitive or composite category declared for a field.
///
/// The set is closed over the source schema format's field kinds; `Unknown`
/// absorbs unrecognized wire values during deserialization and is rejected
/// at conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Uint32,
    Fixed32,
    Sfixed32,
    Sint32,
    Int64,
    Uint64,
    Fixed64,
    Sfixed64,
    Sint64,
    Bool,
    String,
    Bytes,
    Enum,
    Group,
    Message,
    #[serde(other)]
    Unknown,
}

impl FieldKind {
    /// Raw kind name, as carried in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Double => "double",
            FieldKind::Float => "float",
            FieldKind::Int32 => "int32",
            FieldKind::Uint32 => "uint32",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Sint32 => "sint32",
            FieldKind::Int64 => "int64",
            FieldKind::Uint64 => "uint64",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Sint64 => "sint64",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Enum => "enum",
            FieldKind::Group => "group",
            FieldKind::Message => "message",
            FieldKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLabel {
    /// At most one value; the default.
    #[default]
    Optional,

    /// Exactly one value (legacy required label).
    Required,

    /// Zero or more values.
    Repeated,
}

/// An enumeration definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// Local (unqualified) enum name.
    pub name: String,

    /// Declared values in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
    /// Create a new enum definition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Add a value.
    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValueDescriptor {
            name: name.into(),
            number,
        });
        self
    }
}

/// A single enumeration value: symbolic name plus numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
}

/// Convert snake_case to lowerCamelCase.
fn to_lower_camel(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
