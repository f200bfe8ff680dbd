//! Convert protocol-message descriptor sets into JSON Schema documents.
//!
//! The crate takes an already-parsed descriptor set ([`descriptor`] module)
//! and derives one draft-07 JSON Schema document per top-level message.
//! Field kinds map to JSON primitive types, nested messages inline
//! recursively, map entries become `additionalProperties` schemas and
//! string validation constraints translate into the matching JSON Schema
//! keywords.
//!
//! # Example
//!
//! ```
//! use proto_jsonschema::descriptor::{FieldDescriptor, FieldKind, FileDescriptor, MessageDescriptor};
//! use proto_jsonschema::{ConvertOptions, Converter};
//!
//! let files = vec![FileDescriptor::default()
//!     .with_package("com.example")
//!     .with_message(
//!         MessageDescriptor::new("Person")
//!             .with_field(FieldDescriptor::new("display_name", FieldKind::String))
//!             .with_field(FieldDescriptor::new("age", FieldKind::Int32)),
//!     )];
//!
//! let converter = Converter::new(&files, ConvertOptions::default());
//! let schema = converter.convert_message(Some("com.example"), &files[0].messages[0])?;
//!
//! let json = schema.to_json()?;
//! assert_eq!(json["properties"]["displayName"]["type"], "string");
//! assert_eq!(json["properties"]["age"]["type"], "integer");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod descriptor;

mod convert;
mod error;
mod options;
mod registry;
mod schema;

pub use convert::Converter;
pub use error::{ConvertError, ConvertResult};
pub use options::ConvertOptions;
pub use registry::PackageRegistry;
pub use schema::{AdditionalProperties, PrimitiveType, SchemaNode, DRAFT_07};
