//! Input descriptor model.
//!
//! The conversion engine does not parse schema sources itself; it receives
//! an already-parsed descriptor set from the invocation layer. This module
//! defines that set: files, messages, fields, enumerations, constraint
//! bundles and source-comment records.

mod comments;
mod constraints;
mod types;

pub use comments::{format_description, CommentBlock, SourceInfo};
pub use constraints::{FieldConstraints, MessageRules, StringRules};
pub use types::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, FieldLabel, FileDescriptor,
    MessageDescriptor,
};
