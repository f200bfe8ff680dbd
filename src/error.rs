//! Error types for schema conversion.
//!
//! Every error is terminal for the conversion of the enclosing top-level
//! message: no partial schema is returned. Errors carry the offending field
//! and message names so the caller can decide whether to abort the run or
//! skip the failed message.

use thiserror::Error;

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Main error type for schema conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A field declared a kind the converter does not handle.
    #[error("unsupported field kind '{kind}' for field '{field}' in message '{message}'")]
    UnsupportedFieldType {
        field: String,
        message: String,
        kind: String,
    },

    /// An object-typed field's declared type could not be resolved by any
    /// lookup strategy.
    #[error("no such message type named '{type_name}' (field '{field}' in message '{message}')")]
    UnresolvedType {
        type_name: String,
        field: String,
        message: String,
    },

    /// A map-entry type is missing its `value` slot.
    #[error("map entry type for field '{field}' in message '{message}' has no 'value' property")]
    MalformedMap { field: String, message: String },

    /// A message refers back to itself, directly or transitively.
    #[error("cyclic type reference detected: {}", .cycle.join(" -> "))]
    CyclicType { cycle: Vec<String> },
}

impl ConvertError {
    /// Create an unsupported-field-type error.
    pub fn unsupported_field_type(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::UnsupportedFieldType {
            field: field.into(),
            message: message.into(),
            kind: kind.into(),
        }
    }

    /// Create an unresolved-type error.
    pub fn unresolved_type(
        type_name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnresolvedType {
            type_name: type_name.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-map error.
    pub fn malformed_map(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedMap {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a cyclic-type error from the offending path.
    pub fn cyclic_type(cycle: Vec<String>) -> Self {
        Self::CyclicType { cycle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = ConvertError::unresolved_type(".pkg.Missing", "owner", "Pet");
        let text = err.to_string();
        assert!(text.contains(".pkg.Missing"));
        assert!(text.contains("owner"));
        assert!(text.contains("Pet"));
    }

    #[test]
    fn test_cycle_display_joins_path() {
        let err = ConvertError::cyclic_type(vec![
            ".pkg.A".to_string(),
            ".pkg.B".to_string(),
            ".pkg.A".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "cyclic type reference detected: .pkg.A -> .pkg.B -> .pkg.A"
        );
    }
}
