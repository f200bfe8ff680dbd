//! Conversion configuration.

use serde::{Deserialize, Serialize};

/// Options recognized by the converter. All default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Wrap every field's schema as `oneOf [null, <original type>]`.
    pub allow_null_values: bool,

    /// Emit `additionalProperties: false` on object schemas instead of
    /// `true`, rejecting properties outside the schema.
    pub disallow_additional_properties: bool,

    /// Drop the string fallback alternative on 64-bit integer fields,
    /// leaving only `integer`.
    pub disallow_big_ints_as_strings: bool,
}

impl ConvertOptions {
    /// Create options with everything off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set null-value wrapping.
    pub fn with_allow_null_values(mut self, allow: bool) -> Self {
        self.allow_null_values = allow;
        self
    }

    /// Set rejection of unknown object properties.
    pub fn with_disallow_additional_properties(mut self, disallow: bool) -> Self {
        self.disallow_additional_properties = disallow;
        self
    }

    /// Set suppression of the 64-bit string fallback.
    pub fn with_disallow_big_ints_as_strings(mut self, disallow: bool) -> Self {
        self.disallow_big_ints_as_strings = disallow;
        self
    }
}
