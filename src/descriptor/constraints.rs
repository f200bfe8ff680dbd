//! Field constraint bundles.
//!
//! A constraint bundle is the parsed set of validation rules attached to one
//! field. Bundles are immutable inputs to the converter; only the string
//! rules and the message-level required flag influence the generated schema.

use serde::{Deserialize, Serialize};

/// Validation constraints attached to a single field, grouped per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
    /// Rules applying to string and byte-sequence fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<StringRules>,

    /// Rules applying to message-typed fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRules>,
}

impl FieldConstraints {
    /// A bundle that only marks the field as required.
    pub fn required() -> Self {
        Self {
            string: None,
            message: Some(MessageRules { required: true }),
        }
    }

    /// A bundle carrying string rules.
    pub fn string(rules: StringRules) -> Self {
        Self {
            string: Some(rules),
            message: None,
        }
    }

    /// Mark the field as required, keeping any other rules.
    pub fn with_required(mut self, required: bool) -> Self {
        self.message = Some(MessageRules { required });
        self
    }

    /// Whether the bundle explicitly marks the field required.
    pub fn is_required(&self) -> bool {
        self.message.as_ref().is_some_and(|m| m.required)
    }
}

/// Message-level rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageRules {
    /// Whether the field must be present.
    #[serde(default)]
    pub required: bool,
}

/// String rules: length bounds, pattern slots, value lists and semantic
/// format flags.
///
/// `pattern`, `prefix` and `suffix` all feed the schema's single
/// regular-expression slot; the last one applied wins. Likewise the format
/// flags share one format slot and are applied in a fixed order. Both are
/// preserved quirks of the original policy, not precedence rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringRules {
    /// Constant value; collapses the type to a single-entry enumeration.
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<String>,

    /// Exact length; sets both bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<u64>,

    /// Minimum length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_len: Option<u64>,

    /// Maximum length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<u64>,

    /// Regular expression the value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Required prefix, expressed as `^prefix.*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Required suffix, expressed as `.*suffix$`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Allow-list of permitted values.
    #[serde(rename = "in", default, skip_serializing_if = "Vec::is_empty")]
    pub in_values: Vec<String>,

    /// Deny-list of forbidden values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub email: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hostname: bool,

    /// Either IP version; expands to an alternatives list.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ip: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ipv4: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ipv6: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uri: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uri_ref: bool,

    /// IP of either version or a hostname; expands to an alternatives list.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub address: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uuid: bool,
}

impl StringRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constant value.
    pub fn with_const(mut self, value: impl Into<String>) -> Self {
        self.const_value = Some(value.into());
        self
    }

    /// Set the exact length.
    pub fn with_len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    /// Set the minimum length.
    pub fn with_min_len(mut self, min_len: u64) -> Self {
        self.min_len = Some(min_len);
        self
    }

    /// Set the maximum length.
    pub fn with_max_len(mut self, max_len: u64) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Set the regular expression.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the required prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the required suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Set the allow-list.
    pub fn with_in<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.in_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the deny-list.
    pub fn with_not_in<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_in = values.into_iter().map(Into::into).collect();
        self
    }
}
