//! Binding configuration for value converters
//!
//! A [`BindingConfig`] is fixed when a [`crate::converter::ConverterRegistry`] is created and
//! copied into every converter the registry builds, so converters stay immutable.

use crate::typesystem::ContentFormat;

/// Configuration for converting values between their wire and typed representations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingConfig {
    /// Format used when a content converter wraps a bare payload
    pub default_format: ContentFormat,

    /// Match enumeration member names case-insensitively when parsing strings
    pub enum_ignore_case: bool,

    /// Trim surrounding whitespace before parsing a non-string primitive
    /// Strings bound to `System.String` are never trimmed
    pub trim_whitespace: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            default_format: ContentFormat::Xml,
            enum_ignore_case: false,
            trim_whitespace: true,
        }
    }
}

impl BindingConfig {
    /// Creates a strict configuration
    ///
    /// Input must match the invariant representation exactly: no trimming and case-sensitive
    /// enumeration names.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            default_format: ContentFormat::Xml,
            enum_ignore_case: false,
            trim_whitespace: false,
        }
    }

    /// Creates a lenient configuration suitable for hand-written query strings
    ///
    /// Trims input, matches enumeration names case-insensitively and wraps content as JSON.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            default_format: ContentFormat::Json,
            enum_ignore_case: true,
            trim_whitespace: true,
        }
    }

    /// Returns a copy with a different default content format
    #[must_use]
    pub fn with_default_format(mut self, format: ContentFormat) -> Self {
        self.default_format = format;
        self
    }
}
