//! Configuration options for the codec.
//!
//! [`CodecOptions`] collects every knob the encoder and decoder recognise:
//!
//! - `infinity_sentinel`: finite number written in place of positive infinity
//! - `name_prefix`: string prepended to every emitted/expected table name
//! - `comma_required`: strict comma-delimited decoding, or the legacy variant where
//!   whitespace also separates values
//! - `escape_marker`: character prepended to field names that collide with reserved words
//! - `require_non_empty`: refuse to encode tables without rows
//!
//! Options can be built fluently or loaded from any serde format; missing keys fall back
//! to the defaults.
//!
//! ## Examples
//!
//! ```rust
//! use opl_dat::CodecOptions;
//!
//! let options = CodecOptions::new()
//!     .with_name_prefix("in_")
//!     .with_infinity_sentinel(1e9);
//! assert_eq!(options.name_prefix, "in_");
//! assert!(options.comma_required);
//! ```

use serde::{Deserialize, Serialize};

/// Default stand-in for positive infinity.
pub const DEFAULT_INFINITY: f64 = 999_999.0;

/// Default character used to escape reserved field names.
pub const DEFAULT_ESCAPE_MARKER: char = '_';

/// Configuration options for encoding and decoding.
///
/// # Examples
///
/// ```rust
/// use opl_dat::CodecOptions;
///
/// // Defaults: sentinel 999999, no prefix, commas required, '_' marker
/// let options = CodecOptions::new();
/// assert_eq!(options.infinity_sentinel, 999999.0);
///
/// // Legacy whitespace-delimited output
/// let options = CodecOptions::legacy();
/// assert!(!options.comma_required);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub infinity_sentinel: f64,
    pub name_prefix: String,
    pub comma_required: bool,
    pub escape_marker: char,
    pub require_non_empty: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            infinity_sentinel: DEFAULT_INFINITY,
            name_prefix: String::new(),
            comma_required: true,
            escape_marker: DEFAULT_ESCAPE_MARKER,
            require_non_empty: false,
        }
    }
}

impl CodecOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for reading text where values may be separated by whitespace
    /// instead of commas.
    #[must_use]
    pub fn legacy() -> Self {
        CodecOptions {
            comma_required: false,
            ..Default::default()
        }
    }

    /// Sets the number written in place of positive infinity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use opl_dat::CodecOptions;
    ///
    /// let options = CodecOptions::new().with_infinity_sentinel(1e6);
    /// assert_eq!(options.infinity_sentinel, 1e6);
    /// ```
    #[must_use]
    pub fn with_infinity_sentinel(mut self, sentinel: f64) -> Self {
        self.infinity_sentinel = sentinel;
        self
    }

    /// Sets the prefix prepended to every table name.
    #[must_use]
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Selects strict (`true`) or legacy whitespace-delimited (`false`) decoding.
    #[must_use]
    pub fn with_comma_required(mut self, required: bool) -> Self {
        self.comma_required = required;
        self
    }

    /// Sets the escape marker for reserved field names.
    #[must_use]
    pub fn with_escape_marker(mut self, marker: char) -> Self {
        self.escape_marker = marker;
        self
    }

    /// Makes encoding fail on tables without rows.
    #[must_use]
    pub fn with_require_non_empty(mut self, require: bool) -> Self {
        self.require_non_empty = require;
        self
    }

    /// Returns `name` with the configured prefix prepended.
    #[must_use]
    pub fn prefixed(&self, name: &str) -> String {
        format!("{}{}", self.name_prefix, name)
    }

    /// Strips the configured prefix from `name`, or `None` if `name` lacks it.
    #[must_use]
    pub fn unprefixed<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_prefix(self.name_prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_round_trip() {
        let options = CodecOptions::new().with_name_prefix("out_");
        assert_eq!(options.prefixed("flow"), "out_flow");
        assert_eq!(options.unprefixed("out_flow"), Some("flow"));
        assert_eq!(options.unprefixed("flow"), None);
        assert_eq!(options.unprefixed("flow_out_"), None);
        assert_eq!(CodecOptions::new().unprefixed("flow"), Some("flow"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let options: CodecOptions =
            serde_json::from_str(r#"{"name_prefix": "in_", "comma_required": false}"#).unwrap();
        assert_eq!(options.name_prefix, "in_");
        assert!(!options.comma_required);
        assert_eq!(options.infinity_sentinel, DEFAULT_INFINITY);
        assert_eq!(options.escape_marker, '_');
    }
}
