//! Plugin configuration: indentation policy and value transforms.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Per-key hook consulted while rendering the exported value, matching the
/// behavior of a `JSON.stringify` replacer function.
pub type TransformFn = dyn Fn(&str, &Value) -> Option<Value> + Send + Sync;

/// Whitespace policy for the emitted JSON text.
///
/// Resolution follows `JSON.stringify` indent semantics: numeric indents are
/// clamped to 10 spaces, string indents are cut to their first 10 characters,
/// and zero or empty means compact output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    /// No insignificant whitespace.
    Compact,
    /// Indent nested levels with the given number of spaces.
    Spaces(u8),
    /// Indent nested levels with a literal string.
    Text(String),
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(4)
    }
}

impl Indent {
    /// Resolve to the literal per-level indent text, or `None` for compact.
    pub(crate) fn as_text(&self) -> Option<String> {
        match self {
            Indent::Compact => None,
            Indent::Spaces(0) => None,
            Indent::Spaces(count) => Some(" ".repeat(usize::from(*count).min(10))),
            Indent::Text(text) if text.is_empty() => None,
            Indent::Text(text) => Some(text.chars().take(10).collect()),
        }
    }
}

/// Filters or rewrites parts of the exported value before rendering.
#[derive(Clone)]
pub enum ValueTransform {
    /// Called for every key/value pair, root first (the root key is `""`).
    /// Array elements are visited under their decimal index. Returning
    /// `None` drops an object member; a dropped array element renders as
    /// `null`. The returned value is walked recursively.
    Function(Arc<TransformFn>),
    /// Keep only the listed object keys, at every nesting level. Arrays and
    /// scalars pass through unchanged.
    Keys(Vec<String>),
}

impl fmt::Debug for ValueTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueTransform::Function(_) => f.write_str("ValueTransform::Function(..)"),
            ValueTransform::Keys(keys) => f.debug_tuple("ValueTransform::Keys").field(keys).finish(),
        }
    }
}

/// Configuration options for [`JsonOutputPlugin`](crate::JsonOutputPlugin).
#[derive(Debug, Clone)]
pub struct JsonOutputOptions {
    /// Whitespace policy for the emitted JSON text.
    pub indent: Indent,
    /// Optional filter/rewrite hook applied to the exported value.
    pub value_transform: Option<ValueTransform>,
    /// When `true`, a host build that minifies its output forces compact
    /// JSON regardless of `indent`.
    pub respect_global_minify: bool,
}

impl Default for JsonOutputOptions {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            value_transform: None,
            respect_global_minify: true,
        }
    }
}

impl JsonOutputOptions {
    /// Create options with the defaults: 4-space indentation, no value
    /// transform, and deference to the host's minify setting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation policy.
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Install a value transform.
    pub fn with_value_transform(mut self, transform: ValueTransform) -> Self {
        self.value_transform = Some(transform);
        self
    }

    /// Control whether the host's global minify setting overrides `indent`.
    pub fn respect_global_minify(mut self, respect: bool) -> Self {
        self.respect_global_minify = respect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_indent_is_four_spaces() {
        assert_eq!(Indent::default().as_text().as_deref(), Some("    "));
    }

    #[test]
    fn numeric_indent_clamps_to_ten() {
        assert_eq!(Indent::Spaces(12).as_text().as_deref(), Some("          "));
        assert_eq!(Indent::Spaces(2).as_text().as_deref(), Some("  "));
    }

    #[test]
    fn zero_and_empty_indents_mean_compact() {
        assert_eq!(Indent::Spaces(0).as_text(), None);
        assert_eq!(Indent::Text(String::new()).as_text(), None);
        assert_eq!(Indent::Compact.as_text(), None);
    }

    #[test]
    fn string_indent_truncates_to_ten_chars() {
        assert_eq!(Indent::Text("\t".to_string()).as_text().as_deref(), Some("\t"));
        assert_eq!(
            Indent::Text("abcdefghijkl".to_string()).as_text().as_deref(),
            Some("abcdefghij")
        );
    }

    #[test]
    fn options_default_respects_global_minify() {
        let options = JsonOutputOptions::default();
        assert!(options.respect_global_minify);
        assert!(options.value_transform.is_none());
        assert_eq!(options.indent, Indent::Spaces(4));
    }
}
