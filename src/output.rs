//! JSON rendering of token trees.
//!
//! Every AST node derives [`serde::Serialize`], so any tokenized option can
//! be printed compactly with [`to_json()`] or indented with
//! [`to_json_pretty()`]. Expression nodes carry a `"type"` tag naming the
//! node kind; `$apply` transformations carry a `"transformation"` tag.
//!
//! # Examples
//!
//! ```
//! use qopt::output::to_json;
//! use qopt::QueryOptionParser;
//!
//! let token = QueryOptionParser::default().parse_filter("Price gt 10").unwrap();
//! let json = to_json(&token).unwrap();
//! assert!(json.starts_with(r#"{"type":"BinaryOperator","kind":"GreaterThan""#));
//! ```

use serde::Serialize;

/// Compact JSON, no whitespace between tokens
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Pretty JSON with 2-space indentation
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Render compactly or pretty depending on `pretty`
pub fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        to_json_pretty(value)
    } else {
        to_json(value)
    }
}
