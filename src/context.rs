//! Per-call tokenizer state and the settings it is built from.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{ParseError, ParseResult};
use crate::lexer::{Dialect, Lexer};

/// Implicit iteration variable, always in scope
pub const IT_VARIABLE: &str = "$it";
/// Self reference, always in scope
pub const THIS_VARIABLE: &str = "$this";

/// Default for [`TokenizerSettings::max_depth`].
///
/// Keeps the deepest accepted input within a 2 MB thread stack in
/// unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs shared by every tokenize call made through one parser.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use qopt::TokenizerSettings;
///
/// let settings: TokenizerSettings =
///     serde_json::from_str(r#"{"max_depth": 64, "case_insensitive": true}"#).unwrap();
/// assert_eq!(settings.max_depth, 64);
/// assert!(!settings.allow_no_dollar_prefix);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenizerSettings {
    /// Maximum nesting of grammar levels before the call aborts.
    ///
    /// Operator chains (`a or b or c`), prefix operators and path segments
    /// count one level per link, since the tree they build is as deep as
    /// the chain is long. Items of an `in (...)` list do not.
    pub max_depth: usize,
    /// Match keywords (`and`, `asc`, `as`, option names, ...) ignoring ASCII case
    pub case_insensitive: bool,
    /// Accept nested option keys without the leading `$`
    pub allow_no_dollar_prefix: bool,
    /// Accept `$ref` segments in `$select`
    pub enable_ref_in_select: bool,
    /// Maximum number of segments in a select/expand path
    pub max_path_length: usize,
    /// Extra binary operator keywords, parsed at comparison precedence
    pub custom_operators: Vec<String>,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        TokenizerSettings {
            max_depth: DEFAULT_MAX_DEPTH,
            case_insensitive: false,
            allow_no_dollar_prefix: false,
            enable_ref_in_select: false,
            max_path_length: usize::MAX,
            custom_operators: Vec::new(),
        }
    }
}

/// Mutable state threaded through one top-level tokenize call.
///
/// Holds the recursion counter, the range variables currently in scope and
/// the settings. Create one per call and drop it afterwards.
#[derive(Debug, Clone)]
pub struct TokenizerContext {
    depth: usize,
    parameters: HashSet<String>,
    settings: TokenizerSettings,
}

impl TokenizerContext {
    pub fn new(settings: TokenizerSettings) -> Self {
        let parameters = [IT_VARIABLE, THIS_VARIABLE]
            .into_iter()
            .map(String::from)
            .collect();
        TokenizerContext {
            depth: 0,
            parameters,
            settings,
        }
    }

    pub fn settings(&self) -> &TokenizerSettings {
        &self.settings
    }

    pub fn case_insensitive(&self) -> bool {
        self.settings.case_insensitive
    }

    pub fn allow_no_dollar_prefix(&self) -> bool {
        self.settings.allow_no_dollar_prefix
    }

    pub fn max_depth(&self) -> usize {
        self.settings.max_depth
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter one grammar level. Fails once the depth passes `max_depth`.
    pub fn enter_recurse(&mut self) -> ParseResult<()> {
        self.enter_levels(1)
    }

    pub fn leave_recurse(&mut self) -> ParseResult<()> {
        self.leave_levels(1)
    }

    /// Enter `levels` grammar levels at once, or none if that passes `max_depth`.
    pub fn enter_levels(&mut self, levels: usize) -> ParseResult<()> {
        if self.depth.saturating_add(levels) > self.settings.max_depth {
            return Err(ParseError::RecursionDepthExceeded {
                max_depth: self.settings.max_depth,
            });
        }
        self.depth += levels;
        Ok(())
    }

    pub fn leave_levels(&mut self, levels: usize) -> ParseResult<()> {
        if self.depth < levels {
            return Err(ParseError::RecursionMismatch);
        }
        self.depth -= levels;
        Ok(())
    }

    /// Run `f` one recursion level deeper.
    ///
    /// The level is left on every exit path, including when `f` fails; the
    /// error from `f` takes precedence over an accounting mismatch.
    pub fn recurse<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.recurse_levels(1, f)
    }

    /// Like [`recurse`](Self::recurse), charging `levels` for one step
    pub fn recurse_levels<T>(
        &mut self,
        levels: usize,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.enter_levels(levels)?;
        let result = f(self);
        let left = self.leave_levels(levels);
        let value = result?;
        left?;
        Ok(value)
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.contains(name)
    }

    /// Bring a range variable into scope.
    pub fn declare_parameter(&mut self, name: &str) -> ParseResult<()> {
        if !self.parameters.insert(name.to_string()) {
            return Err(ParseError::DuplicateRangeVariable {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn remove_parameter(&mut self, name: &str) {
        self.parameters.remove(name);
    }

    /// Lexer over `text` whose token positions start at `base_offset`.
    pub fn create_lexer<'a>(&self, text: &'a str, dialect: Dialect, base_offset: usize) -> Lexer<'a> {
        Lexer::with_offset(text, dialect, base_offset)
    }

    /// Whether `text` is a keyword under the case-sensitivity setting
    pub fn keyword_matches(&self, text: &str, keyword: &str) -> bool {
        text == keyword || (self.settings.case_insensitive && text.eq_ignore_ascii_case(keyword))
    }
}

impl Default for TokenizerContext {
    fn default() -> Self {
        TokenizerContext::new(TokenizerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_limit() {
        let mut ctx = TokenizerContext::new(TokenizerSettings {
            max_depth: 2,
            ..TokenizerSettings::default()
        });
        ctx.enter_recurse().unwrap();
        ctx.enter_recurse().unwrap();
        assert_eq!(
            ctx.enter_recurse(),
            Err(ParseError::RecursionDepthExceeded { max_depth: 2 })
        );
        assert_eq!(ctx.depth(), 2);
    }

    #[test]
    fn test_leave_without_enter() {
        let mut ctx = TokenizerContext::default();
        assert_eq!(ctx.leave_recurse(), Err(ParseError::RecursionMismatch));
    }

    #[test]
    fn test_recurse_leaves_on_error() {
        let mut ctx = TokenizerContext::default();
        let result: ParseResult<()> =
            ctx.recurse(|_| Err(ParseError::ExpressionExpected { position: 3 }));
        assert_eq!(result, Err(ParseError::ExpressionExpected { position: 3 }));
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_weighted_levels() {
        let mut ctx = TokenizerContext::new(TokenizerSettings {
            max_depth: 10,
            ..TokenizerSettings::default()
        });
        ctx.enter_levels(8).unwrap();
        assert_eq!(
            ctx.enter_levels(3),
            Err(ParseError::RecursionDepthExceeded { max_depth: 10 })
        );
        assert_eq!(ctx.depth(), 8);
        let inner = ctx.recurse_levels(2, |ctx| Ok(ctx.depth()));
        assert_eq!(inner, Ok(10));
        ctx.leave_levels(8).unwrap();
        assert_eq!(ctx.leave_levels(1), Err(ParseError::RecursionMismatch));
    }

    #[test]
    fn test_implicit_variables_in_scope() {
        let mut ctx = TokenizerContext::default();
        assert!(ctx.is_parameter("$it"));
        assert!(ctx.is_parameter("$this"));
        assert!(matches!(
            ctx.declare_parameter("$it"),
            Err(ParseError::DuplicateRangeVariable { .. })
        ));
    }

    #[test]
    fn test_declare_and_remove() {
        let mut ctx = TokenizerContext::default();
        ctx.declare_parameter("d").unwrap();
        assert!(ctx.is_parameter("d"));
        ctx.remove_parameter("d");
        ctx.declare_parameter("d").unwrap();
    }
}
