//! Recursive-descent tokenizers for the individual query options.
//!
//! Each option has a free `tokenize_*` function taking the option text and a
//! [`TokenizerContext`]. [`QueryOptionParser`] wraps them behind a reusable,
//! immutable front end that creates a fresh context per call.
//!
//! The boolean layers (`or`, `and`, `not`, parentheses) are shared by the
//! filter and search grammars through [`ExpressionGrammar`]; each grammar
//! supplies its own operands and keyword matching.

mod apply;
mod compute;
mod filter;
mod orderby;
mod search;
mod select_expand;

pub use apply::tokenize_apply;
pub use compute::tokenize_compute;
pub use filter::{ExpressionParser, tokenize_filter};
pub use orderby::tokenize_orderby;
pub use search::{SearchParser, tokenize_search};
pub use select_expand::{tokenize_expand, tokenize_select};

use serde::Serialize;

use crate::ast::{
    ApplyToken, BinaryOperatorKind, ComputeToken, ExpandToken, OrderByToken, QueryToken,
    SelectToken, TokenKind, UnaryOperatorKind,
};
use crate::context::{TokenizerContext, TokenizerSettings};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Lexer;

/// Boolean expression layers shared by the filter and search grammars.
///
/// ```text
/// expression := or
/// or         := and ("or" and)*
/// and        := operand ("and" operand)*
/// operand    := unary            (filter: comparison)
/// unary      := "not" unary | primary
/// ```
///
/// Every level runs inside [`ExpressionGrammar::recurse`], so nesting is
/// bounded by the context's `max_depth`. Operator chains are folded in loops
/// and charge one level per [`link`](ExpressionGrammar::link), which bounds
/// the depth of the left-deep trees they build as well.
pub trait ExpressionGrammar<'a> {
    fn lexer(&mut self) -> &mut Lexer<'a>;

    fn context(&mut self) -> &mut TokenizerContext;

    /// Operand of a binary operator
    fn parse_primary(&mut self) -> ParseResult<QueryToken>;

    /// Whether the current token spells `keyword` in this grammar
    fn at_keyword(&mut self, keyword: &str) -> bool {
        let case_insensitive = self.context().case_insensitive();
        self.lexer()
            .current_token()
            .is_keyword(keyword, case_insensitive)
    }

    /// Run `parse` one recursion level deeper.
    ///
    /// The level is always left again; an error from `parse` wins over an
    /// accounting mismatch.
    fn recurse<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T>
    where
        Self: Sized,
    {
        self.context().enter_recurse()?;
        let result = parse(self);
        let left = self.context().leave_recurse();
        let value = result?;
        left?;
        Ok(value)
    }

    /// Run `parse` one recursion level deeper with a counter for chain links.
    ///
    /// Levels taken by [`link`](Self::link) are held until `parse` returns.
    fn recurse_chain<T>(
        &mut self,
        parse: impl FnOnce(&mut Self, &mut usize) -> ParseResult<T>,
    ) -> ParseResult<T>
    where
        Self: Sized,
    {
        self.context().enter_recurse()?;
        let mut links = 0;
        let result = parse(self, &mut links);
        let left = self.context().leave_levels(links + 1);
        let value = result?;
        left?;
        Ok(value)
    }

    /// Take one level for the next operator of a chain
    fn link(&mut self, links: &mut usize) -> ParseResult<()>
    where
        Self: Sized,
    {
        self.context().enter_recurse()?;
        *links += 1;
        Ok(())
    }

    fn parse_expression(&mut self) -> ParseResult<QueryToken>
    where
        Self: Sized,
    {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> ParseResult<QueryToken>
    where
        Self: Sized,
    {
        self.recurse_chain(|parser, links| {
            let mut left = parser.parse_logical_and()?;
            while parser.at_keyword("or") {
                parser.link(links)?;
                parser.lexer().next_token()?;
                let right = parser.parse_logical_and()?;
                left = QueryToken::binary(BinaryOperatorKind::Or, left, right);
            }
            Ok(left)
        })
    }

    fn parse_logical_and(&mut self) -> ParseResult<QueryToken>
    where
        Self: Sized,
    {
        self.recurse_chain(|parser, links| {
            let mut left = parser.parse_and_operand()?;
            while parser.at_keyword("and") {
                parser.link(links)?;
                parser.lexer().next_token()?;
                let right = parser.parse_and_operand()?;
                left = QueryToken::binary(BinaryOperatorKind::And, left, right);
            }
            Ok(left)
        })
    }

    fn parse_and_operand(&mut self) -> ParseResult<QueryToken>
    where
        Self: Sized,
    {
        self.parse_unary()
    }

    fn parse_unary(&mut self) -> ParseResult<QueryToken>
    where
        Self: Sized,
    {
        self.recurse_chain(|parser, links| {
            let mut prefixes = Vec::new();
            while parser.at_keyword("not") {
                parser.link(links)?;
                parser.lexer().next_token()?;
                prefixes.push(UnaryOperatorKind::Not);
            }
            let operand = parser.parse_primary()?;
            Ok(apply_prefixes(prefixes, operand))
        })
    }

    /// Parse one expression and require the input to end after it.
    fn parse_to_end(&mut self) -> ParseResult<QueryToken>
    where
        Self: Sized,
    {
        let expression = self.parse_expression()?;
        expect_end(self.lexer())?;
        Ok(expression)
    }
}

/// Wrap `operand` in prefix operators given in source order.
pub(crate) fn apply_prefixes(prefixes: Vec<UnaryOperatorKind>, operand: QueryToken) -> QueryToken {
    prefixes
        .into_iter()
        .rev()
        .fold(operand, |operand, kind| QueryToken::unary(kind, operand))
}

/// Fail with [`ParseError::UnexpectedToken`] unless the lexer is at the end.
pub(crate) fn expect_end(lexer: &Lexer<'_>) -> ParseResult<()> {
    let token = lexer.current_token();
    if token.kind != TokenKind::End {
        return Err(ParseError::UnexpectedToken {
            token: token.text.to_string(),
            position: token.position,
        });
    }
    Ok(())
}

/// System query options with a tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOptionKind {
    Filter,
    Search,
    OrderBy,
    Compute,
    Select,
    Expand,
    Apply,
}

impl QueryOptionKind {
    pub const ALL: [QueryOptionKind; 7] = [
        QueryOptionKind::Filter,
        QueryOptionKind::Search,
        QueryOptionKind::OrderBy,
        QueryOptionKind::Compute,
        QueryOptionKind::Select,
        QueryOptionKind::Expand,
        QueryOptionKind::Apply,
    ];

    /// Option name as written in a URL
    pub fn name(self) -> &'static str {
        match self {
            QueryOptionKind::Filter => "$filter",
            QueryOptionKind::Search => "$search",
            QueryOptionKind::OrderBy => "$orderby",
            QueryOptionKind::Compute => "$compute",
            QueryOptionKind::Select => "$select",
            QueryOptionKind::Expand => "$expand",
            QueryOptionKind::Apply => "$apply",
        }
    }

    /// Look up an option by name, with or without the `$`, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name.strip_prefix('$').unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|kind| kind.name()[1..].eq_ignore_ascii_case(bare))
    }
}

/// Tokenized form of any query option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "option", content = "tokens")]
pub enum ParsedQueryOption {
    Filter(QueryToken),
    Search(QueryToken),
    OrderBy(Vec<OrderByToken>),
    Compute(ComputeToken),
    Select(SelectToken),
    Expand(ExpandToken),
    Apply(ApplyToken),
}

/// Reusable front end over the option tokenizers.
///
/// Holds only settings. Every call builds its own [`TokenizerContext`], so a
/// parser can be shared freely between callers.
///
/// ```
/// use qopt::{QueryOptionParser, TokenizerSettings};
///
/// let parser = QueryOptionParser::new(TokenizerSettings::default());
/// let order = parser.parse_orderby("Name desc,Id").unwrap();
/// assert_eq!(order.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryOptionParser {
    settings: TokenizerSettings,
}

impl QueryOptionParser {
    pub fn new(settings: TokenizerSettings) -> Self {
        QueryOptionParser { settings }
    }

    pub fn settings(&self) -> &TokenizerSettings {
        &self.settings
    }

    fn context(&self) -> TokenizerContext {
        TokenizerContext::new(self.settings.clone())
    }

    pub fn parse_filter(&self, text: &str) -> ParseResult<QueryToken> {
        tokenize_filter(text, &mut self.context())
    }

    pub fn parse_search(&self, text: &str) -> ParseResult<QueryToken> {
        tokenize_search(text, &mut self.context())
    }

    pub fn parse_orderby(&self, text: &str) -> ParseResult<Vec<OrderByToken>> {
        tokenize_orderby(text, &mut self.context())
    }

    pub fn parse_compute(&self, text: &str) -> ParseResult<ComputeToken> {
        tokenize_compute(text, &mut self.context())
    }

    pub fn parse_select(&self, text: &str) -> ParseResult<SelectToken> {
        tokenize_select(text, &mut self.context())
    }

    pub fn parse_expand(&self, text: &str) -> ParseResult<ExpandToken> {
        tokenize_expand(text, &mut self.context())
    }

    pub fn parse_apply(&self, text: &str) -> ParseResult<ApplyToken> {
        tokenize_apply(text, &mut self.context())
    }

    /// Tokenize `text` as the option `kind`
    pub fn parse(&self, kind: QueryOptionKind, text: &str) -> ParseResult<ParsedQueryOption> {
        let parsed = match kind {
            QueryOptionKind::Filter => ParsedQueryOption::Filter(self.parse_filter(text)?),
            QueryOptionKind::Search => ParsedQueryOption::Search(self.parse_search(text)?),
            QueryOptionKind::OrderBy => ParsedQueryOption::OrderBy(self.parse_orderby(text)?),
            QueryOptionKind::Compute => ParsedQueryOption::Compute(self.parse_compute(text)?),
            QueryOptionKind::Select => ParsedQueryOption::Select(self.parse_select(text)?),
            QueryOptionKind::Expand => ParsedQueryOption::Expand(self.parse_expand(text)?),
            QueryOptionKind::Apply => ParsedQueryOption::Apply(self.parse_apply(text)?),
        };
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_kind_names() {
        assert_eq!(QueryOptionKind::from_name("$filter"), Some(QueryOptionKind::Filter));
        assert_eq!(QueryOptionKind::from_name("OrderBy"), Some(QueryOptionKind::OrderBy));
        assert_eq!(QueryOptionKind::from_name("$top"), None);
        for kind in QueryOptionKind::ALL {
            assert_eq!(QueryOptionKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_parser_is_reusable() {
        let parser = QueryOptionParser::default();
        assert!(parser.parse_filter("a eq").is_err());
        assert!(parser.parse_filter("a eq 1").is_ok());
    }

    #[test]
    fn test_parse_dispatch() {
        let parser = QueryOptionParser::default();
        let parsed = parser.parse(QueryOptionKind::Search, "blue").unwrap();
        assert_eq!(parsed, ParsedQueryOption::Search(QueryToken::string_literal("blue")));
    }
}
