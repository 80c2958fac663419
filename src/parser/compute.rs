use crate::ast::{ComputeItemToken, ComputeToken, TokenKind};
use crate::context::TokenizerContext;
use crate::error::ParseResult;
use crate::parser::{ExpressionGrammar, ExpressionParser};

/// Tokenize a `$compute` list of `expression as alias` items.
pub fn tokenize_compute(text: &str, context: &mut TokenizerContext) -> ParseResult<ComputeToken> {
    log::debug!("tokenizing $compute '{}'", text);
    tokenize_compute_at(text, 0, context)
}

pub(crate) fn tokenize_compute_at(
    text: &str,
    base_offset: usize,
    context: &mut TokenizerContext,
) -> ParseResult<ComputeToken> {
    let mut parser = ExpressionParser::new(text, base_offset, context)?;
    let items = parser.parse_compute_items()?;
    parser.expect_end()?;
    Ok(ComputeToken { items })
}

impl<'a, 'c> ExpressionParser<'a, 'c> {
    /// Comma-separated compute items, shared with `compute(...)` in `$apply`
    pub(crate) fn parse_compute_items(&mut self) -> ParseResult<Vec<ComputeItemToken>> {
        let mut items = vec![self.parse_compute_item()?];
        while self.current().kind == TokenKind::Comma {
            self.advance()?;
            items.push(self.parse_compute_item()?);
        }
        Ok(items)
    }

    fn parse_compute_item(&mut self) -> ParseResult<ComputeItemToken> {
        let expression = self.parse_expression()?;
        self.expect_keyword("as")?;
        let alias = self.parse_alias()?;
        Ok(ComputeItemToken { expression, alias })
    }
}
