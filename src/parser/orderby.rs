use crate::ast::{OrderByDirection, OrderByToken, TokenKind};
use crate::context::TokenizerContext;
use crate::error::{ParseError, ParseResult};
use crate::parser::{ExpressionGrammar, ExpressionParser};

/// Tokenize an `$orderby` list.
///
/// Items come back in then-by order. A missing direction means ascending.
pub fn tokenize_orderby(
    text: &str,
    context: &mut TokenizerContext,
) -> ParseResult<Vec<OrderByToken>> {
    log::debug!("tokenizing $orderby '{}'", text);
    tokenize_orderby_at(text, 0, context)
}

pub(crate) fn tokenize_orderby_at(
    text: &str,
    base_offset: usize,
    context: &mut TokenizerContext,
) -> ParseResult<Vec<OrderByToken>> {
    let mut parser = ExpressionParser::new(text, base_offset, context)?;
    let mut items = Vec::new();
    loop {
        let expression = parser.parse_expression()?;
        let direction = if parser.at_keyword("asc") {
            parser.advance()?;
            OrderByDirection::Ascending
        } else if parser.at_keyword("desc") {
            parser.advance()?;
            OrderByDirection::Descending
        } else {
            OrderByDirection::default()
        };
        items.push(OrderByToken {
            expression,
            direction,
        });

        let token = parser.current();
        match token.kind {
            TokenKind::Comma => parser.advance()?,
            TokenKind::End => break,
            _ => {
                return Err(ParseError::UnexpectedToken {
                    token: token.text.to_string(),
                    position: token.position,
                });
            }
        }
    }
    Ok(items)
}
