use crate::ast::{BinaryOperatorKind, QueryToken, TokenKind};
use crate::context::TokenizerContext;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Dialect, Lexer};
use crate::parser::ExpressionGrammar;

/// Tokenize a `$search` expression.
///
/// Terms are bare words or `"phrases"`; adjacent terms are joined by an
/// implicit `AND`.
pub fn tokenize_search(text: &str, context: &mut TokenizerContext) -> ParseResult<QueryToken> {
    log::debug!("tokenizing $search '{}'", text);
    tokenize_search_at(text, 0, context)
}

pub(crate) fn tokenize_search_at(
    text: &str,
    base_offset: usize,
    context: &mut TokenizerContext,
) -> ParseResult<QueryToken> {
    SearchParser::new(text, base_offset, context)?.parse_to_end()
}

/// Parser for the search grammar.
///
/// ```text
/// or      := and ("OR" and)*
/// and     := unary (["AND"] unary)*
/// unary   := "NOT" unary | primary
/// primary := "(" or ")" | term | "phrase"
/// ```
///
/// Keywords are matched ignoring case regardless of the settings.
pub struct SearchParser<'a, 'c> {
    lexer: Lexer<'a>,
    context: &'c mut TokenizerContext,
}

impl<'a, 'c> SearchParser<'a, 'c> {
    pub fn new(
        text: &'a str,
        base_offset: usize,
        context: &'c mut TokenizerContext,
    ) -> ParseResult<Self> {
        let mut lexer = context.create_lexer(text, Dialect::Search, base_offset);
        lexer.next_token()?;
        Ok(SearchParser { lexer, context })
    }

    /// Whether the current token can start an implicitly and-ed operand
    fn starts_operand(&mut self) -> bool {
        matches!(
            self.lexer.current_token().kind,
            TokenKind::StringLiteral | TokenKind::OpenParen
        ) || self.at_keyword("not")
    }
}

impl<'a, 'c> ExpressionGrammar<'a> for SearchParser<'a, 'c> {
    fn lexer(&mut self) -> &mut Lexer<'a> {
        &mut self.lexer
    }

    fn context(&mut self) -> &mut TokenizerContext {
        self.context
    }

    fn at_keyword(&mut self, keyword: &str) -> bool {
        self.lexer.current_token().is_keyword(keyword, true)
    }

    fn parse_logical_and(&mut self) -> ParseResult<QueryToken> {
        self.recurse_chain(|parser, links| {
            let mut left = parser.parse_unary()?;
            loop {
                if parser.at_keyword("and") {
                    parser.lexer.next_token()?;
                } else if !parser.starts_operand() {
                    break;
                }
                parser.link(links)?;
                let right = parser.parse_unary()?;
                left = QueryToken::binary(BinaryOperatorKind::And, left, right);
            }
            Ok(left)
        })
    }

    fn parse_primary(&mut self) -> ParseResult<QueryToken> {
        self.recurse(|parser| {
            let token = parser.lexer.current_token();
            match token.kind {
                TokenKind::OpenParen => {
                    parser.lexer.next_token()?;
                    let expression = parser.parse_expression()?;
                    parser.lexer.expect(TokenKind::CloseParen, "')'")?;
                    Ok(expression)
                }
                TokenKind::StringLiteral => {
                    parser.lexer.next_token()?;
                    Ok(QueryToken::string_literal(unquote_phrase(token.text)))
                }
                _ => Err(ParseError::ExpressionExpected {
                    position: token.position,
                }),
            }
        })
    }
}

/// Strip phrase quotes and undo `\"` and `\\`; bare words pass through.
fn unquote_phrase(text: &str) -> String {
    let Some(inner) = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return text.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
