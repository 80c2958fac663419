use crate::ast::{
    AggregateExpressionToken, AggregateToken, AggregationMethod, ApplyToken, ApplyTransformToken,
    ComputeToken, EndPathToken, GroupByToken, QueryToken, TokenKind,
};
use crate::context::TokenizerContext;
use crate::error::{ParseError, ParseResult};
use crate::parser::{ExpressionGrammar, ExpressionParser};

/// Tokenize an `$apply` sequence.
///
/// ```text
/// apply     := transform ("/" transform)*
/// transform := "aggregate(" aggregate ("," aggregate)* ")"
///            | "groupby((" path ("," path)* ")" ["," apply] ")"
///            | "filter(" expression ")"
///            | "compute(" expression "as" alias ("," ...)* ")"
/// aggregate := expression "with" method "as" alias | "$count as" alias
/// ```
pub fn tokenize_apply(text: &str, context: &mut TokenizerContext) -> ParseResult<ApplyToken> {
    log::debug!("tokenizing $apply '{}'", text);
    let mut parser = ExpressionParser::new(text, 0, context)?;
    let transform_tokens = parse_transformations(&mut parser)?;
    parser.expect_end()?;
    Ok(ApplyToken { transform_tokens })
}

fn parse_transformations(
    parser: &mut ExpressionParser<'_, '_>,
) -> ParseResult<Vec<ApplyTransformToken>> {
    let mut transforms = vec![parse_transformation(parser)?];
    while parser.current().kind == TokenKind::Slash {
        parser.advance()?;
        transforms.push(parse_transformation(parser)?);
    }
    Ok(transforms)
}

fn parse_transformation(
    parser: &mut ExpressionParser<'_, '_>,
) -> ParseResult<ApplyTransformToken> {
    parser.recurse(|parser| {
        let token = parser.current();
        if token.kind != TokenKind::Identifier {
            return Err(ParseError::ExpectedToken {
                expected: "transformation".to_string(),
                found: token.describe(),
                position: token.position,
            });
        }
        let transform = if parser.at_keyword("aggregate") {
            open(parser)?;
            ApplyTransformToken::Aggregate(parse_aggregate(parser)?)
        } else if parser.at_keyword("groupby") {
            open(parser)?;
            ApplyTransformToken::GroupBy(parse_group_by(parser)?)
        } else if parser.at_keyword("filter") {
            open(parser)?;
            ApplyTransformToken::Filter {
                expression: parser.parse_expression()?,
            }
        } else if parser.at_keyword("compute") {
            open(parser)?;
            ApplyTransformToken::Compute(ComputeToken {
                items: parser.parse_compute_items()?,
            })
        } else {
            return Err(ParseError::UnsupportedTransformation {
                name: token.text.to_string(),
                position: token.position,
            });
        };
        parser.expect(TokenKind::CloseParen, "')'")?;
        log::trace!("parsed transformation '{}'", token.text);
        Ok(transform)
    })
}

/// Step past the transformation name and its `(`
fn open(parser: &mut ExpressionParser<'_, '_>) -> ParseResult<()> {
    parser.advance()?;
    parser.expect(TokenKind::OpenParen, "'('")
}

fn parse_aggregate(parser: &mut ExpressionParser<'_, '_>) -> ParseResult<AggregateToken> {
    let mut expressions = vec![parse_aggregate_expression(parser)?];
    while parser.current().kind == TokenKind::Comma {
        parser.advance()?;
        expressions.push(parse_aggregate_expression(parser)?);
    }
    Ok(AggregateToken { expressions })
}

fn parse_aggregate_expression(
    parser: &mut ExpressionParser<'_, '_>,
) -> ParseResult<AggregateExpressionToken> {
    let expression = parser.parse_expression()?;
    let method = if parser.at_keyword("with") {
        parser.advance()?;
        AggregationMethod::from_name(&parser.read_dotted_identifier()?)
    } else if is_virtual_count(&expression) {
        AggregationMethod::VirtualPropertyCount
    } else {
        return Err(ParseError::KeywordExpected {
            keyword: "with".to_string(),
            position: parser.current().position,
        });
    };
    parser.expect_keyword("as")?;
    let alias = parser.parse_alias()?;
    Ok(AggregateExpressionToken {
        expression,
        method,
        alias,
    })
}

fn is_virtual_count(expression: &QueryToken) -> bool {
    matches!(
        expression,
        QueryToken::EndPath(EndPathToken { identifier, parent: None }) if identifier == "$count"
    )
}

fn parse_group_by(parser: &mut ExpressionParser<'_, '_>) -> ParseResult<GroupByToken> {
    parser.expect(TokenKind::OpenParen, "'('")?;
    let mut properties = vec![parse_grouping_property(parser)?];
    while parser.current().kind == TokenKind::Comma {
        parser.advance()?;
        properties.push(parse_grouping_property(parser)?);
    }
    parser.expect(TokenKind::CloseParen, "')'")?;

    let child = if parser.current().kind == TokenKind::Comma {
        parser.advance()?;
        parse_transformations(parser)?
    } else {
        Vec::new()
    };
    Ok(GroupByToken { properties, child })
}

fn parse_grouping_property(parser: &mut ExpressionParser<'_, '_>) -> ParseResult<QueryToken> {
    if parser.current().kind != TokenKind::Identifier {
        let token = parser.current();
        return Err(ParseError::ExpectedToken {
            expected: "grouping property".to_string(),
            found: token.describe(),
            position: token.position,
        });
    }
    parser.parse_member_path()
}
