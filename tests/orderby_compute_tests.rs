// tests/orderby_compute_tests.rs

use pretty_assertions::assert_eq;
use qopt::ast::{
    BinaryOperatorKind, ComputeItemToken, FunctionCallToken, OrderByDirection, OrderByToken,
    QueryToken, TokenKind,
};
use qopt::{ParseError, QueryOptionParser, TokenizerSettings};

fn path(identifier: &str) -> QueryToken {
    QueryToken::end_path(identifier, None)
}

fn case_insensitive() -> QueryOptionParser {
    QueryOptionParser::new(TokenizerSettings {
        case_insensitive: true,
        ..TokenizerSettings::default()
    })
}

// ============================================================================
// OrderBy
// ============================================================================

#[test]
fn test_orderby_chain() {
    let items = QueryOptionParser::default()
        .parse_orderby("Prop1,Prop2 asc,Prop3 desc")
        .unwrap();
    assert_eq!(
        items,
        vec![
            OrderByToken {
                expression: path("Prop1"),
                direction: OrderByDirection::Ascending,
            },
            OrderByToken {
                expression: path("Prop2"),
                direction: OrderByDirection::Ascending,
            },
            OrderByToken {
                expression: path("Prop3"),
                direction: OrderByDirection::Descending,
            },
        ]
    );
}

#[test]
fn test_orderby_expression_keys() {
    let items = QueryOptionParser::default()
        .parse_orderby("length(Name) desc,Price mul Quantity")
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0].expression,
        QueryToken::FunctionCall(FunctionCallToken {
            name: "length".to_string(),
            arguments: vec![path("Name")],
            source: None,
        })
    );
    assert_eq!(items[0].direction, OrderByDirection::Descending);
    assert_eq!(
        items[1].expression,
        QueryToken::binary(
            BinaryOperatorKind::Multiply,
            path("Price"),
            path("Quantity")
        )
    );
    assert_eq!(items[1].direction, OrderByDirection::Ascending);
}

#[test]
fn test_orderby_direction_case() {
    assert_eq!(
        QueryOptionParser::default()
            .parse_orderby("Name DESC")
            .unwrap_err(),
        ParseError::UnexpectedToken {
            token: "DESC".to_string(),
            position: 5
        }
    );
    let items = case_insensitive().parse_orderby("Name DESC").unwrap();
    assert_eq!(items[0].direction, OrderByDirection::Descending);
}

#[test]
fn test_orderby_errors() {
    let parser = QueryOptionParser::default();
    assert_eq!(
        parser.parse_orderby("Name asc desc").unwrap_err(),
        ParseError::UnexpectedToken {
            token: "desc".to_string(),
            position: 9
        }
    );
    assert_eq!(
        parser.parse_orderby("Name,").unwrap_err(),
        ParseError::ExpressionExpected { position: 5 }
    );
    assert_eq!(
        parser.parse_orderby("").unwrap_err(),
        ParseError::ExpressionExpected { position: 0 }
    );
}

// ============================================================================
// Compute
// ============================================================================

#[test]
fn test_compute_items() {
    let compute = QueryOptionParser::default()
        .parse_compute("Prop1 mul Prop2 as Product,Prop1 div Prop2 as Ratio")
        .unwrap();
    assert_eq!(
        compute.items,
        vec![
            ComputeItemToken {
                expression: QueryToken::binary(
                    BinaryOperatorKind::Multiply,
                    path("Prop1"),
                    path("Prop2")
                ),
                alias: "Product".to_string(),
            },
            ComputeItemToken {
                expression: QueryToken::binary(
                    BinaryOperatorKind::Divide,
                    path("Prop1"),
                    path("Prop2")
                ),
                alias: "Ratio".to_string(),
            },
        ]
    );
}

#[test]
fn test_compute_literal_expression() {
    let compute = QueryOptionParser::default()
        .parse_compute("Price mul 0.9 as Discounted")
        .unwrap();
    assert_eq!(
        compute.items[0].expression,
        QueryToken::binary(
            BinaryOperatorKind::Multiply,
            path("Price"),
            QueryToken::literal(TokenKind::SingleLiteral, "0.9")
        )
    );
}

#[test]
fn test_compute_missing_as() {
    assert_eq!(
        QueryOptionParser::default()
            .parse_compute("Price mul Qty")
            .unwrap_err(),
        ParseError::KeywordExpected {
            keyword: "as".to_string(),
            position: 13
        }
    );
}

#[test]
fn test_compute_as_case() {
    assert!(matches!(
        QueryOptionParser::default()
            .parse_compute("Price AS Total")
            .unwrap_err(),
        ParseError::KeywordExpected { position: 6, .. }
    ));
    let compute = case_insensitive().parse_compute("Price AS Total").unwrap();
    assert_eq!(compute.items[0].alias, "Total");
}

#[test]
fn test_compute_missing_alias() {
    assert!(matches!(
        QueryOptionParser::default()
            .parse_compute("Price as 5")
            .unwrap_err(),
        ParseError::ExpectedToken { position: 9, .. }
    ));
}

#[test]
fn test_compute_trailing_tokens() {
    assert_eq!(
        QueryOptionParser::default()
            .parse_compute("Price as Total Extra")
            .unwrap_err(),
        ParseError::UnexpectedToken {
            token: "Extra".to_string(),
            position: 15
        }
    );
}
