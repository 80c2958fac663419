// tests/apply_tests.rs

use pretty_assertions::assert_eq;
use qopt::ast::{
    AggregateExpressionToken, AggregateToken, AggregationMethod, ApplyTransformToken,
    BinaryOperatorKind, GroupByToken, QueryToken, TokenKind,
};
use qopt::{ParseError, QueryOptionParser};

fn apply(text: &str) -> Vec<ApplyTransformToken> {
    QueryOptionParser::default()
        .parse_apply(text)
        .unwrap()
        .transform_tokens
}

fn apply_error(text: &str) -> ParseError {
    QueryOptionParser::default().parse_apply(text).unwrap_err()
}

fn path(identifier: &str) -> QueryToken {
    QueryToken::end_path(identifier, None)
}

fn aggregate(expression: QueryToken, method: AggregationMethod, alias: &str) -> AggregateExpressionToken {
    AggregateExpressionToken {
        expression,
        method,
        alias: alias.to_string(),
    }
}

// ============================================================================
// Aggregate
// ============================================================================

#[test]
fn test_aggregate_with_method() {
    assert_eq!(
        apply("aggregate(Amount with sum as Total,Price with max as Top)"),
        vec![ApplyTransformToken::Aggregate(AggregateToken {
            expressions: vec![
                aggregate(path("Amount"), AggregationMethod::Sum, "Total"),
                aggregate(path("Price"), AggregationMethod::Max, "Top"),
            ],
        })]
    );
}

#[test]
fn test_aggregate_count() {
    assert_eq!(
        apply("aggregate($count as Count)"),
        vec![ApplyTransformToken::Aggregate(AggregateToken {
            expressions: vec![aggregate(
                path("$count"),
                AggregationMethod::VirtualPropertyCount,
                "Count"
            )],
        })]
    );
}

#[test]
fn test_aggregate_custom_method() {
    let transforms = apply("aggregate(Amount mul 2 with NS.Median as Mid)");
    let ApplyTransformToken::Aggregate(AggregateToken { expressions }) = &transforms[0] else {
        panic!("Expected aggregate");
    };
    assert_eq!(
        expressions[0].method,
        AggregationMethod::Custom("NS.Median".to_string())
    );
    assert_eq!(
        expressions[0].expression,
        QueryToken::binary(
            BinaryOperatorKind::Multiply,
            path("Amount"),
            QueryToken::literal(TokenKind::IntegerLiteral, "2")
        )
    );
}

#[test]
fn test_aggregate_missing_with() {
    assert_eq!(
        apply_error("aggregate(Amount as Total)"),
        ParseError::KeywordExpected {
            keyword: "with".to_string(),
            position: 17
        }
    );
}

// ============================================================================
// GroupBy, Filter and Compute
// ============================================================================

#[test]
fn test_groupby_with_aggregate() {
    let region = QueryToken::end_path("Region", None).into_inner_path();
    assert_eq!(
        apply("groupby((Category,Region/Name),aggregate(Amount with average as Mean))"),
        vec![ApplyTransformToken::GroupBy(GroupByToken {
            properties: vec![path("Category"), QueryToken::end_path("Name", Some(region))],
            child: vec![ApplyTransformToken::Aggregate(AggregateToken {
                expressions: vec![aggregate(
                    path("Amount"),
                    AggregationMethod::Average,
                    "Mean"
                )],
            })],
        })]
    );
}

#[test]
fn test_groupby_without_child() {
    assert_eq!(
        apply("groupby((Category))"),
        vec![ApplyTransformToken::GroupBy(GroupByToken {
            properties: vec![path("Category")],
            child: vec![],
        })]
    );
}

#[test]
fn test_transformation_sequence() {
    let transforms = apply("filter(Amount gt 100)/compute(Amount mul 2 as Double)/groupby((Category))");
    assert_eq!(transforms.len(), 3);
    assert_eq!(
        transforms[0],
        ApplyTransformToken::Filter {
            expression: QueryToken::binary(
                BinaryOperatorKind::GreaterThan,
                path("Amount"),
                QueryToken::literal(TokenKind::IntegerLiteral, "100")
            ),
        }
    );
    let ApplyTransformToken::Compute(compute) = &transforms[1] else {
        panic!("Expected compute");
    };
    assert_eq!(compute.items[0].alias, "Double");
    assert!(matches!(transforms[2], ApplyTransformToken::GroupBy(_)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unsupported_transformation() {
    assert_eq!(
        apply_error("filter(A eq 1)/topcount(5,Amount)"),
        ParseError::UnsupportedTransformation {
            name: "topcount".to_string(),
            position: 15
        }
    );
}

#[test]
fn test_groupby_needs_property_list() {
    assert_eq!(
        apply_error("groupby(Category)"),
        ParseError::ExpectedToken {
            expected: "'('".to_string(),
            found: "Category".to_string(),
            position: 8
        }
    );
    assert!(matches!(
        apply_error("groupby((1))"),
        ParseError::ExpectedToken { position: 9, .. }
    ));
}

#[test]
fn test_unclosed_transformation() {
    assert!(matches!(
        apply_error("filter(Amount gt 1"),
        ParseError::ExpectedToken { position: 18, .. }
    ));
    assert_eq!(
        apply_error("filter(A eq 1) extra"),
        ParseError::UnexpectedToken {
            token: "extra".to_string(),
            position: 15
        }
    );
}
