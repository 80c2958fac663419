use serde::Serialize;

use crate::ast::{ComputeToken, QueryToken};

/// Aggregation applied by an `aggregate(...)` expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AggregationMethod {
    Sum,
    Min,
    Max,
    Average,
    CountDistinct,
    /// `$count as Alias`
    VirtualPropertyCount,
    /// Namespace-qualified custom aggregation
    Custom(String),
}

impl AggregationMethod {
    pub fn from_name(name: &str) -> Self {
        match name {
            "sum" => AggregationMethod::Sum,
            "min" => AggregationMethod::Min,
            "max" => AggregationMethod::Max,
            "average" => AggregationMethod::Average,
            "countdistinct" => AggregationMethod::CountDistinct,
            other => AggregationMethod::Custom(other.to_string()),
        }
    }
}

/// `expression with method as alias`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateExpressionToken {
    pub expression: QueryToken,
    pub method: AggregationMethod,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateToken {
    pub expressions: Vec<AggregateExpressionToken>,
}

/// `groupby((paths), child transformations)`
///
/// # Example
/// ```text
/// groupby((Category/Name),aggregate(Amount with sum as Total))
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupByToken {
    pub properties: Vec<QueryToken>,
    pub child: Vec<ApplyTransformToken>,
}

/// One transformation of an `$apply` sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "transformation")]
pub enum ApplyTransformToken {
    Aggregate(AggregateToken),
    GroupBy(GroupByToken),
    Filter { expression: QueryToken },
    Compute(ComputeToken),
}

/// Slash-separated `$apply` transformations, applied in order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyToken {
    pub transform_tokens: Vec<ApplyTransformToken>,
}
