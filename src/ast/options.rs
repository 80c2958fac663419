use serde::Serialize;

use crate::ast::QueryToken;

/// Sort direction of an `$orderby` term. Defaults to ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

/// One `$orderby` term.
///
/// `$orderby` produces these in then-by order: the first element is the
/// primary sort key.
///
/// # Example
/// ```text
/// Prop1,Prop2 asc,Prop3 desc
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByToken {
    pub expression: QueryToken,
    pub direction: OrderByDirection,
}

/// `expression as alias` inside `$compute` or `compute(...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeItemToken {
    pub expression: QueryToken,
    pub alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComputeToken {
    pub items: Vec<ComputeItemToken>,
}

/// Slash-separated select/expand path.
///
/// # Examples
/// ```text
/// Orders/Items        // ["Orders", "Items"]
/// NS.Special/Name     // ["NS.Special", "Name"]
/// */$ref              // ["*", "$ref"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentPath {
    pub segments: Vec<String>,
}

impl SegmentPath {
    pub fn new(segments: Vec<String>) -> Self {
        SegmentPath { segments }
    }
}

/// One `$select` item with its nested options.
///
/// # Example
/// ```text
/// Addresses($filter=City eq 'Oslo';$top=2)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectItemToken {
    pub path: SegmentPath,
    pub filter: Option<QueryToken>,
    pub order_by: Option<Vec<OrderByToken>>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: Option<bool>,
    pub search: Option<QueryToken>,
    pub select: Option<SelectToken>,
    pub compute: Option<ComputeToken>,
}

impl SelectItemToken {
    pub fn new(path: SegmentPath) -> Self {
        SelectItemToken {
            path,
            filter: None,
            order_by: None,
            top: None,
            skip: None,
            count: None,
            search: None,
            select: None,
            compute: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectToken {
    pub items: Vec<SelectItemToken>,
}

/// `$levels` value of an expand item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LevelsToken {
    Max,
    Count(u64),
}

/// One `$expand` item with its nested options.
///
/// # Example
/// ```text
/// Orders($expand=Items($select=Name);$levels=2)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandItemToken {
    pub path: SegmentPath,
    pub filter: Option<QueryToken>,
    pub order_by: Option<Vec<OrderByToken>>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: Option<bool>,
    pub search: Option<QueryToken>,
    pub select: Option<SelectToken>,
    pub compute: Option<ComputeToken>,
    pub expand: Option<ExpandToken>,
    pub levels: Option<LevelsToken>,
}

impl ExpandItemToken {
    pub fn new(path: SegmentPath) -> Self {
        ExpandItemToken {
            path,
            filter: None,
            order_by: None,
            top: None,
            skip: None,
            count: None,
            search: None,
            select: None,
            compute: None,
            expand: None,
            levels: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpandToken {
    pub items: Vec<ExpandItemToken>,
}
