//! JSON query descriptions.
//!
//! Annotations are written as dotted paths from the searched-for level:
//! `phone.following`, `phone.word`, `phone.speaker`. Any segment may carry
//! `:subset` (type subset) and `+subset` (token subset) qualifiers, as in
//! `phone:vowel.word+content`. Attribute paths add a final property segment:
//! `phone.word.label`.

use annoquery_compiler::{Aggregate, AggregateFunction, GraphQuery, Statement};
use annoquery_core::{
    AlignmentKind, AnnotationType, AttributePath, ClauseElement, CompareOp, Hierarchy, Operand,
    PropertyMap, Value,
};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum QueryFileError {
    #[error("invalid query description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty segment in `{0}`")]
    EmptySegment(String),
    #[error("`{0}` names no property")]
    MissingProperty(String),
    #[error("aggregate `{0}` needs a path")]
    MissingAggregatePath(&'static str),
    #[error("a count cannot be combined with updates or deletion")]
    CountWithMutation,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryFile {
    #[serde(default)]
    pub corpus: Option<String>,
    pub hierarchy: Vec<String>,
    pub find: String,
    #[serde(default)]
    pub discourses: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub order_by: Vec<OrderSpec>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregate: Vec<AggregateSpec>,
    #[serde(default)]
    pub set_type: PropertyMap,
    #[serde(default)]
    pub set_token: PropertyMap,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub count: bool,
}

/// One criterion. Variants are tried in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    /// `{"path": "phone.begin", "op": "eq", "other": "phone.word.begin"}`
    Paths {
        path: String,
        op: CompareOp,
        other: String,
    },
    /// `{"path": "phone.label", "op": "eq", "value": "S"}`
    Value {
        path: String,
        op: CompareOp,
        value: Value,
    },
    /// `{"contains": "phone.label", "value": "AA"}`
    Contains { contains: String, value: Value },
    /// `{"aligned": "left_aligned", "with": "phone.word"}`
    Aligned { aligned: AlignmentKind, with: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    Path(String),
    Named {
        path: String,
        #[serde(rename = "as")]
        name: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OrderSpec {
    Path(String),
    Directed {
        path: String,
        #[serde(default)]
        descending: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateSpec {
    pub function: AggregateFunction,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "as")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Rows,
    Count,
    Mutation,
}

/// A built query and the statement it asks for.
#[derive(Debug)]
pub struct Request {
    pub query: GraphQuery,
    pub kind: StatementKind,
}

impl Request {
    /// Parse `text` and build the query. `count` forces a count statement.
    pub fn from_json(text: &str, count: bool) -> Result<Self, QueryFileError> {
        let file: QueryFile = serde_json::from_str(text)?;
        file.into_request(count)
    }

    pub fn statement(&self) -> annoquery_compiler::Result<Statement> {
        match self.kind {
            StatementKind::Rows => self.query.statement(),
            StatementKind::Count => self.query.count_statement(),
            StatementKind::Mutation => self.query.mutation_statement(),
        }
    }
}

impl QueryFile {
    pub fn into_request(self, count: bool) -> Result<Request, QueryFileError> {
        let mutates = self.delete || !self.set_type.is_empty() || !self.set_token.is_empty();
        let kind = match (mutates, count || self.count) {
            (true, true) => return Err(QueryFileError::CountWithMutation),
            (true, false) => StatementKind::Mutation,
            (false, true) => StatementKind::Count,
            (false, false) => StatementKind::Rows,
        };

        let to_find = parse_annotation(&self.find)?;
        let mut query = GraphQuery::new(Hierarchy::new(self.hierarchy), to_find);
        if let Some(corpus) = self.corpus {
            query = query.corpus(corpus);
        }
        if !self.discourses.is_empty() {
            query = query.discourses(self.discourses);
        }
        for filter in self.filters {
            query = filter.apply(query)?;
        }

        let mut columns = Vec::with_capacity(self.columns.len());
        for column in self.columns {
            columns.push(match column {
                ColumnSpec::Path(path) => parse_path(&path)?,
                ColumnSpec::Named { path, name } => parse_path(&path)?.column_name(name),
            });
        }
        query = query.columns(columns);

        for field in self.group_by {
            query = query.group_by(parse_path(&field)?);
        }
        for order in self.order_by {
            let (path, descending) = match order {
                OrderSpec::Path(path) => (path, false),
                OrderSpec::Directed { path, descending } => (path, descending),
            };
            query = query.order_by(parse_path(&path)?, descending);
        }

        let aggregates = self
            .aggregate
            .into_iter()
            .map(AggregateSpec::build)
            .collect::<Result<Vec<_>, _>>()?;
        if !aggregates.is_empty() {
            query = query.with_aggregates(aggregates);
        }

        if !self.set_type.is_empty() {
            query = query.with_type_update(self.set_type);
        }
        if !self.set_token.is_empty() {
            query = query.with_token_update(self.set_token);
        }
        if self.delete {
            query = query.with_delete();
        }

        tracing::debug!(kind = ?kind, criteria = query.criteria().len(), "built query");
        Ok(Request { query, kind })
    }
}

impl FilterSpec {
    fn apply(self, query: GraphQuery) -> Result<GraphQuery, QueryFileError> {
        let query = match self {
            FilterSpec::Paths { path, op, other } => {
                let criterion = parse_path(&path)?.compare_path(op, &parse_path(&other)?);
                query.filter(criterion)
            }
            FilterSpec::Value { path, op, value } => query.filter(ClauseElement::Comparison {
                path: parse_path(&path)?,
                op,
                operand: Operand::Value(value),
            }),
            FilterSpec::Contains { contains, value } => {
                query.filter_contains(parse_path(&contains)?, value)
            }
            FilterSpec::Aligned { aligned, with } => {
                let other = parse_annotation(&with)?;
                match aligned {
                    AlignmentKind::LeftAligned => query.filter_left_aligned(other),
                    AlignmentKind::RightAligned => query.filter_right_aligned(other),
                    AlignmentKind::NotLeftAligned => query.filter_not_left_aligned(other),
                    AlignmentKind::NotRightAligned => query.filter_not_right_aligned(other),
                }
            }
        };
        Ok(query)
    }
}

impl AggregateSpec {
    fn build(self) -> Result<Aggregate, QueryFileError> {
        let aggregate = match (self.function, self.path) {
            (AggregateFunction::Count, None) => Aggregate::count(),
            (function, None) => {
                return Err(QueryFileError::MissingAggregatePath(
                    function.output_prefix(),
                ));
            }
            (function, Some(path)) => {
                let path = parse_path(&path)?;
                match function {
                    AggregateFunction::Count => Aggregate::count_of(path),
                    AggregateFunction::Average => Aggregate::average(path),
                    AggregateFunction::Min => Aggregate::min(path),
                    AggregateFunction::Max => Aggregate::max(path),
                    AggregateFunction::Sum => Aggregate::sum(path),
                    AggregateFunction::Stdev => Aggregate::stdev(path),
                }
            }
        };
        Ok(match self.name {
            Some(name) => aggregate.column_name(name),
            None => aggregate,
        })
    }
}

/// `phone.word.label` -> the `label` of the word containing each phone.
pub fn parse_path(source: &str) -> Result<AttributePath, QueryFileError> {
    let (annotation, property) = source
        .rsplit_once('.')
        .ok_or_else(|| QueryFileError::MissingProperty(source.to_string()))?;
    if property.is_empty() {
        return Err(QueryFileError::EmptySegment(source.to_string()));
    }
    Ok(parse_annotation(annotation)?.attribute(property))
}

pub fn parse_annotation(source: &str) -> Result<AnnotationType, QueryFileError> {
    let mut annotation: Option<AnnotationType> = None;
    for segment in source.split('.') {
        let split = segment.find([':', '+']).unwrap_or(segment.len());
        let (name, qualifiers) = segment.split_at(split);
        if name.is_empty() {
            return Err(QueryFileError::EmptySegment(source.to_string()));
        }
        let next = match annotation {
            None => AnnotationType::new(name),
            Some(current) => match name {
                "following" => current.following(),
                "previous" => current.previous(),
                "speaker" => current.speaker(),
                level => current.up(level),
            },
        };
        annotation = Some(qualify(next, qualifiers, source)?);
    }
    annotation.ok_or_else(|| QueryFileError::EmptySegment(source.to_string()))
}

/// Apply `:type` and `+token` subset qualifiers.
fn qualify(
    mut annotation: AnnotationType,
    qualifiers: &str,
    source: &str,
) -> Result<AnnotationType, QueryFileError> {
    let mut rest = qualifiers;
    while let Some(marker) = rest.chars().next() {
        let body = &rest[marker.len_utf8()..];
        let end = body.find([':', '+']).unwrap_or(body.len());
        let subset = &body[..end];
        if subset.is_empty() {
            return Err(QueryFileError::EmptySegment(source.to_string()));
        }
        annotation = if marker == ':' {
            annotation.with_type_subset(subset)
        } else {
            annotation.with_token_subset(subset)
        };
        rest = &body[end..];
    }
    Ok(annotation)
}
