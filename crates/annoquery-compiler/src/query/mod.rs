//! The `GraphQuery` accumulator.
//!
//! A query is created per request, refined through by-value builder calls,
//! and compiled by a terminal operation (see `exec`). Nothing is cached:
//! every terminal call recompiles from the current state.
//!
//! ```
//! use annoquery_compiler::GraphQuery;
//! use annoquery_core::{AnnotationType, Hierarchy};
//!
//! let phone = AnnotationType::new("phone");
//! let query = GraphQuery::new(Hierarchy::new(["phone", "word"]), phone.clone())
//!     .filter(phone.label().equals("S"))
//!     .columns([phone.following().label()]);
//! let statement = query.statement().unwrap();
//! assert_eq!(statement.columns(), ["id", "label", "following_label"]);
//! ```

mod aggregate;
mod error;
mod exec;
mod validate;

#[cfg(test)]
mod exec_tests;

pub use aggregate::{Aggregate, AggregateFunction};
pub use error::BuildError;
pub use exec::AggregateResult;

pub(crate) use validate::{find_returned, validate};

use annoquery_core::{
    AlignmentKind, AnnotationType, AttributePath, ClauseElement, Hierarchy, PropertyMap, Value,
};
use indexmap::IndexSet;

/// Recorded write intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mutation {
    pub type_properties: PropertyMap,
    pub token_properties: PropertyMap,
    pub delete: bool,
}

impl Mutation {
    pub fn is_empty(&self) -> bool {
        self.type_properties.is_empty() && self.token_properties.is_empty() && !self.delete
    }
}

#[derive(Debug, Clone)]
pub struct GraphQuery {
    hierarchy: Hierarchy,
    corpus: Option<String>,
    to_find: AnnotationType,
    criteria: Vec<ClauseElement>,
    criterion_keys: IndexSet<String>,
    columns: IndexSet<AttributePath>,
    order_by: Vec<(AttributePath, bool)>,
    group_by: Vec<AttributePath>,
    aggregates: Vec<Aggregate>,
    mutation: Mutation,
}

impl GraphQuery {
    /// Search for tokens of `to_find`, returning their `id` and `label` by
    /// default.
    pub fn new(hierarchy: Hierarchy, to_find: AnnotationType) -> Self {
        let columns = IndexSet::from([to_find.id(), to_find.label()]);
        Self {
            hierarchy,
            corpus: None,
            to_find,
            criteria: Vec::new(),
            criterion_keys: IndexSet::new(),
            columns,
            order_by: Vec::new(),
            group_by: Vec::new(),
            aggregates: Vec::new(),
            mutation: Mutation::default(),
        }
    }

    /// Restrict every token node to the corpus label.
    pub fn corpus(mut self, name: impl Into<String>) -> Self {
        self.corpus = Some(name.into());
        self
    }

    /// Add a criterion. Identical criteria are kept once.
    pub fn filter(mut self, criterion: ClauseElement) -> Self {
        if self.criterion_keys.insert(criterion.key()) {
            self.criteria.push(criterion);
        }
        self
    }

    /// Add a criterion on a containing level, such as `word.label == "cat"`
    /// when searching phones. Containers are rebased like any reference.
    pub fn filter_contained_by(self, criterion: ClauseElement) -> Self {
        self.filter(criterion)
    }

    /// Keep tokens containing a lower-level token whose `path` equals
    /// `value`.
    pub fn filter_contains(self, path: AttributePath, value: impl Into<Value>) -> Self {
        let criterion = ClauseElement::contains(self.to_find.clone(), path, value);
        self.filter(criterion)
    }

    fn filter_aligned(self, alignment: AlignmentKind, other: AnnotationType) -> Self {
        let criterion = ClauseElement::aligned(alignment, self.to_find.clone(), other);
        self.filter(criterion)
    }

    pub fn filter_left_aligned(self, other: AnnotationType) -> Self {
        self.filter_aligned(AlignmentKind::LeftAligned, other)
    }

    pub fn filter_right_aligned(self, other: AnnotationType) -> Self {
        self.filter_aligned(AlignmentKind::RightAligned, other)
    }

    pub fn filter_not_left_aligned(self, other: AnnotationType) -> Self {
        self.filter_aligned(AlignmentKind::NotLeftAligned, other)
    }

    pub fn filter_not_right_aligned(self, other: AnnotationType) -> Self {
        self.filter_aligned(AlignmentKind::NotRightAligned, other)
    }

    /// Append projected columns, skipping ones already present.
    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = AttributePath>,
    {
        self.columns.extend(columns);
        self
    }

    pub fn group_by(mut self, field: AttributePath) -> Self {
        self.group_by.push(field);
        self
    }

    /// Order by a returned column. `descending` applies to this field only.
    pub fn order_by(mut self, field: AttributePath, descending: bool) -> Self {
        self.order_by.push((field, descending));
        self
    }

    /// Restrict to the named discourses.
    pub fn discourses<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let path = self.to_find.discourse();
        let criterion = match names.as_slice() {
            [one] => path.equals(one.as_str()),
            _ => path.in_set(names),
        };
        self.filter(criterion)
    }

    /// Project `begin` and `end`.
    pub fn times(self) -> Self {
        let columns = [self.to_find.begin(), self.to_find.end()];
        self.columns(columns)
    }

    /// Project `begin` and `end` under the given names.
    pub fn times_as(self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        let columns = [
            self.to_find.begin().column_name(begin),
            self.to_find.end().column_name(end),
        ];
        self.columns(columns)
    }

    /// Project `duration`.
    pub fn duration(self) -> Self {
        let column = self.to_find.duration();
        self.columns([column])
    }

    /// Stage type-level property updates for `mutation_statement`.
    pub fn with_type_update<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        extend(&mut self.mutation.type_properties, properties);
        self
    }

    /// Stage token-level property updates for `mutation_statement`.
    pub fn with_token_update<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        extend(&mut self.mutation.token_properties, properties);
        self
    }

    /// Stage deletion of the matched tokens for `mutation_statement`.
    pub fn with_delete(mut self) -> Self {
        self.mutation.delete = true;
        self
    }

    /// Stage aggregates; reads then return aggregate rows.
    pub fn with_aggregates<I>(mut self, aggregates: I) -> Self
    where
        I: IntoIterator<Item = Aggregate>,
    {
        self.aggregates = aggregates.into_iter().collect();
        self
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn corpus_label(&self) -> Option<&str> {
        self.corpus.as_deref()
    }

    pub fn to_find(&self) -> &AnnotationType {
        &self.to_find
    }

    pub fn criteria(&self) -> &[ClauseElement] {
        &self.criteria
    }

    pub fn projected(&self) -> impl ExactSizeIterator<Item = &AttributePath> {
        self.columns.iter()
    }

    pub fn ordering(&self) -> &[(AttributePath, bool)] {
        &self.order_by
    }

    pub fn grouping(&self) -> &[AttributePath] {
        &self.group_by
    }

    pub fn aggregates(&self) -> &[Aggregate] {
        &self.aggregates
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }
}

fn extend<I, K, V>(map: &mut PropertyMap, properties: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    map.extend(
        properties
            .into_iter()
            .map(|(key, value)| (key.into(), value.into())),
    );
}
