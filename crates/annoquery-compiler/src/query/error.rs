/// Invalid builder state, detected before compilation starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("order by `{column}` does not name a returned column")]
    OrderByUnknownColumn { column: String },

    #[error("group by requires at least one aggregate")]
    GroupByWithoutAggregate,

    #[error("count cannot be combined with group by; use an aggregate instead")]
    GroupedCount,

    #[error("aggregate requires at least one aggregate function")]
    EmptyAggregate,

    #[error("mutation has no properties to set")]
    EmptyMutation,

    #[error("delete cannot be combined with property updates")]
    ConflictingMutation,

    #[error("property `{property}` cannot be written")]
    ReadOnlyProperty { property: String },

    #[error("property names must not be empty")]
    EmptyPropertyName,

    #[error("column `{column}` is returned more than once")]
    DuplicateColumn { column: String },
}
