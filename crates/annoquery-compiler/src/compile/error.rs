//! Errors raised while lowering a query into a statement.

/// Fatal to one compilation. A criterion is never silently dropped; anything
/// the compiler cannot express surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Two sources assert different discourse contexts.
    #[error("conflicting discourse scopes `{first}` and `{second}`")]
    ConflictingDiscourse { first: String, second: String },

    /// An annotation cannot be reached from the searched-for level.
    #[error("annotation `{annotation}` is not reachable from `{root}`")]
    UnreachableAnnotation { annotation: String, root: String },

    /// A hop-less reference to the searched-for level carries qualifiers
    /// that differ from the searched-for type.
    #[error("`{level}` is referenced with subsets that differ from the searched-for type")]
    AmbiguousLevel { level: String },

    /// Containment can only test stored properties.
    #[error("`{property}` cannot be tested through containment")]
    UnsupportedContainsProperty { property: String },
}
