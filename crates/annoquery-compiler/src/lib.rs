//! annoquery compiler: from a `GraphQuery` to a parameterized statement.
//!
//! This crate provides the compilation pipeline for annotation graph queries:
//! - `query` - the `GraphQuery` accumulator and its terminal operations
//! - `analyze` - discourse scope, level resolution and criterion routing
//! - `compile` - statement IR, lowering and text rendering
//! - `store` - graph store and result sink collaborators

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod compile;
pub mod query;
pub mod store;

#[cfg(test)]
pub mod test_utils;

pub use compile::{AccessMode, CompileError, Params, Statement};
pub use query::{Aggregate, AggregateFunction, AggregateResult, BuildError, GraphQuery, Mutation};
pub use store::{GraphStore, ResultSink, RowSet, StoreError, WriteAck};

/// Errors that can occur while building, compiling or running a query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The store rejected the statement.
    #[error("statement execution failed: {0}")]
    Execution(#[source] StoreError),

    /// The result sink failed.
    #[error("saving results failed: {0}")]
    Export(#[source] StoreError),

    /// A scalar result had the wrong shape.
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, Error>;
