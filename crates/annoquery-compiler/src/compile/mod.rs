//! Lowering of a query into a parameterized statement.
//!
//! - `compiler`: builds the statement IR from analysis results
//! - `ir`: pattern nodes, edges, constraints, filters and tails
//! - `params`: named parameter table
//! - `render`: statement text

mod compiler;
mod error;
mod ir;
mod params;
mod render;


pub use compiler::Compiler;
pub use error::CompileError;
pub use ir::{
    AccessMode, Assignment, Constraint, ContainsPattern, Edge, Expr, NodePattern, OptionalMatch,
    OrderItem, Predicate, Relation, ReturnExpr, ReturnItem, Statement, Tail, TypeNode,
};
pub use params::Params;

/// What a statement is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Projected or aggregated rows.
    Rows,
    /// A single `count(*)`.
    Count,
    /// Property updates or deletion.
    Mutation,
}
