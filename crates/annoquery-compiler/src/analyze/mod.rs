//! Semantic analysis of a query before lowering.
//!
//! - `scope`: discourse scope pre-pass
//! - `context`: canonicalization of annotation references
//! - `levels`: one pattern level per canonical annotation
//! - `partition`: routing of criteria to statement sections

mod context;
mod levels;
mod partition;
mod scope;

#[cfg(test)]
mod partition_tests;
#[cfg(test)]
mod scope_tests;

pub use context::Context;
pub use levels::{Level, LevelId, Levels, Reference, References};
pub use partition::{Partition, Route};
pub use scope::{DiscourseScope, discourse_literal};
