#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Data model for annotation graph queries.
//!
//! - [`Hierarchy`]: ordered annotation levels (phone < word < utterance)
//! - [`AnnotationType`]: a level reached through relation hops, with
//!   discourse and subset qualifiers
//! - [`AttributePath`]: a property of an annotation, optionally aliased
//! - [`ClauseElement`]: comparison, containment and alignment criteria
//!
//! Everything here is declarative; nothing touches a store.

mod annotation;
mod attribute;
mod clause;
mod hierarchy;
pub mod utils;

#[cfg(test)]
mod clause_tests;

pub use annotation::{AnnotationType, Hop};
pub use attribute::{AttributePath, Property};
pub use clause::{AlignmentKind, ClauseElement, CompareOp, Operand};
pub use hierarchy::Hierarchy;

/// Literal values carried by criteria and mutations.
pub use serde_json::Value;

/// Ordered property assignments, used by mutations.
pub type PropertyMap = indexmap::IndexMap<String, Value>;
