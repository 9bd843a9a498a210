//! Statement intermediate representation.
//!
//! A [`Statement`] is the fully lowered query: pattern nodes, hop edges,
//! relationship constraints, property filters, optional levels and a tail.
//! Rendering to text lives in `render`.

use annoquery_core::{CompareOp, Property};

use super::Params;
use crate::analyze::LevelId;
use crate::query::AggregateFunction;

/// How the store should run a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// Operand of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Property of a bound variable. `duration` renders as `end - begin`.
    Property { var: String, property: Property },
    /// Named parameter, without `$`.
    Param(String),
}

impl Expr {
    pub fn property(var: impl Into<String>, property: Property) -> Self {
        Expr::Property {
            var: var.into(),
            property,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub left: Expr,
    pub op: CompareOp,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub var: String,
    pub labels: Vec<String>,
}

/// Token node with the constraints bound on it.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub level: LevelId,
    pub var: String,
    pub labels: Vec<String>,
    /// Parameter holding the `id` the node is pinned to.
    pub identity: Option<String>,
    pub type_node: Option<TypeNode>,
    pub inline: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Following,
    Previous,
    /// Containment across this many hierarchy steps.
    ContainedBy(usize),
    SpokenBy,
}

/// Hop from a level to the level it extends.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub parent: String,
    pub child: String,
    pub relation: Relation,
}

/// Existential test: the container holds a lower token with a given property.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainsPattern {
    pub container: String,
    pub depth: usize,
    pub labels: Vec<String>,
    pub type_labels: Vec<String>,
    pub property: Property,
    pub param: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Compare(Predicate),
    Contains(ContainsPattern),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionalMatch {
    pub edge: Edge,
    pub node: NodePattern,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnExpr {
    Value(Expr),
    Aggregate {
        function: AggregateFunction,
        arg: Option<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnItem {
    pub expr: ReturnExpr,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub alias: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub var: String,
    pub key: String,
    pub param: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tail {
    Return {
        items: Vec<ReturnItem>,
        order: Vec<OrderItem>,
    },
    Set {
        /// Link to the type node when the pattern does not bind it already.
        type_link: Option<(String, TypeNode)>,
        assignments: Vec<Assignment>,
    },
    Delete {
        var: String,
    },
}

/// A compiled, parameterized statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub(crate) nodes: Vec<NodePattern>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) filters: Vec<Predicate>,
    pub(crate) optional: Vec<OptionalMatch>,
    pub(crate) tail: Tail,
    pub(crate) params: Params,
}

impl Statement {
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn tail(&self) -> &Tail {
        &self.tail
    }

    pub fn access_mode(&self) -> AccessMode {
        match self.tail {
            Tail::Return { .. } => AccessMode::Read,
            Tail::Set { .. } | Tail::Delete { .. } => AccessMode::Write,
        }
    }

    /// Reads and property writes can be replayed; deletes cannot.
    pub fn retry_safe(&self) -> bool {
        !matches!(self.tail, Tail::Delete { .. })
    }

    /// Distinct token nodes bound, required and optional.
    pub fn pattern_node_count(&self) -> usize {
        self.nodes.len() + self.optional.len()
    }

    /// Hop edges plus cross-node constraints.
    pub fn relationship_count(&self) -> usize {
        self.edges.len() + self.optional.len() + self.constraints.len()
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Output column names, in order. Empty for writes.
    pub fn columns(&self) -> Vec<&str> {
        match &self.tail {
            Tail::Return { items, .. } => items.iter().map(|i| i.alias.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}
