//! Clause elements: the predicates a query accumulates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AnnotationType, AttributePath, Hop, Property, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::In => "IN",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Value(Value),
    Path(AttributePath),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentKind {
    LeftAligned,
    RightAligned,
    NotLeftAligned,
    NotRightAligned,
}

impl AlignmentKind {
    pub fn name(self) -> &'static str {
        match self {
            AlignmentKind::LeftAligned => "left_aligned",
            AlignmentKind::RightAligned => "right_aligned",
            AlignmentKind::NotLeftAligned => "not_left_aligned",
            AlignmentKind::NotRightAligned => "not_right_aligned",
        }
    }

    /// Boundary being compared: `begin` for left, `end` for right.
    pub fn anchor(self) -> Property {
        match self {
            AlignmentKind::LeftAligned | AlignmentKind::NotLeftAligned => Property::Begin,
            AlignmentKind::RightAligned | AlignmentKind::NotRightAligned => Property::End,
        }
    }

    pub fn is_negated(self) -> bool {
        matches!(
            self,
            AlignmentKind::NotLeftAligned | AlignmentKind::NotRightAligned
        )
    }
}

/// A filter criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClauseElement {
    /// `path op operand`.
    Comparison {
        path: AttributePath,
        op: CompareOp,
        operand: Operand,
    },
    /// `container` contains a token of `path`'s annotation whose property
    /// equals `value`.
    Contains {
        container: AnnotationType,
        path: AttributePath,
        value: Value,
    },
    /// Boundary anchors of `first` and `second` are (not) shared.
    Alignment {
        alignment: AlignmentKind,
        first: AnnotationType,
        second: AnnotationType,
    },
}

impl ClauseElement {
    pub fn contains(
        container: AnnotationType,
        path: AttributePath,
        value: impl Into<Value>,
    ) -> Self {
        ClauseElement::Contains {
            container,
            path,
            value: value.into(),
        }
    }

    pub fn aligned(alignment: AlignmentKind, first: AnnotationType, second: AnnotationType) -> Self {
        ClauseElement::Alignment {
            alignment,
            first,
            second,
        }
    }

    /// Every distinct annotation referenced, in first-seen order.
    pub fn annotations(&self) -> Vec<&AnnotationType> {
        let all: Vec<&AnnotationType> = match self {
            ClauseElement::Comparison { path, operand, .. } => match operand {
                Operand::Path(other) => vec![path.annotation(), other.annotation()],
                Operand::Value(_) => vec![path.annotation()],
            },
            ClauseElement::Contains {
                container, path, ..
            } => vec![container, path.annotation()],
            ClauseElement::Alignment { first, second, .. } => vec![first, second],
        };
        dedup(all)
    }

    /// Annotations that must be bound as pattern nodes.
    ///
    /// The contained token of a `Contains` clause is only tested for
    /// existence and is not bound.
    pub fn pattern_annotations(&self) -> Vec<&AnnotationType> {
        match self {
            ClauseElement::Contains { container, .. } => vec![container],
            _ => self.annotations(),
        }
    }

    /// Attribute paths read by this clause.
    pub fn paths(&self) -> Vec<&AttributePath> {
        match self {
            ClauseElement::Comparison { path, operand, .. } => match operand {
                Operand::Path(other) => vec![path, other],
                Operand::Value(_) => vec![path],
            },
            ClauseElement::Contains { path, .. } => vec![path],
            ClauseElement::Alignment { .. } => Vec::new(),
        }
    }

    /// Canonical text key: equal clauses produce equal keys.
    pub fn key(&self) -> String {
        match self {
            ClauseElement::Comparison { path, op, operand } => {
                let right = match operand {
                    Operand::Value(value) => value.to_string(),
                    Operand::Path(other) => path_key(other),
                };
                format!("{} {op} {right}", path_key(path))
            }
            ClauseElement::Contains {
                container,
                path,
                value,
            } => format!(
                "{} contains {} = {value}",
                annotation_key(container),
                path_key(path)
            ),
            ClauseElement::Alignment {
                alignment,
                first,
                second,
            } => format!(
                "{} {} {}",
                annotation_key(first),
                alignment.name(),
                annotation_key(second)
            ),
        }
    }
}

/// Names are JSON-quoted so no separator can appear unescaped inside one.
fn quoted(name: &str) -> String {
    Value::from(name).to_string()
}

fn annotation_key(annotation: &AnnotationType) -> String {
    let mut out = quoted(annotation.origin());
    for hop in annotation.hops() {
        match hop {
            Hop::Following => out.push('>'),
            Hop::Previous => out.push('<'),
            Hop::Up { level } => {
                out.push('^');
                out.push_str(&quoted(level));
            }
            Hop::Speaker => out.push('@'),
        }
    }
    if let Some(discourse) = annotation.discourse_label() {
        out.push('#');
        out.push_str(&quoted(discourse));
    }
    for subset in annotation.type_subsets() {
        out.push(':');
        out.push_str(&quoted(subset));
    }
    for subset in annotation.token_subsets() {
        out.push('+');
        out.push_str(&quoted(subset));
    }
    out
}

fn path_key(path: &AttributePath) -> String {
    let mut out = format!(
        "{}.{}",
        annotation_key(path.annotation()),
        quoted(path.property().name())
    );
    if let Some(alias) = path.alias() {
        out.push_str(" as ");
        out.push_str(&quoted(alias));
    }
    out
}

fn dedup(items: Vec<&AnnotationType>) -> Vec<&AnnotationType> {
    let mut out: Vec<&AnnotationType> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
