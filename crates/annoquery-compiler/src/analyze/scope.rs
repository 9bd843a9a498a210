//! Discourse scope pre-pass.
//!
//! A query addresses at most one discourse. The scope is read from the
//! searched-for type, from labels on criteria that reference it directly and
//! from discourse equality criteria on it, then stamped onto every annotation
//! that carries no label of its own.

use annoquery_core::{AnnotationType, ClauseElement, CompareOp, Operand, Property, Value};

use crate::compile::CompileError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscourseScope {
    discourse: Option<String>,
}

impl DiscourseScope {
    /// Collect the scope from `root` and the criteria constraining it.
    pub fn collect(root: &AnnotationType, criteria: &[ClauseElement]) -> Result<Self, CompileError> {
        let mut scope = Self {
            discourse: root.discourse_label().map(str::to_string),
        };
        for criterion in criteria {
            for annotation in criterion.annotations() {
                if on_root(root, annotation)
                    && let Some(label) = annotation.discourse_label()
                {
                    scope.assert(label)?;
                }
            }
            if let Some(label) = asserted_discourse(root, criterion) {
                scope.assert(label)?;
            }
        }
        Ok(scope)
    }

    pub fn discourse(&self) -> Option<&str> {
        self.discourse.as_deref()
    }

    fn assert(&mut self, label: &str) -> Result<(), CompileError> {
        match &self.discourse {
            Some(current) if current != label => Err(CompileError::ConflictingDiscourse {
                first: current.clone(),
                second: label.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.discourse = Some(label.to_string());
                Ok(())
            }
        }
    }

    /// Stamp the scope onto `annotation` unless it is explicitly labelled.
    pub fn apply(&self, annotation: AnnotationType) -> Result<AnnotationType, CompileError> {
        match (annotation.discourse_label(), self.discourse()) {
            (None, Some(scope)) => Ok(annotation.in_discourse(scope)),
            (Some(own), Some(scope)) if own != scope => Err(CompileError::ConflictingDiscourse {
                first: scope.to_string(),
                second: own.to_string(),
            }),
            _ => Ok(annotation),
        }
    }
}

/// Discourse literal fixed by `criterion` on the searched-for level, if any.
fn asserted_discourse<'c>(root: &AnnotationType, criterion: &'c ClauseElement) -> Option<&'c str> {
    let ClauseElement::Comparison { path, .. } = criterion else {
        return None;
    };
    if !on_root(root, path.annotation()) {
        return None;
    }
    discourse_literal(criterion)
}

/// Single discourse a comparison pins its level to, on any level.
pub fn discourse_literal(criterion: &ClauseElement) -> Option<&str> {
    let ClauseElement::Comparison { path, op, operand } = criterion else {
        return None;
    };
    if *path.property() != Property::Discourse {
        return None;
    }
    match (op, operand) {
        (CompareOp::Eq, Operand::Value(Value::String(label))) => Some(label),
        (CompareOp::In, Operand::Value(Value::Array(items))) if items.len() == 1 => {
            items[0].as_str()
        }
        _ => None,
    }
}

fn on_root(root: &AnnotationType, annotation: &AnnotationType) -> bool {
    annotation.origin() == root.origin() && annotation.depth() == 0
}
