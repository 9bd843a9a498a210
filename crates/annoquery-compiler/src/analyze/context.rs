//! Canonicalization of annotation references against the searched-for level.

use annoquery_core::{AnnotationType, ClauseElement, Hierarchy, Hop};

use super::DiscourseScope;
use crate::compile::CompileError;

/// Immutable analysis context for one compilation.
#[derive(Debug, Clone)]
pub struct Context<'q> {
    hierarchy: &'q Hierarchy,
    root: AnnotationType,
    scope: DiscourseScope,
}

impl<'q> Context<'q> {
    pub fn new(
        hierarchy: &'q Hierarchy,
        to_find: &AnnotationType,
        criteria: &[ClauseElement],
    ) -> Result<Self, CompileError> {
        let scope = DiscourseScope::collect(to_find, criteria)?;
        let root = scope.apply(to_find.clone())?;
        Ok(Self {
            hierarchy,
            root,
            scope,
        })
    }

    pub fn hierarchy(&self) -> &'q Hierarchy {
        self.hierarchy
    }

    /// The searched-for type with the discourse scope applied.
    pub fn root(&self) -> &AnnotationType {
        &self.root
    }

    pub fn scope(&self) -> &DiscourseScope {
        &self.scope
    }

    /// Canonical form of `annotation`: rooted at the searched-for level,
    /// hop chain checked against the hierarchy, discourse scope applied.
    pub fn canonicalize(&self, annotation: &AnnotationType) -> Result<AnnotationType, CompileError> {
        let rooted = if annotation.origin() == self.root.origin() {
            annotation.clone()
        } else if self
            .hierarchy
            .is_ancestor(annotation.origin(), self.root.origin())
        {
            annotation.rebased(self.root.origin())
        } else {
            return Err(self.unreachable(annotation));
        };
        self.check_hops(&rooted, annotation)?;

        let scoped = self.scope.apply(rooted)?;
        if scoped.depth() == 0 {
            return self.bind_root(scoped);
        }
        Ok(scoped)
    }

    fn check_hops(
        &self,
        rooted: &AnnotationType,
        original: &AnnotationType,
    ) -> Result<(), CompileError> {
        let mut current = Some(rooted.origin());
        for hop in rooted.hops() {
            current = match (hop, current) {
                (Hop::Following | Hop::Previous, Some(level)) => Some(level),
                (Hop::Up { level }, Some(from)) if self.hierarchy.is_ancestor(level, from) => {
                    Some(level.as_str())
                }
                // speakers have no neighbours and no containers
                (Hop::Speaker, Some(_)) => None,
                _ => return Err(self.unreachable(original)),
            };
        }
        Ok(())
    }

    fn bind_root(&self, annotation: AnnotationType) -> Result<AnnotationType, CompileError> {
        let same_subsets = !annotation.has_subsets()
            || (annotation.type_subsets() == self.root.type_subsets()
                && annotation.token_subsets() == self.root.token_subsets());
        let same_discourse = annotation.discourse_label() == self.root.discourse_label();
        if same_subsets && same_discourse {
            Ok(self.root.clone())
        } else {
            Err(CompileError::AmbiguousLevel {
                level: self.root.origin().to_string(),
            })
        }
    }

    pub(crate) fn unreachable(&self, annotation: &AnnotationType) -> CompileError {
        CompileError::UnreachableAnnotation {
            annotation: dotted(annotation),
            root: self.root.origin().to_string(),
        }
    }
}

/// `phone.following.word` style rendering for messages.
fn dotted(annotation: &AnnotationType) -> String {
    let mut out = annotation.origin().to_string();
    for hop in annotation.hops() {
        out.push('.');
        out.push_str(hop.segment());
    }
    out
}
