//! Routing of criteria to the statement section that expresses them.

use annoquery_core::{AnnotationType, ClauseElement, Operand, Property};

use super::{Context, LevelId, Levels};
use crate::compile::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `id` constraint on the node.
    Identity(LevelId),
    /// Anchor property constraint, inline on the node.
    Anchor(LevelId),
    /// Arbitrary property, post-match filter clause.
    Property(LevelId),
    /// Alignment, containment or cross-node comparison.
    Relationship,
}

/// One route per criterion, index-aligned with the criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    routes: Vec<Route>,
}

impl Partition {
    pub fn new(
        ctx: &Context<'_>,
        levels: &Levels,
        criteria: &[ClauseElement],
    ) -> Result<Self, CompileError> {
        let routes = criteria
            .iter()
            .map(|criterion| route(ctx, levels, criterion))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, criterion: usize) -> Route {
        self.routes[criterion]
    }

    /// Identity and anchor criteria bound inline on `level`, in order.
    pub fn inline(&self, level: LevelId) -> impl Iterator<Item = (usize, Route)> + '_ {
        self.routes.iter().copied().enumerate().filter(move |(_, r)| {
            matches!(r, Route::Identity(l) | Route::Anchor(l) if *l == level)
        })
    }

    pub fn relationships(&self) -> impl Iterator<Item = usize> + '_ {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, r)| matches!(r, Route::Relationship))
            .map(|(i, _)| i)
    }

    pub fn filters(&self) -> impl Iterator<Item = (usize, LevelId)> + '_ {
        self.routes.iter().enumerate().filter_map(|(i, r)| match r {
            Route::Property(level) => Some((i, *level)),
            _ => None,
        })
    }
}

fn route(
    ctx: &Context<'_>,
    levels: &Levels,
    criterion: &ClauseElement,
) -> Result<Route, CompileError> {
    let level_of = |annotation: &AnnotationType| {
        levels.find(annotation).ok_or_else(|| ctx.unreachable(annotation))
    };

    match criterion {
        ClauseElement::Alignment { .. } => Ok(Route::Relationship),
        ClauseElement::Contains {
            container, path, ..
        } => {
            if *path.property() == Property::Duration {
                return Err(CompileError::UnsupportedContainsProperty {
                    property: path.property().to_string(),
                });
            }
            let container = levels.get(level_of(container)?).annotation();
            let contained = path.annotation();
            let below = ctx
                .hierarchy()
                .distance(contained.origin(), container.name())
                .is_some();
            if contained.depth() > 0 || !below {
                return Err(ctx.unreachable(contained));
            }
            Ok(Route::Relationship)
        }
        ClauseElement::Comparison { path, operand, .. } => {
            let level = level_of(path.annotation())?;
            if let Operand::Path(other) = operand
                && level_of(other.annotation())? != level
            {
                return Ok(Route::Relationship);
            }
            Ok(match path.property() {
                Property::Id => Route::Identity(level),
                p if p.is_anchor() => Route::Anchor(level),
                _ => Route::Property(level),
            })
        }
    }
}
