//! Annotation level resolution.
//!
//! Every annotation a query mentions is canonicalized and mapped to exactly
//! one [`Level`], which becomes one pattern node in the emitted statement.
//! Hop prefixes are inserted before the levels that extend them, so a
//! level's parent always has a smaller [`LevelId`].

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use annoquery_core::utils::to_snake_case;
use annoquery_core::{AnnotationType, AttributePath, ClauseElement};
use indexmap::IndexMap;

use super::Context;
use crate::compile::CompileError;

/// Index of a level in insertion order. The searched-for level is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(usize);

impl LevelId {
    pub const ROOT: LevelId = LevelId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// What made a level part of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Criterion(usize),
    Column(usize),
    GroupBy(usize),
    OrderBy(usize),
    Aggregate(usize),
}

#[derive(Debug, Clone)]
pub struct Level {
    annotation: AnnotationType,
    var: String,
    type_var: String,
    position: usize,
    required: bool,
    parent: Option<LevelId>,
    references: Vec<Reference>,
}

impl Level {
    /// Canonical annotation type.
    pub fn annotation(&self) -> &AnnotationType {
        &self.annotation
    }

    /// Token node variable.
    pub fn var(&self) -> &str {
        &self.var
    }

    /// Type node variable.
    pub fn type_var(&self) -> &str {
        &self.type_var
    }

    /// Levels above the searched-for level; 0 for the level itself and its
    /// neighbours.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Required levels are matched; the rest are optional.
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn parent(&self) -> Option<LevelId> {
        self.parent
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }
}

/// Paths the resolver reads besides criteria.
#[derive(Debug, Default)]
pub struct References<'a> {
    pub criteria: &'a [ClauseElement],
    pub columns: Vec<&'a AttributePath>,
    pub group_by: Vec<&'a AttributePath>,
    pub order_by: Vec<&'a AttributePath>,
    pub aggregates: Vec<&'a AttributePath>,
}

#[derive(Debug, Clone)]
pub struct Levels {
    levels: IndexMap<AnnotationType, Level>,
    /// Raw annotation as written by the caller -> resolved level.
    aliases: HashMap<AnnotationType, LevelId>,
}

impl Levels {
    pub fn resolve(ctx: &Context<'_>, refs: &References<'_>) -> Result<Self, CompileError> {
        let mut resolver = Resolver::new(ctx);
        resolver.insert(ctx.root().clone(), true);

        for (i, criterion) in refs.criteria.iter().enumerate() {
            for annotation in criterion.pattern_annotations() {
                resolver.add(annotation, Reference::Criterion(i), true)?;
            }
        }
        let optional = [
            (&refs.columns, Reference::Column as fn(usize) -> Reference),
            (&refs.group_by, Reference::GroupBy),
            (&refs.order_by, Reference::OrderBy),
            (&refs.aggregates, Reference::Aggregate),
        ];
        for (paths, reference) in optional {
            for (i, path) in paths.iter().enumerate() {
                resolver.add(path.annotation(), reference(i), false)?;
            }
        }

        Ok(Self {
            levels: resolver.levels,
            aliases: resolver.aliases,
        })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, id: LevelId) -> &Level {
        &self.levels[id.0]
    }

    pub fn root(&self) -> &Level {
        self.get(LevelId::ROOT)
    }

    /// Level a raw or canonical annotation resolved to.
    pub fn find(&self, annotation: &AnnotationType) -> Option<LevelId> {
        self.aliases
            .get(annotation)
            .copied()
            .or_else(|| self.levels.get_index_of(annotation).map(LevelId))
    }

    pub fn iter(&self) -> impl Iterator<Item = (LevelId, &Level)> {
        self.levels
            .values()
            .enumerate()
            .map(|(i, level)| (LevelId(i), level))
    }

    /// Required levels in pattern order: highest level first, then hop
    /// depth, then first mention.
    pub fn required(&self) -> Vec<LevelId> {
        let mut ids: Vec<LevelId> = self
            .iter()
            .filter(|(_, level)| level.required)
            .map(|(id, _)| id)
            .collect();
        ids.sort_by_key(|&id| {
            let level = self.get(id);
            (Reverse(level.position), level.annotation.depth())
        });
        ids
    }

    /// Optional levels in insertion order, parents before children.
    pub fn optional(&self) -> Vec<LevelId> {
        self.iter()
            .filter(|(_, level)| !level.required)
            .map(|(id, _)| id)
            .collect()
    }
}

struct Resolver<'c, 'q> {
    ctx: &'c Context<'q>,
    levels: IndexMap<AnnotationType, Level>,
    aliases: HashMap<AnnotationType, LevelId>,
    vars: HashSet<String>,
}

impl<'c, 'q> Resolver<'c, 'q> {
    fn new(ctx: &'c Context<'q>) -> Self {
        Self {
            ctx,
            levels: IndexMap::new(),
            aliases: HashMap::new(),
            vars: HashSet::new(),
        }
    }

    fn add(
        &mut self,
        raw: &AnnotationType,
        reference: Reference,
        required: bool,
    ) -> Result<LevelId, CompileError> {
        let id = match self.aliases.get(raw) {
            Some(&id) => id,
            None => {
                let canonical = self.ctx.canonicalize(raw)?;
                let id = self.insert(canonical, required);
                self.aliases.insert(raw.clone(), id);
                id
            }
        };
        self.levels[id.0].references.push(reference);
        if required {
            self.require(id);
        }
        Ok(id)
    }

    fn insert(&mut self, canonical: AnnotationType, required: bool) -> LevelId {
        if let Some(index) = self.levels.get_index_of(&canonical) {
            return LevelId(index);
        }
        let parent = match canonical.parent() {
            Some(parent) if parent.depth() == 0 => Some(LevelId::ROOT),
            Some(parent) => Some(self.insert(parent, required)),
            None => None,
        };

        let root_position = self.ctx.root().level_position(self.ctx.hierarchy());
        let position = match (canonical.level_position(self.ctx.hierarchy()), root_position) {
            (Some(pos), Some(root)) => pos.saturating_sub(root),
            _ => 0,
        };
        let var = self.unique_var(format!("node_{}", var_suffix(&canonical)));
        let type_var = format!("type_{}", var.strip_prefix("node_").unwrap_or(&var));

        let id = LevelId(self.levels.len());
        self.levels.insert(
            canonical.clone(),
            Level {
                annotation: canonical,
                var,
                type_var,
                position,
                required,
                parent,
                references: Vec::new(),
            },
        );
        id
    }

    /// Mark `id` and its hop prefixes as required.
    fn require(&mut self, id: LevelId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let level = &mut self.levels[id.0];
            level.required = true;
            current = level.parent;
        }
    }

    fn unique_var(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut n = 2;
        while self.vars.contains(&candidate) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        self.vars.insert(candidate.clone());
        candidate
    }
}

fn var_suffix(annotation: &AnnotationType) -> String {
    let mut out = to_snake_case(annotation.origin());
    for hop in annotation.hops() {
        out.push('_');
        out.push_str(&to_snake_case(hop.segment()));
    }
    out
}
