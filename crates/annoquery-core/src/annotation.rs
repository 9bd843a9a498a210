//! Annotation types: which level of the hierarchy a path points at.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{AttributePath, Hierarchy, Property};

/// One relation step from an annotation to a related annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "hop", rename_all = "snake_case")]
pub enum Hop {
    /// Next token of the same level.
    Following,
    /// Previous token of the same level.
    Previous,
    /// Containing token of a higher level.
    Up { level: String },
    /// Speaker of the token.
    Speaker,
}

impl Hop {
    /// Name fragment used in column names and pattern variables.
    pub fn segment(&self) -> &str {
        match self {
            Hop::Following => "following",
            Hop::Previous => "previous",
            Hop::Up { level } => level,
            Hop::Speaker => "speaker",
        }
    }
}

/// A node kind in the annotation graph, reached from an origin level through
/// zero or more hops.
///
/// Equality covers origin, hops, discourse label and both subset sets, so two
/// values compare equal exactly when they denote the same pattern node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationType {
    origin: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    hops: Vec<Hop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    discourse: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    type_subsets: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    token_subsets: BTreeSet<String>,
}

impl AnnotationType {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            origin: level.into(),
            hops: Vec::new(),
            discourse: None,
            type_subsets: BTreeSet::new(),
            token_subsets: BTreeSet::new(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// Number of hops from the origin.
    pub fn depth(&self) -> usize {
        self.hops.len()
    }

    pub fn discourse_label(&self) -> Option<&str> {
        self.discourse.as_deref()
    }

    pub fn type_subsets(&self) -> &BTreeSet<String> {
        &self.type_subsets
    }

    pub fn token_subsets(&self) -> &BTreeSet<String> {
        &self.token_subsets
    }

    pub fn has_subsets(&self) -> bool {
        !self.type_subsets.is_empty() || !self.token_subsets.is_empty()
    }

    /// Level the hop chain ends at.
    pub fn name(&self) -> &str {
        let mut name = self.origin.as_str();
        for hop in &self.hops {
            match hop {
                Hop::Following | Hop::Previous => {}
                Hop::Up { level } => name = level.as_str(),
                Hop::Speaker => name = "speaker",
            }
        }
        name
    }

    pub fn is_speaker(&self) -> bool {
        matches!(self.hops.last(), Some(Hop::Speaker))
    }

    /// Hierarchy index of the level this type ends at.
    ///
    /// Hops that leave the hierarchy (speaker) keep the last known level.
    pub fn level_position(&self, hierarchy: &Hierarchy) -> Option<usize> {
        let mut pos = hierarchy.position(&self.origin);
        for hop in &self.hops {
            if let Hop::Up { level } = hop {
                pos = hierarchy.position(level).or(pos);
            }
        }
        pos
    }

    /// Hop segments joined with `_`; empty for the origin itself.
    pub fn segment_path(&self) -> String {
        self.hops
            .iter()
            .map(Hop::segment)
            .collect::<Vec<_>>()
            .join("_")
    }

    fn hop(mut self, hop: Hop) -> Self {
        self.hops.push(hop);
        self.type_subsets.clear();
        self.token_subsets.clear();
        self
    }

    pub fn following(&self) -> Self {
        self.clone().hop(Hop::Following)
    }

    pub fn previous(&self) -> Self {
        self.clone().hop(Hop::Previous)
    }

    /// Containing annotation at `level`.
    pub fn up(&self, level: impl Into<String>) -> Self {
        self.clone().hop(Hop::Up {
            level: level.into(),
        })
    }

    pub fn speaker(&self) -> Self {
        self.clone().hop(Hop::Speaker)
    }

    pub fn with_type_subset(mut self, subset: impl Into<String>) -> Self {
        self.type_subsets.insert(subset.into());
        self
    }

    pub fn with_token_subset(mut self, subset: impl Into<String>) -> Self {
        self.token_subsets.insert(subset.into());
        self
    }

    pub fn in_discourse(mut self, discourse: impl Into<String>) -> Self {
        self.discourse = Some(discourse.into());
        self
    }

    pub fn with_discourse(mut self, discourse: Option<String>) -> Self {
        self.discourse = discourse;
        self
    }

    /// The same position with no subset qualifiers.
    pub fn without_subsets(mut self) -> Self {
        self.type_subsets.clear();
        self.token_subsets.clear();
        self
    }

    /// Annotation one hop closer to the origin, unqualified except for the
    /// discourse label. `None` at the origin.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.hops.split_last()?;
        Some(Self {
            origin: self.origin.clone(),
            hops: rest.to_vec(),
            discourse: self.discourse.clone(),
            type_subsets: BTreeSet::new(),
            token_subsets: BTreeSet::new(),
        })
    }

    /// Re-root at `level` through a containment hop to the current origin.
    pub fn rebased(&self, level: &str) -> Self {
        let mut hops = Vec::with_capacity(self.hops.len() + 1);
        hops.push(Hop::Up {
            level: self.origin.clone(),
        });
        hops.extend(self.hops.iter().cloned());
        Self {
            origin: level.to_string(),
            hops,
            ..self.clone()
        }
    }

    pub fn attribute(&self, property: impl Into<Property>) -> AttributePath {
        AttributePath::new(self.clone(), property)
    }

    pub fn id(&self) -> AttributePath {
        self.attribute(Property::Id)
    }

    pub fn label(&self) -> AttributePath {
        self.attribute(Property::Label)
    }

    pub fn begin(&self) -> AttributePath {
        self.attribute(Property::Begin)
    }

    pub fn end(&self) -> AttributePath {
        self.attribute(Property::End)
    }

    pub fn duration(&self) -> AttributePath {
        self.attribute(Property::Duration)
    }

    pub fn discourse(&self) -> AttributePath {
        self.attribute(Property::Discourse)
    }

    /// Arbitrary property (`cog`, `stress`, speaker `name`, ...).
    pub fn property(&self, name: impl Into<String>) -> AttributePath {
        self.attribute(Property::from(name.into()))
    }
}
