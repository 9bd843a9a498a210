//! Ordering of annotation levels.

use serde::{Deserialize, Serialize};

/// Annotation levels ordered from the lowest (e.g. `phone`) to the highest
/// (e.g. `utterance`). Every level is contained by the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hierarchy {
    levels: Vec<String>,
}

impl Hierarchy {
    /// Build a hierarchy from levels listed lowest first. Duplicate names keep
    /// their first position.
    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for level in levels {
            let level = level.into();
            if !out.contains(&level) {
                out.push(level);
            }
        }
        Self { levels: out }
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn contains(&self, level: &str) -> bool {
        self.position(level).is_some()
    }

    /// Index of `level`, 0 being the lowest.
    pub fn position(&self, level: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == level)
    }

    /// Number of containment steps from `lower` up to `higher`.
    ///
    /// Returns `None` unless `higher` is strictly above `lower`.
    pub fn distance(&self, lower: &str, higher: &str) -> Option<usize> {
        let lo = self.position(lower)?;
        let hi = self.position(higher)?;
        (hi > lo).then(|| hi - lo)
    }

    pub fn is_ancestor(&self, ancestor: &str, of: &str) -> bool {
        self.distance(of, ancestor).is_some()
    }
}
