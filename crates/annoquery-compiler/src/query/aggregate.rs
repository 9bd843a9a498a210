//! Aggregate specifications.

use annoquery_core::AttributePath;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    Count,
    Average,
    Min,
    Max,
    Sum,
    Stdev,
}

impl AggregateFunction {
    /// Function name in statement text.
    pub fn cypher_name(self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Average => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Stdev => "stDev",
        }
    }

    /// Prefix of the default output column name.
    pub fn output_prefix(self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Average => "average",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Stdev => "stdev",
        }
    }
}

/// One aggregate column: a function over a path, or `count(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aggregate {
    function: AggregateFunction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<AttributePath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
}

impl Aggregate {
    fn over(function: AggregateFunction, path: AttributePath) -> Self {
        Self {
            function,
            path: Some(path),
            alias: None,
        }
    }

    /// `count(*)`.
    pub fn count() -> Self {
        Self {
            function: AggregateFunction::Count,
            path: None,
            alias: None,
        }
    }

    pub fn count_of(path: AttributePath) -> Self {
        Self::over(AggregateFunction::Count, path)
    }

    pub fn average(path: AttributePath) -> Self {
        Self::over(AggregateFunction::Average, path)
    }

    pub fn min(path: AttributePath) -> Self {
        Self::over(AggregateFunction::Min, path)
    }

    pub fn max(path: AttributePath) -> Self {
        Self::over(AggregateFunction::Max, path)
    }

    pub fn sum(path: AttributePath) -> Self {
        Self::over(AggregateFunction::Sum, path)
    }

    pub fn stdev(path: AttributePath) -> Self {
        Self::over(AggregateFunction::Stdev, path)
    }

    pub fn column_name(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn function(&self) -> AggregateFunction {
        self.function
    }

    pub fn path(&self) -> Option<&AttributePath> {
        self.path.as_ref()
    }

    /// Alias, else `<prefix>_<column>`; `count_all` for `count(*)`.
    pub fn output_name(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        match &self.path {
            Some(path) => format!(
                "{}_{}",
                self.function.output_prefix(),
                path.output_name()
            ),
            None => format!("{}_all", self.function.output_prefix()),
        }
    }
}
