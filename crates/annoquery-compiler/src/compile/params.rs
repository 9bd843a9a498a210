//! Named statement parameters.

use annoquery_core::Value;
use annoquery_core::utils::to_snake_case;
use indexmap::IndexMap;
use serde::Serialize;

/// Parameter table in emission order.
///
/// Names are `<hint>_<n>` where `n` counts every parameter emitted before,
/// so names are unique and follow the statement text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params {
    values: IndexMap<String, Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` and return its name (without `$`).
    pub fn push(&mut self, hint: &str, value: Value) -> String {
        let name = format!("{}_{}", to_snake_case(hint), self.values.len());
        self.values.insert(name.clone(), value);
        name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.values
    }
}
