//! Collaborator traits: the graph store that runs statements and the sink
//! that persists results.

use std::path::Path;

use annoquery_core::Value;
use serde::{Deserialize, Serialize};

use crate::compile::Params;

/// Error raised by a collaborator, passed through unchanged.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Backing graph store.
///
/// One blocking call per statement; retry, pooling and timeouts are the
/// implementor's concern.
pub trait GraphStore {
    fn execute(&self, text: &str, params: &Params) -> Result<RowSet, StoreError>;

    fn execute_write(&self, text: &str, params: &Params) -> Result<WriteAck, StoreError>;
}

impl<T: GraphStore + ?Sized> GraphStore for &T {
    fn execute(&self, text: &str, params: &Params) -> Result<RowSet, StoreError> {
        (**self).execute(text, params)
    }

    fn execute_write(&self, text: &str, params: &Params) -> Result<WriteAck, StoreError> {
        (**self).execute_write(text, params)
    }
}

/// Persists a result set, e.g. as CSV.
pub trait ResultSink {
    fn save_results(&mut self, rows: &RowSet, destination: &Path) -> Result<(), StoreError>;
}

/// Ordered rows keyed by the statement's output column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: impl IntoIterator<Item = Value>) -> Self {
        self.push(row);
        self
    }

    pub fn push(&mut self, row: impl IntoIterator<Item = Value>) {
        self.rows.push(row.into_iter().collect());
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }

    /// The first value of the first row; `None` when there are no rows.
    pub fn one(&self) -> Option<&Value> {
        self.rows.first()?.first()
    }
}

/// Store summary of a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    pub nodes_deleted: u64,
    pub relationships_deleted: u64,
    pub properties_set: u64,
}
