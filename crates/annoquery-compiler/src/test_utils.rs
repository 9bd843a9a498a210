//! Test utilities and snapshot macros.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use annoquery_core::Hierarchy;

use crate::compile::{AccessMode, Params, Statement};
use crate::store::{GraphStore, ResultSink, RowSet, StoreError, WriteAck};

/// Snapshot test for the read statement of a query.
#[macro_export]
macro_rules! shot_cypher {
    ($query:expr, @$snapshot:literal) => {{
        let statement = $query.statement().expect("query should compile");
        let output = $crate::test_utils::dump(&statement);
        insta::with_settings!({ omit_expression => true }, {
            insta::assert_snapshot!(output, @$snapshot);
        });
    }};
}

/// Snapshot test for the mutation statement of a query.
#[macro_export]
macro_rules! shot_mutation {
    ($query:expr, @$snapshot:literal) => {{
        let statement = $query.mutation_statement().expect("mutation should compile");
        let output = $crate::test_utils::dump(&statement);
        insta::with_settings!({ omit_expression => true }, {
            insta::assert_snapshot!(output, @$snapshot);
        });
    }};
}

/// Statement text followed by its parameters, one per line.
pub fn dump(statement: &Statement) -> String {
    let mut out = statement.text();
    if !statement.params().is_empty() {
        out.push_str("\n---");
        for (name, value) in statement.params().iter() {
            out.push_str(&format!("\n{name}: {value}"));
        }
    }
    out
}

pub fn hierarchy() -> Hierarchy {
    Hierarchy::new(["phone", "syllable", "word", "utterance"])
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// Executed statement as seen by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub text: String,
    pub params: Params,
    pub mode: AccessMode,
}

/// Store that records every statement and replays queued responses.
#[derive(Debug, Default)]
pub struct MockStore {
    executed: RefCell<Vec<Executed>>,
    responses: RefCell<VecDeque<RowSet>>,
    failure: Option<String>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next read.
    pub fn respond(self, rows: RowSet) -> Self {
        self.responses.borrow_mut().push_back(rows);
        self
    }

    /// Fail every call with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.executed.borrow().clone()
    }

    fn record(&self, text: &str, params: &Params, mode: AccessMode) -> Result<(), StoreError> {
        self.executed.borrow_mut().push(Executed {
            text: text.to_string(),
            params: params.clone(),
            mode,
        });
        match &self.failure {
            Some(message) => Err(Box::new(MockError(message.clone()))),
            None => Ok(()),
        }
    }
}

impl GraphStore for MockStore {
    fn execute(&self, text: &str, params: &Params) -> Result<RowSet, StoreError> {
        self.record(text, params, AccessMode::Read)?;
        Ok(self.responses.borrow_mut().pop_front().unwrap_or_default())
    }

    fn execute_write(&self, text: &str, params: &Params) -> Result<WriteAck, StoreError> {
        self.record(text, params, AccessMode::Write)?;
        Ok(WriteAck::default())
    }
}

/// Sink that keeps saved results in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub saved: Vec<(PathBuf, RowSet)>,
    pub failure: Option<String>,
}

impl ResultSink for MemorySink {
    fn save_results(&mut self, rows: &RowSet, destination: &Path) -> Result<(), StoreError> {
        if let Some(message) = &self.failure {
            return Err(Box::new(MockError(message.clone())));
        }
        self.saved.push((destination.to_path_buf(), rows.clone()));
        Ok(())
    }
}
