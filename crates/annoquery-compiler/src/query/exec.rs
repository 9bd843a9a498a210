//! Terminal operations: compile the current state and hand it to a store.

use std::path::Path;

use annoquery_core::Value;

use super::{Aggregate, BuildError, GraphQuery, Mutation};
use crate::compile::{Compiler, Intent, Statement};
use crate::store::{GraphStore, ResultSink, RowSet, WriteAck};
use crate::{Error, Result};

/// Result of [`GraphQuery::aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateResult {
    /// Ungrouped, single aggregate.
    Scalar(Value),
    /// Grouped, or several aggregates.
    Rows(RowSet),
}

impl GraphQuery {
    /// Read statement for the current state.
    pub fn statement(&self) -> Result<Statement> {
        Compiler::compile(self, Intent::Rows)
    }

    /// `count(*)` over the current criteria.
    pub fn count_statement(&self) -> Result<Statement> {
        Compiler::compile(self, Intent::Count)
    }

    /// Write statement for the staged mutation.
    pub fn mutation_statement(&self) -> Result<Statement> {
        Compiler::compile(self, Intent::Mutation)
    }

    pub fn all<S: GraphStore + ?Sized>(&self, store: &S) -> Result<RowSet> {
        read(store, &self.statement()?)
    }

    /// Run the read statement and pass the rows to `sink`.
    pub fn to_csv<S, K>(&self, store: &S, sink: &mut K, path: &Path) -> Result<()>
    where
        S: GraphStore + ?Sized,
        K: ResultSink + ?Sized,
    {
        let rows = self.all(store)?;
        tracing::debug!(rows = rows.len(), path = %path.display(), "saving results");
        sink.save_results(&rows, path).map_err(Error::Export)
    }

    /// Number of matching tokens. No rows counts as zero.
    pub fn count<S: GraphStore + ?Sized>(&self, store: &S) -> Result<u64> {
        let rows = read(store, &self.count_statement()?)?;
        match rows.one() {
            None | Some(Value::Null) => Ok(0),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| Error::UnexpectedResult(format!("count returned `{value}`"))),
        }
    }

    /// Run the aggregate read for `aggregates`.
    ///
    /// The specs are stored only once they compile.
    pub fn aggregate<S, I>(&mut self, store: &S, aggregates: I) -> Result<AggregateResult>
    where
        S: GraphStore + ?Sized,
        I: IntoIterator<Item = Aggregate>,
    {
        let aggregates: Vec<Aggregate> = aggregates.into_iter().collect();
        if aggregates.is_empty() {
            return Err(BuildError::EmptyAggregate.into());
        }
        let mut staged = self.clone();
        staged.aggregates = aggregates;
        let statement = staged.statement()?;
        self.aggregates = staged.aggregates;

        let rows = read(store, &statement)?;
        if !self.group_by.is_empty() || self.aggregates.len() > 1 {
            return Ok(AggregateResult::Rows(rows));
        }
        Ok(AggregateResult::Scalar(
            rows.one().cloned().unwrap_or(Value::Null),
        ))
    }

    /// Set type-level properties on every matched token's type.
    pub fn set_type<S, I, K, V>(&mut self, store: &S, properties: I) -> Result<()>
    where
        S: GraphStore + ?Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut mutation = Mutation::default();
        super::extend(&mut mutation.type_properties, properties);
        self.write(store, mutation)
    }

    /// Set token-level properties on every matched token.
    pub fn set_token<S, I, K, V>(&mut self, store: &S, properties: I) -> Result<()>
    where
        S: GraphStore + ?Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut mutation = Mutation::default();
        super::extend(&mut mutation.token_properties, properties);
        self.write(store, mutation)
    }

    /// Delete every matched token and its relationships. Irreversible.
    pub fn delete<S: GraphStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let mutation = Mutation {
            delete: true,
            ..Mutation::default()
        };
        self.write(store, mutation)
    }

    /// Compile and execute `mutation` alone, replacing any staged one.
    ///
    /// The query keeps the last mutation that compiled.
    fn write<S: GraphStore + ?Sized>(&mut self, store: &S, mutation: Mutation) -> Result<()> {
        let mut staged = self.clone();
        staged.mutation = mutation;
        let statement = staged.mutation_statement()?;
        self.mutation = staged.mutation;

        let ack = write(store, &statement)?;
        tracing::debug!(
            nodes_deleted = ack.nodes_deleted,
            relationships_deleted = ack.relationships_deleted,
            properties_set = ack.properties_set,
            "write acknowledged"
        );
        Ok(())
    }
}

fn read<S: GraphStore + ?Sized>(store: &S, statement: &Statement) -> Result<RowSet> {
    let text = statement.text();
    trace_statement(statement, &text);
    store
        .execute(&text, statement.params())
        .map_err(Error::Execution)
}

fn write<S: GraphStore + ?Sized>(store: &S, statement: &Statement) -> Result<WriteAck> {
    let text = statement.text();
    trace_statement(statement, &text);
    store
        .execute_write(&text, statement.params())
        .map_err(Error::Execution)
}

fn trace_statement(statement: &Statement, text: &str) {
    tracing::debug!(
        mode = ?statement.access_mode(),
        retry_safe = statement.retry_safe(),
        params = statement.params().len(),
        bytes = text.len(),
        "executing statement"
    );
    tracing::trace!(%text);
}
