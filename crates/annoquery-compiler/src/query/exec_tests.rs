use std::path::Path;

use annoquery_core::AnnotationType;
use serde_json::json;

use super::{Aggregate, AggregateResult, BuildError, GraphQuery, Mutation};
use crate::Error;
use crate::compile::AccessMode;
use crate::store::RowSet;
use crate::test_utils::{MemorySink, MockStore, hierarchy};

fn phone() -> AnnotationType {
    AnnotationType::new("phone")
}

fn find(to_find: &AnnotationType) -> GraphQuery {
    GraphQuery::new(hierarchy(), to_find.clone())
}

#[test]
fn all_returns_store_rows() {
    let phone = phone();
    let rows = RowSet::new(["id", "label"]).with_row([json!("p1"), json!("S")]);
    let store = MockStore::new().respond(rows.clone());
    let query = find(&phone).filter(phone.label().equals("S"));

    assert_eq!(query.all(&store).unwrap(), rows);
    let executed = store.executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].mode, AccessMode::Read);
    assert_eq!(executed[0].text, query.statement().unwrap().text());
    assert_eq!(executed[0].params.get("label_0"), Some(&json!("S")));
}

#[test]
fn count_zero_rows() {
    let store = MockStore::new();
    assert_eq!(find(&phone()).count(&store).unwrap(), 0);
    assert!(store.executed()[0].text.ends_with("RETURN count(*) AS count_all"));
}

#[test]
fn count_reads_scalar() {
    let store = MockStore::new().respond(RowSet::new(["count_all"]).with_row([json!(42)]));
    assert_eq!(find(&phone()).count(&store).unwrap(), 42);
}

#[test]
fn count_rejects_non_integer() {
    let store = MockStore::new().respond(RowSet::new(["count_all"]).with_row([json!("many")]));
    assert!(matches!(
        find(&phone()).count(&store),
        Err(Error::UnexpectedResult(_))
    ));
}

#[test]
fn ungrouped_aggregate_is_scalar() {
    let phone = phone();
    let store = MockStore::new().respond(RowSet::new(["average_duration"]).with_row([json!(0.08)]));
    let mut query = find(&phone);
    let result = query
        .aggregate(&store, [Aggregate::average(phone.duration())])
        .unwrap();
    assert_eq!(result, AggregateResult::Scalar(json!(0.08)));
    assert_eq!(query.aggregates().len(), 1);
}

#[test]
fn grouped_aggregate_is_rows() {
    let phone = phone();
    let rows = RowSet::new(["label", "count_all"])
        .with_row([json!("S"), json!(3)])
        .with_row([json!("Z"), json!(1)]);
    let store = MockStore::new().respond(rows.clone());
    let mut query = find(&phone).group_by(phone.label());
    let result = query.aggregate(&store, [Aggregate::count()]).unwrap();
    assert_eq!(result, AggregateResult::Rows(rows));
}

#[test]
fn empty_aggregate_rejected() {
    let store = MockStore::new();
    let mut query = find(&phone());
    assert!(matches!(
        query.aggregate(&store, Vec::<Aggregate>::new()),
        Err(Error::Build(BuildError::EmptyAggregate))
    ));
    assert!(store.executed().is_empty());
}

#[test]
fn set_token_executes_write() {
    let phone = phone();
    let store = MockStore::new();
    let mut query = find(&phone).filter(phone.label().equals("S"));
    query.set_token(&store, [("stress", 2)]).unwrap();

    let executed = store.executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].mode, AccessMode::Write);
    assert!(executed[0].text.ends_with("SET node_phone.stress = $set_stress_1"));
    assert_eq!(query.mutation().token_properties.get("stress"), Some(&json!(2)));
}

#[test]
fn set_type_executes_write() {
    let phone = phone();
    let store = MockStore::new();
    let mut query = find(&phone);
    query.set_type(&store, [("manner", "stop")]).unwrap();
    assert!(
        store.executed()[0]
            .text
            .contains("MATCH (node_phone)-[:is_a]->(type_phone:phone_type)")
    );
}

#[test]
fn delete_matches_read_prefix() {
    let phone = phone();
    let store = MockStore::new();
    let mut query = find(&phone).filter(phone.id().equals("p1"));
    let read = query.statement().unwrap();
    query.delete(&store).unwrap();

    let executed = store.executed();
    assert!(executed[0].text.starts_with(&read.match_section()));
    assert!(executed[0].text.ends_with("DETACH DELETE node_phone"));
    assert!(query.mutation().delete);
}

#[test]
fn chained_writes_do_not_replay() {
    let phone = phone();
    let store = MockStore::new();
    let mut query = find(&phone);
    query.set_type(&store, [("manner", "stop")]).unwrap();
    query.set_token(&store, [("stress", 1)]).unwrap();
    query.delete(&store).unwrap();

    let executed = store.executed();
    assert_eq!(executed.len(), 3);
    assert!(executed[0].text.ends_with("SET type_phone.manner = $set_manner_0"));
    assert!(executed[1].text.ends_with("SET node_phone.stress = $set_stress_0"));
    assert!(!executed[1].text.contains("manner"));
    assert_eq!(executed[1].params.len(), 1);
    assert!(executed[2].text.ends_with("DETACH DELETE node_phone"));
    assert!(executed[2].params.is_empty());
    assert!(query.mutation().token_properties.is_empty());
}

#[test]
fn rejected_write_leaves_query_usable() {
    let phone = phone();
    let store = MockStore::new();
    let mut query = find(&phone);
    assert!(query.set_token(&store, [("id", "p9")]).is_err());
    assert_eq!(query.mutation(), &Mutation::default());

    query.delete(&store).unwrap();
    query.set_token(&store, [("stress", 1)]).unwrap();
    let executed = store.executed();
    assert_eq!(executed.len(), 2);
    assert!(executed[1].text.ends_with("SET node_phone.stress = $set_stress_0"));
    assert!(!query.mutation().delete);
}

#[test]
fn staged_update_is_not_combined_with_delete() {
    let phone = phone();
    let store = MockStore::new();
    let mut query = find(&phone).with_token_update([("stress", 1)]);
    query.delete(&store).unwrap();
    assert!(store.executed()[0].text.ends_with("DETACH DELETE node_phone"));
}

#[test]
fn rejected_aggregate_is_not_stored() {
    let phone = phone();
    let store = MockStore::new();
    let mut query = find(&phone).order_by(phone.label(), false);
    assert!(matches!(
        query.aggregate(&store, [Aggregate::count()]),
        Err(Error::Build(BuildError::OrderByUnknownColumn { .. }))
    ));
    assert!(query.aggregates().is_empty());

    query.all(&store).unwrap();
    let executed = store.executed();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].text.contains("node_phone.label AS label"));
    assert!(!executed[0].text.contains("count(*)"));
}

#[test]
fn store_errors_pass_through() {
    let store = MockStore::failing("connection refused");
    let err = find(&phone()).all(&store).unwrap_err();
    let Error::Execution(source) = &err else {
        panic!("expected execution error, got {err:?}");
    };
    assert_eq!(source.to_string(), "connection refused");
    assert_eq!(
        err.to_string(),
        "statement execution failed: connection refused"
    );
}

#[test]
fn build_errors_skip_the_store() {
    let phone = phone();
    let store = MockStore::new();
    let mut query = find(&phone);
    assert!(matches!(
        query.set_token(&store, [("id", "x")]),
        Err(Error::Build(BuildError::ReadOnlyProperty { .. }))
    ));
    assert!(store.executed().is_empty());
}

#[test]
fn to_csv_hands_rows_to_sink() {
    let rows = RowSet::new(["id", "label"]).with_row([json!("p1"), json!("S")]);
    let store = MockStore::new().respond(rows.clone());
    let mut sink = MemorySink::default();
    find(&phone())
        .to_csv(&store, &mut sink, Path::new("out/phones.csv"))
        .unwrap();
    assert_eq!(sink.saved, [(Path::new("out/phones.csv").to_path_buf(), rows)]);
}

#[test]
fn sink_errors_are_export_errors() {
    let store = MockStore::new();
    let mut sink = MemorySink {
        failure: Some("disk full".to_string()),
        ..MemorySink::default()
    };
    let err = find(&phone())
        .to_csv(&store, &mut sink, Path::new("out.csv"))
        .unwrap_err();
    assert!(matches!(err, Error::Export(_)));
}
