use annoquery_core::AnnotationType;

use super::{DiscourseScope, discourse_literal};
use crate::compile::CompileError;

#[test]
fn empty_without_discourse() {
    let phone = AnnotationType::new("phone");
    let scope = DiscourseScope::collect(&phone, &[phone.label().equals("S")]).unwrap();
    assert_eq!(scope.discourse(), None);
    assert_eq!(scope.apply(phone.following()).unwrap(), phone.following());
}

#[test]
fn taken_from_root_label() {
    let phone = AnnotationType::new("phone").in_discourse("s01");
    let scope = DiscourseScope::collect(&phone, &[]).unwrap();
    assert_eq!(scope.discourse(), Some("s01"));
}

#[test]
fn taken_from_equality_criterion() {
    let phone = AnnotationType::new("phone");
    let scope = DiscourseScope::collect(&phone, &[phone.discourse().equals("s02")]).unwrap();
    assert_eq!(scope.discourse(), Some("s02"));

    let scope = DiscourseScope::collect(&phone, &[phone.discourse().in_set(["s03"])]).unwrap();
    assert_eq!(scope.discourse(), Some("s03"));
}

#[test]
fn multi_valued_criterion_does_not_scope() {
    let phone = AnnotationType::new("phone");
    let criteria = [phone.discourse().in_set(["s01", "s02"])];
    let scope = DiscourseScope::collect(&phone, &criteria).unwrap();
    assert_eq!(scope.discourse(), None);
}

#[test]
fn neighbour_criterion_does_not_scope() {
    let phone = AnnotationType::new("phone");
    let criteria = [phone.following().discourse().equals("s01")];
    let scope = DiscourseScope::collect(&phone, &criteria).unwrap();
    assert_eq!(scope.discourse(), None);
}

#[test]
fn conflicting_criteria() {
    let phone = AnnotationType::new("phone");
    let criteria = [
        phone.discourse().equals("s01"),
        phone.discourse().equals("s02"),
    ];
    let err = DiscourseScope::collect(&phone, &criteria).unwrap_err();
    assert_eq!(
        err,
        CompileError::ConflictingDiscourse {
            first: "s01".to_string(),
            second: "s02".to_string(),
        }
    );
}

#[test]
fn root_label_conflicts_with_criterion() {
    let phone = AnnotationType::new("phone").in_discourse("s01");
    let criteria = [phone.discourse().equals("s02")];
    assert!(DiscourseScope::collect(&phone, &criteria).is_err());
}

#[test]
fn apply_stamps_every_unlabelled_type() {
    let phone = AnnotationType::new("phone").in_discourse("s01");
    let scope = DiscourseScope::collect(&phone, &[]).unwrap();
    let word = AnnotationType::new("phone").up("word");
    assert_eq!(scope.apply(word.clone()).unwrap(), word.in_discourse("s01"));
}

#[test]
fn apply_rejects_other_label() {
    let phone = AnnotationType::new("phone").in_discourse("s01");
    let scope = DiscourseScope::collect(&phone, &[]).unwrap();
    let other = AnnotationType::new("phone").following().in_discourse("s09");
    assert!(matches!(
        scope.apply(other),
        Err(CompileError::ConflictingDiscourse { .. })
    ));
}

#[test]
fn taken_from_labelled_root_criterion() {
    let phone = AnnotationType::new("phone");
    let criteria = [phone.clone().in_discourse("s01").label().equals("S")];
    let scope = DiscourseScope::collect(&phone, &criteria).unwrap();
    assert_eq!(scope.discourse(), Some("s01"));
}

#[test]
fn labelled_root_criterion_conflicts_with_scope() {
    let phone = AnnotationType::new("phone");
    let criteria = [
        phone.discourse().equals("s01"),
        phone.clone().in_discourse("s02").label().equals("S"),
    ];
    assert_eq!(
        DiscourseScope::collect(&phone, &criteria).unwrap_err(),
        CompileError::ConflictingDiscourse {
            first: "s01".to_string(),
            second: "s02".to_string(),
        }
    );
}

#[test]
fn single_valued_literals() {
    let phone = AnnotationType::new("phone").following();
    assert_eq!(discourse_literal(&phone.discourse().equals("s01")), Some("s01"));
    assert_eq!(discourse_literal(&phone.discourse().in_set(["s02"])), Some("s02"));
    assert_eq!(discourse_literal(&phone.discourse().in_set(["s01", "s02"])), None);
    assert_eq!(discourse_literal(&phone.discourse().not_equals("s01")), None);
    assert_eq!(discourse_literal(&phone.label().equals("s01")), None);
}
