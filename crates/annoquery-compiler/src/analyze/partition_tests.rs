use annoquery_core::{AlignmentKind, AnnotationType, ClauseElement, CompareOp, Hierarchy};

use super::{Context, LevelId, Levels, Partition, References, Route};
use crate::compile::CompileError;

fn partition(to_find: &AnnotationType, criteria: &[ClauseElement]) -> Result<(Levels, Partition), CompileError> {
    let h = Hierarchy::new(["phone", "word", "utterance"]);
    let ctx = Context::new(&h, to_find, criteria)?;
    let refs = References {
        criteria,
        ..Default::default()
    };
    let levels = Levels::resolve(&ctx, &refs)?;
    let partition = Partition::new(&ctx, &levels, criteria)?;
    Ok((levels, partition))
}

#[test]
fn routes_by_property_kind() {
    let phone = AnnotationType::new("phone");
    let criteria = [
        phone.id().equals("p1"),
        phone.begin().greater_than(0.5),
        phone.discourse().equals("s01"),
        phone.label().equals("S"),
        phone.property("cog").less_than(4000),
    ];
    let (_, partition) = partition(&phone, &criteria).unwrap();
    assert_eq!(
        partition.routes(),
        [
            Route::Identity(LevelId::ROOT),
            Route::Anchor(LevelId::ROOT),
            Route::Anchor(LevelId::ROOT),
            Route::Property(LevelId::ROOT),
            Route::Property(LevelId::ROOT),
        ]
    );
    assert_eq!(partition.inline(LevelId::ROOT).count(), 3);
    assert_eq!(partition.filters().count(), 2);
    assert_eq!(partition.relationships().count(), 0);
}

#[test]
fn anchor_criteria_never_filter() {
    let phone = AnnotationType::new("phone");
    let criteria = [
        phone.begin().greater_than(0.5),
        phone.end().less_than(1.0),
        phone.duration().greater_than(0.05),
        phone.following().begin().greater_than(0.5),
    ];
    let (_, partition) = partition(&phone, &criteria).unwrap();
    assert_eq!(partition.filters().count(), 0);
}

#[test]
fn same_level_path_comparison_stays_inline() {
    let phone = AnnotationType::new("phone");
    let criteria = [phone.begin().compare_path(CompareOp::Lt, &phone.end())];
    let (_, partition) = partition(&phone, &criteria).unwrap();
    assert_eq!(partition.route(0), Route::Anchor(LevelId::ROOT));
}

#[test]
fn cross_level_comparison_is_relationship() {
    let phone = AnnotationType::new("phone");
    let criteria = [phone.begin().equals_path(&phone.up("word").begin())];
    let (levels, partition) = partition(&phone, &criteria).unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(partition.relationships().collect::<Vec<_>>(), [0]);
}

#[test]
fn alignments_are_independent_relationships() {
    let phone = AnnotationType::new("phone");
    let word = phone.up("word");
    let criteria = [
        ClauseElement::aligned(AlignmentKind::LeftAligned, phone.clone(), word.clone()),
        ClauseElement::aligned(AlignmentKind::NotRightAligned, phone.clone(), word),
    ];
    let (levels, partition) = partition(&phone, &criteria).unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(partition.relationships().collect::<Vec<_>>(), [0, 1]);
}

#[test]
fn contains_is_relationship() {
    let word = AnnotationType::new("word");
    let criteria = [ClauseElement::contains(
        word.clone(),
        AnnotationType::new("phone").label(),
        "S",
    )];
    let (levels, partition) = partition(&word, &criteria).unwrap();
    assert_eq!(levels.len(), 1);
    assert_eq!(partition.route(0), Route::Relationship);
}

#[test]
fn contains_rejects_duration() {
    let word = AnnotationType::new("word");
    let criteria = [ClauseElement::contains(
        word.clone(),
        AnnotationType::new("phone").duration(),
        0.1,
    )];
    assert_eq!(
        partition(&word, &criteria).unwrap_err(),
        CompileError::UnsupportedContainsProperty {
            property: "duration".to_string()
        }
    );
}

#[test]
fn contains_requires_lower_level() {
    let word = AnnotationType::new("word");
    let criteria = [ClauseElement::contains(
        word.clone(),
        AnnotationType::new("utterance").label(),
        "hello",
    )];
    assert!(matches!(
        partition(&word, &criteria),
        Err(CompileError::UnreachableAnnotation { .. })
    ));
}
