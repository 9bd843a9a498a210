use serde_json::json;

use crate::{AlignmentKind, AnnotationType, ClauseElement, CompareOp, Property};

#[test]
fn value_comparison_references_one_annotation() {
    let phone = AnnotationType::new("phone");
    let clause = phone.label().equals("S");
    assert_eq!(clause.annotations(), [&phone]);
    assert_eq!(clause.pattern_annotations(), [&phone]);
}

#[test]
fn path_comparison_references_both() {
    let phone = AnnotationType::new("phone");
    let word = phone.up("word");
    let clause = phone.begin().equals_path(&word.begin());
    assert_eq!(clause.annotations(), [&phone, &word]);
}

#[test]
fn same_annotation_reported_once() {
    let phone = AnnotationType::new("phone");
    let clause = phone.begin().compare_path(CompareOp::Lt, &phone.end());
    assert_eq!(clause.annotations(), [&phone]);
}

#[test]
fn hop_annotations_are_distinct() {
    let phone = AnnotationType::new("phone");
    let clause = phone.following().label().equals("T");
    assert_eq!(clause.annotations(), [&phone.following()]);
}

#[test]
fn contains_binds_only_container() {
    let word = AnnotationType::new("word");
    let phone = AnnotationType::new("phone");
    let clause = ClauseElement::contains(word.clone(), phone.label(), "S");
    assert_eq!(clause.annotations(), [&word, &phone]);
    assert_eq!(clause.pattern_annotations(), [&word]);
}

#[test]
fn alignment_anchor_and_negation() {
    assert_eq!(AlignmentKind::LeftAligned.anchor(), Property::Begin);
    assert_eq!(AlignmentKind::NotRightAligned.anchor(), Property::End);
    assert!(!AlignmentKind::RightAligned.is_negated());
    assert!(AlignmentKind::NotLeftAligned.is_negated());
}

#[test]
fn alignment_has_no_paths() {
    let phone = AnnotationType::new("phone");
    let clause = ClauseElement::aligned(AlignmentKind::LeftAligned, phone.clone(), phone.up("word"));
    assert!(clause.paths().is_empty());
    assert_eq!(clause.annotations().len(), 2);
}

#[test]
fn equal_clauses_share_key() {
    let phone = AnnotationType::new("phone");
    assert_eq!(phone.label().equals("S").key(), phone.label().equals("S").key());
    assert_ne!(phone.label().equals("S").key(), phone.label().equals("Z").key());
    assert_ne!(
        phone.label().equals("S").key(),
        phone.label().not_equals("S").key()
    );
}

#[test]
fn key_is_canonical_text() {
    let phone = AnnotationType::new("phone");
    assert_eq!(phone.label().equals("S").key(), r#""phone"."label" = "S""#);
    assert_eq!(
        phone
            .following()
            .in_discourse("s01")
            .with_type_subset("vowel")
            .begin()
            .compare_path(CompareOp::Lt, &phone.up("word").begin().column_name("wb"))
            .key(),
        r#""phone">#"s01":"vowel"."begin" < "phone"^"word"."begin" as "wb""#
    );
    assert_eq!(
        ClauseElement::aligned(AlignmentKind::NotRightAligned, phone.clone(), phone.up("word"))
            .key(),
        r#""phone" not_right_aligned "phone"^"word""#
    );
}

#[test]
fn key_separates_qualifiers() {
    let phone = AnnotationType::new("phone");
    let keys = [
        phone.label().equals("S").key(),
        phone.label().equals(1).key(),
        phone.label().column_name("l").equals("S").key(),
        phone.clone().in_discourse("s01").label().equals("S").key(),
        phone.clone().with_type_subset("s").label().equals("S").key(),
        phone.clone().with_token_subset("s").label().equals("S").key(),
        phone.up("following").label().equals("S").key(),
        phone.following().label().equals("S").key(),
        phone.property("label.x").equals("S").key(),
    ];
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }

    let vowel_stop = phone.clone().with_type_subset("vowel").with_type_subset("stop");
    let stop_vowel = phone.clone().with_type_subset("stop").with_type_subset("vowel");
    assert_eq!(
        vowel_stop.label().equals("S").key(),
        stop_vowel.label().equals("S").key()
    );
}

#[test]
fn serde_tagged_by_kind() {
    let clause: ClauseElement = serde_json::from_value(json!({
        "kind": "comparison",
        "path": {"annotation": {"origin": "phone", "hops": [{"hop": "following"}]}, "property": "label"},
        "op": "eq",
        "operand": {"value": "T"}
    }))
    .unwrap();
    let phone = AnnotationType::new("phone");
    assert_eq!(clause, phone.following().label().equals("T"));

    let clause: ClauseElement = serde_json::from_value(json!({
        "kind": "alignment",
        "alignment": "not_right_aligned",
        "first": {"origin": "phone"},
        "second": {"origin": "word"}
    }))
    .unwrap();
    assert_eq!(
        clause,
        ClauseElement::aligned(
            AlignmentKind::NotRightAligned,
            phone,
            AnnotationType::new("word")
        )
    );
}
