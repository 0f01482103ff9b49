//! Tests for document validation and normalization

use rstest::rstest;
use serde_json::json;

use partyguests::domain::{
    validate, Document, FieldErrorReason, Person, State, Student, ValidationMode,
};

fn sample() -> Document {
    Document::new(
        vec![
            Student::new("Alice", State::Pending).with_friends(vec![
                Person::new("Bob", State::Paid),
                Person::new("Bob", State::Delivered),
            ]),
            Student::new("Dave", State::Delivered),
        ],
        vec![Person::new("Carol", State::Delivered)],
    )
}

#[test]
fn given_valid_document_when_serialized_and_validated_then_round_trips() {
    // Arrange
    let doc = sample();

    // Act
    let value = serde_json::to_value(&doc).unwrap();
    let parsed = validate(&value, ValidationMode::Lenient).unwrap();

    // Assert - field-for-field, order included
    assert_eq!(parsed, doc);
    assert_eq!(parsed.students[0].friends[1].state, State::Delivered);
}

#[test]
fn given_empty_document_when_validating_then_accepts_and_round_trips() {
    // Arrange
    let value = json!({"students": [], "teachers": []});

    // Act
    let doc = validate(&value, ValidationMode::Strict).unwrap();

    // Assert
    assert_eq!(doc, Document::default());
    assert_eq!(serde_json::to_value(&doc).unwrap(), value);
}

#[test]
fn given_shipped_state_when_validating_then_fails_at_record_state() {
    // Arrange
    let value = json!({
        "students": [],
        "teachers": [
            {"name": "Carol", "state": "PAID"},
            {"name": "Eve", "state": "SHIPPED"}
        ]
    });

    // Act
    let err = validate(&value, ValidationMode::Lenient).unwrap_err();

    // Assert
    assert_eq!(err.paths(), vec!["teachers[1].state"]);
    assert!(err.to_string().contains("SHIPPED"));
}

#[test]
fn given_student_without_name_when_validating_then_reports_name_path() {
    // Arrange
    let value = json!({
        "students": [
            {"name": "Alice", "state": "PAID", "friends": []},
            {"name": "Bob", "state": "PAID", "friends": []},
            {"state": "PENDING", "friends": []}
        ],
        "teachers": []
    });

    // Act
    let err = validate(&value, ValidationMode::Lenient).unwrap_err();

    // Assert
    assert_eq!(err.at("students[2].name"), Some(&FieldErrorReason::Missing));
    assert_eq!(err.errors.len(), 1);
}

#[rstest]
#[case(json!({"teachers": []}), "students")]
#[case(json!({"students": []}), "teachers")]
#[case(json!({"students": [], "teachers": [{"name": "Carol"}]}), "teachers[0].state")]
#[case(json!({"students": [{"name": "A", "state": "PAID"}], "teachers": []}), "students[0].friends")]
#[case(json!({"students": [], "teachers": [{"name": "Carol", "state": null}]}), "teachers[0].state")]
#[case(json!({"students": [], "teachers": ["Carol"]}), "teachers[0]")]
#[case(json!("students"), "document")]
fn given_malformed_shape_when_validating_then_reports_path(
    #[case] value: serde_json::Value,
    #[case] expected_path: &str,
) {
    let err = validate(&value, ValidationMode::Lenient).unwrap_err();
    assert_eq!(err.paths(), vec![expected_path]);
}

#[test]
fn given_unknown_fields_when_lenient_then_drops_them() {
    // Arrange
    let value = json!({
        "version": 2,
        "students": [{"name": "Alice", "state": "PAID", "friends": [], "id": "x1"}],
        "teachers": [{"name": "Carol", "state": "PAID", "room": 12}]
    });

    // Act
    let doc = validate(&value, ValidationMode::Lenient).unwrap();

    // Assert - normalized output has only known fields
    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        json!({
            "students": [{"name": "Alice", "state": "PAID", "friends": []}],
            "teachers": [{"name": "Carol", "state": "PAID"}]
        })
    );
}

#[test]
fn given_unknown_fields_when_strict_then_reports_each() {
    // Arrange
    let value = json!({
        "version": 2,
        "students": [{"name": "Alice", "state": "PAID", "friends": [
            {"name": "Bob", "state": "PAID", "age": 9}
        ]}],
        "teachers": []
    });

    // Act
    let err = validate(&value, ValidationMode::Strict).unwrap_err();

    // Assert
    assert_eq!(err.paths(), vec!["version", "students[0].friends[0].age"]);
    assert!(err
        .errors
        .iter()
        .all(|e| e.reason == FieldErrorReason::UnknownField));
}

#[test]
fn given_duplicate_friend_names_when_validating_then_accepts() {
    let value = json!({
        "students": [{"name": "Alice", "state": "PAID", "friends": [
            {"name": "Bob", "state": "PAID"},
            {"name": "Bob", "state": "PAID"}
        ]}],
        "teachers": []
    });

    let doc = validate(&value, ValidationMode::Strict).unwrap();

    assert_eq!(doc.students[0].friends.len(), 2);
}
