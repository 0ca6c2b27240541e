//! Integration tests for core outcome types.

use prismhelper_core::{Operation, Outcome};

#[test]
fn test_outcome_serializes_as_code_and_message() {
    let outcome = Outcome::new(401, "Invalid credentials provided");
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json, serde_json::json!({"code": 401, "message": "Invalid credentials provided"}));
}

#[test]
fn test_operation_names_match_endpoints() {
    let names: Vec<&str> = Operation::all().iter().map(Operation::name).collect();
    assert_eq!(names, vec!["import", "index"]);
}
