//! Property-based tests for parsing and validation
//!
//! These tests verify that the parser and the engine behave consistently
//! across a wide range of inputs.

use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};
use fieldrules_core::{
    parse_tags, Describe, Field, RuleRegistry, Schema, Validator,
};

/// Strategy for generating rule clauses from the built-in names
fn clause_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("required".to_string()),
        Just("email".to_string()),
        Just("inList".to_string()),
        (prop_oneof![Just("len"), Just("min"), Just("max")], 0i64..1000)
            .prop_map(|(name, n)| format!("{name}={n}")),
        "[a-z]{1,5}".prop_map(|pattern| format!("regexp=^{pattern}$")),
    ]
}

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(|n| JsonValue::Number(n.into())),
        "[a-zA-Z0-9 ]{0,20}".prop_map(JsonValue::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(JsonValue::Array),
                proptest::collection::hash_map("[a-zA-Z]{1,8}", inner, 0..5)
                    .prop_map(|m| JsonValue::Object(m.into_iter().collect())),
            ]
        },
    )
}

struct Text {
    value: String,
}

impl Describe for Text {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::new("Value", &self.value).rules("required")]
    }
}

fn document_schema() -> Schema {
    serde_yaml::from_str(
        r#"
fields:
  Name: required,min=2
  Count: max=10
  Children:
    schema:
      fields:
        Name: required
        Count: min=1
"#,
    )
    .unwrap()
}

proptest! {
    /// Property: parsing the same rule string twice gives the same tags
    #[test]
    fn prop_parse_is_deterministic(clauses in proptest::collection::vec(clause_strategy(), 1..6)) {
        let registry = RuleRegistry::with_builtins();
        let raw = clauses.join(",");

        let first = parse_tags(&raw, &registry).unwrap();
        let second = parse_tags(&raw, &registry).unwrap();

        prop_assert_eq!(first.len(), clauses.len());
        prop_assert_eq!(first, second);
    }

    /// Property: clauses keep their order and params survive whitespace
    #[test]
    fn prop_clause_order_preserved(clauses in proptest::collection::vec(clause_strategy(), 1..6)) {
        let registry = RuleRegistry::with_builtins();
        let padded: Vec<String> = clauses.iter().map(|c| format!(" {c} ")).collect();
        let tags = parse_tags(&padded.join(","), &registry).unwrap();

        for (tag, clause) in tags.iter().zip(&clauses) {
            let (name, param) = clause.split_once('=').unwrap_or((clause.as_str(), ""));
            prop_assert_eq!(tag.name(), name);
            prop_assert_eq!(tag.param(), param);
        }
    }

    /// Property: escaped commas always end up inside a single param
    #[test]
    fn prop_escaped_commas_stay_in_param(parts in proptest::collection::vec("[a-z]{1,4}", 1..5)) {
        let registry = RuleRegistry::with_builtins();
        let raw = format!("regexp={}", parts.join("\\,"));
        let tags = parse_tags(&raw, &registry).unwrap();

        prop_assert_eq!(tags.len(), 1);
        prop_assert_eq!(tags[0].param(), parts.join(","));
    }

    /// Property: a required string field errors exactly when it is empty
    #[test]
    fn prop_required_matches_emptiness(value in "[a-z]{0,3}") {
        let result = Validator::new("Text").validate(&Text { value: value.clone() });
        match result {
            Ok(()) => prop_assert!(!value.is_empty()),
            Err(errors) => {
                prop_assert!(value.is_empty());
                prop_assert_eq!(errors.len(), 1);
                prop_assert!(errors.contains("Value"));
            }
        }
    }

    /// Property: the engine never panics on arbitrary documents
    #[test]
    fn prop_engine_never_panics(fields in proptest::collection::hash_map(
        prop_oneof![Just("Name"), Just("Count"), Just("Children")],
        json_value_strategy(),
        0..3,
    )) {
        let schema = document_schema();
        let document = json!(fields);
        let record = schema.bind(&document).unwrap();
        let _ = Validator::new("Doc").validate(&record);
    }

    /// Property: fresh validators produce byte-identical serialized errors
    #[test]
    fn prop_validation_is_idempotent(input in json_value_strategy()) {
        let schema = document_schema();
        let document = json!({"Name": input.clone(), "Count": input.clone(), "Children": [input]});
        let record = schema.bind(&document).unwrap();

        let first = Validator::new("Doc").validate(&record).err().unwrap_or_default();
        let second = Validator::new("Doc").validate(&record).err().unwrap_or_default();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
