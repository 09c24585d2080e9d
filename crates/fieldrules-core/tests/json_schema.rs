//! Validating untyped JSON documents through a rule schema

use std::io::Write;

use fieldrules_core::{Error, FieldSchema, Schema, ValidationResponse, Validator};
use serde_json::json;
use tempfile::NamedTempFile;

const ORDER_SCHEMA: &str = r#"
module: Order
fields:
  Id: required,len=8
  Email: required,email
  Status: inList=Cancelled
  Items:
    rules: min=1
    schema:
      fields:
        Name: required
        Qty: min=1,max=100
  Meta:
    schema:
      fields:
        Source: required
  Notes:
    tags:
      validate: "-"
"#;

fn order_schema() -> Schema {
    serde_yaml::from_str(ORDER_SCHEMA).unwrap()
}

fn validate(schema: &Schema, document: &serde_json::Value) -> Result<(), fieldrules_core::Errors> {
    let record = schema.bind(document).unwrap();
    let module = schema.module.as_deref().unwrap_or("Document");
    Validator::new(module).validate(&record)
}

#[cfg(test)]
mod documents {
    use super::*;

    #[test]
    fn test_valid_document() {
        let document = json!({
            "Id": "ORD-0001",
            "Email": "buyer@example.com",
            "Status": "Paid",
            "Items": [{"Name": "bolt", "Qty": 3}],
            "Meta": {"Source": "web"},
            "Notes": null
        });
        assert!(validate(&order_schema(), &document).is_ok());
    }

    #[test]
    fn test_invalid_document_paths() {
        let document = json!({
            "Email": "buyer",
            "Status": "Cancelled",
            "Items": [{"Name": "bolt", "Qty": 3}, {"Qty": 0}],
            "Meta": {"Source": ""}
        });
        let errors = validate(&order_schema(), &document).unwrap_err();

        assert_eq!(
            errors.paths().collect::<Vec<_>>(),
            vec![
                "Id",
                "Email",
                "Status",
                "Items[1].Name",
                "Items[1].Qty",
                "Meta.Source",
            ]
        );
        let map = errors.to_map();
        assert_eq!(map["Id"], "Order Id cannot be blank");
        assert_eq!(map["Status"], "Order Cancelled is not contained within the list Cancelled");
        assert_eq!(map["Items[1].Name"], "Items[1] Name cannot be blank");
        assert_eq!(map["Meta.Source"], "Meta Source cannot be blank");
    }

    #[test]
    fn test_empty_sequence_fails_min() {
        let document = json!({
            "Id": "ORD-0001",
            "Email": "buyer@example.com",
            "Items": []
        });
        let errors = validate(&order_schema(), &document).unwrap_err();
        assert_eq!(errors.to_map()["Items"], "Order [] is less than minimum value 1");
    }

    #[test]
    fn test_objects_without_schema_are_maps() {
        let schema = Schema::new().field("Labels", FieldSchema::rules("max=1"));
        let document = json!({"Labels": {"a": "x", "b": "y"}});
        let errors = validate(&schema, &document).unwrap_err();
        assert_eq!(
            errors.to_map()["Labels"],
            "Document map[a:x b:y] exceeds maximum value 1"
        );
    }

    #[test]
    fn test_numbers_keep_their_kind() {
        let schema = Schema::new()
            .field("Count", FieldSchema::rules("min=0x10"))
            .field("Ratio", FieldSchema::rules("max=0.5"));
        let document = json!({"Count": 15, "Ratio": 0.75});
        let errors = validate(&schema, &document).unwrap_err();

        assert_eq!(errors.to_map()["Count"], "Document 15 is less than minimum value 0x10");
        assert_eq!(errors.to_map()["Ratio"], "Document 0.75 exceeds maximum value 0.5");
    }

    #[test]
    fn test_top_level_must_be_an_object() {
        assert_eq!(
            order_schema().bind(&json!("text")).unwrap_err(),
            Error::UnsupportedValue { kind: "string" }
        );
    }

    #[test]
    fn test_response_envelope() {
        let document = json!({"Id": "ORD-0001", "Email": "", "Items": [{"Name": "x", "Qty": 1}]});
        let errors = validate(&order_schema(), &document).unwrap_err();

        assert_eq!(
            serde_json::to_value(ValidationResponse::new(&errors)).unwrap(),
            json!({
                "message": "Validation Error(s)",
                "errors": {"Email": "Order Email cannot be blank"}
            })
        );
    }
}

#[cfg(test)]
mod schema_files {
    use super::*;

    #[test]
    fn test_load_schema_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"module": "Signup", "fields": {{"Email": "required,email", "Nick": {{"rules": "min=3"}}}}}}"#
        )
        .unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let schema: Schema = serde_json::from_str(&content).unwrap();

        assert_eq!(schema.module.as_deref(), Some("Signup"));
        let errors = validate(&schema, &json!({"Email": "a@example.com", "Nick": "ab"})).unwrap_err();
        assert_eq!(errors.to_map()["Nick"], "Signup ab is less than minimum value 3");
    }
}
