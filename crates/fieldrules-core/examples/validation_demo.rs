//! Validation demonstration example
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use fieldrules_core::{
    AsValue, Catalog, Describe, Field, Messages, Outcome, RuleSpec, Schema, ValidationResponse,
    Validator, Value,
};
use serde_json::json;

struct Address {
    city: String,
    zip: String,
}

struct Customer {
    name: String,
    email: String,
    age: i64,
    plan: String,
    address: Address,
}

impl Describe for Address {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("City", &self.city).rules("required"),
            Field::new("Zip", &self.zip).check(RuleSpec::regexp("^[0-9]{5}$")),
        ]
    }
}

impl AsValue for Address {
    fn as_value(&self) -> Value<'_> {
        Value::record(self)
    }
}

impl Describe for Customer {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("Name", &self.name).rules("required,min=2"),
            Field::new("Email", &self.email).rules("required,email"),
            Field::new("Age", self.age).rules("min=18,max=130"),
            Field::new("Plan", &self.plan).rules("required,notFree"),
            Field::new("Address", self.address.as_value()),
        ]
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fieldrules Validation Demo ===\n");

    demo_typed_records()?;
    println!();
    demo_json_schema()?;

    Ok(())
}

fn demo_typed_records() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Typed records ---");

    let customer = Customer {
        name: "A".into(),
        email: "not-an-address".into(),
        age: 12,
        plan: "free".into(),
        address: Address {
            city: String::new(),
            zip: "12AB".into(),
        },
    };

    let catalog = Catalog::new().with_language(
        "en",
        Messages::new()
            .with("Customer.Email.error.email", "Please enter a real e-mail address")
            .with("default.error.notFree", "${1} must be a paid plan"),
    );

    let mut validator = Validator::new("Customer").with_provider(catalog);
    validator.register_rule("notFree", |value: &Value<'_>, _param: &str| match value {
        Value::Str(plan) => Outcome::from_bool(plan.as_ref() != "free"),
        _ => Outcome::Unsupported,
    })?;
    validator.enable_translation("en")?;

    match validator.validate(&customer) {
        Ok(()) => println!("   Valid!"),
        Err(errors) => {
            for (path, error) in errors.iter() {
                println!("   {path}: {error}");
            }
        }
    }

    Ok(())
}

fn demo_json_schema() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- JSON documents ---");

    let schema: Schema = serde_json::from_value(json!({
        "module": "Order",
        "fields": {
            "Id": "required",
            "Status": "inList=Unknown",
            "Items": {
                "rules": "min=1",
                "schema": {"fields": {"Sku": "required,len=8", "Qty": "min=1"}}
            }
        }
    }))?;

    let document = json!({
        "Id": "ord-1",
        "Status": "Unknown",
        "Items": [{"Sku": "ABCDEFGH", "Qty": 2}, {"Sku": "short", "Qty": 0}]
    });

    let record = schema.bind(&document)?;
    if let Err(errors) = Validator::new("Order").validate(&record) {
        let response = ValidationResponse::new(&errors);
        println!("   HTTP {}", response.status());
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}
