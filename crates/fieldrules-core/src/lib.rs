//! Fieldrules Core - declarative validation of nested records
//!
//! Validated types describe their fields explicitly and attach short rule
//! strings to them. The validator walks the value, runs each field's rules,
//! descends into nested records, sequences and maps, and returns a flat map
//! of field path to human-readable error.
//!
//! ## Features
//!
//! - **Rule strings**: `required,min=3,max=20`, with `\,` for literal commas
//! - **Built-in rules**: `required`, `len`, `min`, `max`, `email`, `regexp`, `inList`
//! - **Custom rules**: any `Fn(&Value, &str) -> Outcome` can be registered
//! - **Nested paths**: `Items[1].Name`, `Tags[color](value)`
//! - **Layered messages**: field-specific and module-default translations,
//!   falling back to built-in templates
//! - **Untyped documents**: [`Schema`] attaches rules to JSON objects
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldrules_core::{AsValue, Describe, Field, ValidationResponse, Validator, Value};
//!
//! struct Item {
//!     name: String,
//!     qty: u32,
//! }
//!
//! struct Order {
//!     email: String,
//!     items: Vec<Item>,
//! }
//!
//! impl Describe for Item {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::new("Name", &self.name).rules("required"),
//!             Field::new("Qty", self.qty).rules("min=1"),
//!         ]
//!     }
//! }
//!
//! impl AsValue for Item {
//!     fn as_value(&self) -> Value<'_> {
//!         Value::record(self)
//!     }
//! }
//!
//! impl Describe for Order {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::new("Email", &self.email).rules("required,email"),
//!             Field::new("Items", self.items.as_value()).rules("min=1"),
//!         ]
//!     }
//! }
//!
//! let order = Order {
//!     email: "buyer@example.com".into(),
//!     items: vec![
//!         Item { name: "bolt".into(), qty: 10 },
//!         Item { name: String::new(), qty: 1 },
//!     ],
//! };
//!
//! let mut validator = Validator::new("Order");
//! let errors = validator.validate(&order).unwrap_err();
//!
//! assert_eq!(errors.to_map()["Items[1].Name"], "Items[1] Name cannot be blank");
//! let body = serde_json::to_value(ValidationResponse::new(&errors)).unwrap();
//! assert_eq!(body["message"], "Validation Error(s)");
//! ```
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod message;
pub mod report;
pub mod rules;
pub mod schema;
pub mod tag;
pub mod validator;
pub mod value;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use message::{format_message, Catalog, MessageProvider, MessageResolver, Messages, NoTranslations};
pub use report::{Errors, FieldError, ValidationResponse, VALIDATION_MESSAGE};
pub use rules::{Outcome, Rule, RuleRegistry, RuleSpec};
pub use schema::{FieldSchema, JsonRecord, Schema};
pub use tag::{parse_specs, parse_tags, Tag, TagError, DEFAULT_TAG_KEY, SKIP_FIELD};
pub use validator::{Validator, DEFAULT_MAX_DEPTH};
pub use value::{AsValue, Describe, Field, Value};
