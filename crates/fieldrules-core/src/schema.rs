//! Rule schemas for untyped JSON documents
//!
//! A [`Schema`] lists the fields of a JSON object, in order, with the rule
//! strings that apply to each. Binding it to a document yields a
//! [`JsonRecord`] the validator can walk like any other [`Describe`] value.
//!
//! ```yaml
//! module: Order
//! fields:
//!   Id: required
//!   Email: required,email
//!   Items:
//!     schema:
//!       fields:
//!         Name: required
//!         Qty: min=1
//!   Notes:
//!     tags:
//!       validate: "-"
//! ```
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::{Error, Result};
use crate::tag::DEFAULT_TAG_KEY;
use crate::value::{Describe, Field, Value};

/// Fields of one JSON object and their rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Module name used for messages at the top level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default)]
    pub fields: Fields,
}

/// Ordered field name to rules map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, FieldSchema)>);

/// Rules for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSchema {
    /// A bare rule string, read under the `validate` key
    Rules(String),
    Detailed {
        /// Shorthand for `tags.validate`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rules: Option<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        tags: BTreeMap<String, String>,
        /// Schema for object values, or for the objects inside an array
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<Box<Schema>>,
    },
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Append a field, replacing an existing field of the same name in place
    pub fn field(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// View `document` as a record described by this schema
    pub fn bind<'a>(&'a self, document: &'a JsonValue) -> Result<JsonRecord<'a>> {
        match document {
            JsonValue::Object(object) => Ok(JsonRecord::new(self, object)),
            other => Err(Error::UnsupportedValue {
                kind: json_kind(other),
            }),
        }
    }
}

impl Fields {
    pub fn insert(&mut self, name: String, field: FieldSchema) {
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = field,
            None => self.0.push((name, field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.0.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, field) in &self.0 {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to rules")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Fields, A::Error> {
                let mut fields = Fields::default();
                while let Some((name, field)) = access.next_entry::<String, FieldSchema>()? {
                    fields.insert(name, field);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

impl FieldSchema {
    pub fn rules(rules: impl Into<String>) -> Self {
        Self::Rules(rules.into())
    }

    /// Rules plus a schema for nested objects
    pub fn nested(rules: impl Into<String>, schema: Schema) -> Self {
        let rules = rules.into();
        Self::Detailed {
            rules: (!rules.is_empty()).then_some(rules),
            tags: BTreeMap::new(),
            schema: Some(Box::new(schema)),
        }
    }

    /// Rule strings keyed by tag key
    pub fn tags(&self) -> Vec<(&str, &str)> {
        match self {
            Self::Rules(rules) => vec![(DEFAULT_TAG_KEY, rules.as_str())],
            Self::Detailed { rules, tags, .. } => {
                let mut all: Vec<(&str, &str)> = tags
                    .iter()
                    .map(|(key, rules)| (key.as_str(), rules.as_str()))
                    .collect();
                if let Some(rules) = rules {
                    if !tags.contains_key(DEFAULT_TAG_KEY) {
                        all.push((DEFAULT_TAG_KEY, rules.as_str()));
                    }
                }
                all
            }
        }
    }

    pub fn schema(&self) -> Option<&Schema> {
        match self {
            Self::Rules(_) => None,
            Self::Detailed { schema, .. } => schema.as_deref(),
        }
    }
}

/// A JSON object viewed through a [`Schema`]
///
/// Only the fields named by the schema are visited; a field missing from
/// the object is absent.
#[derive(Debug, Clone, Copy)]
pub struct JsonRecord<'a> {
    schema: &'a Schema,
    object: &'a JsonMap<String, JsonValue>,
}

impl<'a> JsonRecord<'a> {
    pub fn new(schema: &'a Schema, object: &'a JsonMap<String, JsonValue>) -> Self {
        Self { schema, object }
    }
}

impl Describe for JsonRecord<'_> {
    fn fields(&self) -> Vec<Field<'_>> {
        self.schema
            .fields
            .iter()
            .map(|(name, spec)| {
                let value = self
                    .object
                    .get(name)
                    .map_or(Value::Absent, |v| json_value(v, spec.schema()));
                spec.tags()
                    .into_iter()
                    .fold(Field::new(name, value), |field, (key, rules)| field.tag(key, rules))
            })
            .collect()
    }
}

/// Convert a JSON value, attaching `schema` to objects so they become records
pub fn json_value<'a>(value: &'a JsonValue, schema: Option<&'a Schema>) -> Value<'a> {
    match value {
        JsonValue::Null => Value::Absent,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::Uint(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::Str(Cow::Borrowed(s)),
        JsonValue::Array(items) => Value::Seq(items.iter().map(|item| json_value(item, schema)).collect()),
        JsonValue::Object(object) => match schema {
            Some(schema) => Value::Record(Box::new(JsonRecord::new(schema, object))),
            None => Value::Map(
                object
                    .iter()
                    .map(|(k, v)| (Value::Str(Cow::Borrowed(k)), json_value(v, None)))
                    .collect(),
            ),
        },
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
