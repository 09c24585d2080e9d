//! Value views and explicit field descriptors
//!
//! The engine never inspects Rust types directly. A validated type implements
//! [`Describe`] and hands back one [`Field`] per visible member: its name, a
//! borrowed [`Value`] view of the member, the raw rule strings keyed by tag
//! key, and any statically declared [`RuleSpec`]s.
//!
//! ```rust
//! use fieldrules_core::{AsValue, Describe, Field, Value};
//!
//! struct Item {
//!     name: String,
//! }
//!
//! impl Describe for Item {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![Field::new("Name", &self.name).rules("required")]
//!     }
//! }
//!
//! impl AsValue for Item {
//!     fn as_value(&self) -> Value<'_> {
//!         Value::record(self)
//!     }
//! }
//!
//! let item = Item { name: "bolt".into() };
//! assert_eq!(item.as_value().to_string(), "{bolt}");
//! ```
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::rules::RuleSpec;
use crate::tag::DEFAULT_TAG_KEY;

/// A dereferenced view of one field's value
///
/// `Absent` stands for a missing optional or a null pointer. Rules other than
/// `required` treat it as trivially valid.
pub enum Value<'a> {
    Absent,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(Cow<'a, str>),
    Seq(Vec<Value<'a>>),
    /// Entries in iteration order of the source map
    Map(Vec<(Value<'a>, Value<'a>)>),
    Record(Box<dyn Describe + 'a>),
}

impl<'a> Value<'a> {
    /// View a describable value as a nested record
    pub fn record<T: Describe + ?Sized>(record: &'a T) -> Self {
        Value::Record(Box::new(record))
    }

    /// View an optional record, mapping `None` to [`Value::Absent`]
    pub fn optional_record<T: Describe>(record: Option<&'a T>) -> Self {
        record.map_or(Value::Absent, Value::record)
    }

    /// Build a sequence from any iterator of values
    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the value's kind, used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Uint(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

/// Records nested deeper than this print as `{...}`
const PRINT_DEPTH: usize = 8;

/// A value printed with a cap on record nesting, so cyclic records terminate
struct Shallow<'v, 'a> {
    value: &'v Value<'a>,
    depth: usize,
}

impl Shallow<'_, '_> {
    fn nested<'w, 'b>(&self, value: &'w Value<'b>) -> Shallow<'w, 'b> {
        Shallow {
            value,
            depth: self.depth + 1,
        }
    }

    fn elided(&self) -> bool {
        matches!(self.value, Value::Record(_)) && self.depth >= PRINT_DEPTH
    }
}

impl fmt::Display for Shallow<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elided() {
            return f.write_str("{...}");
        }
        match self.value {
            Value::Absent => f.write_str("<nil>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", self.nested(item))?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", self.nested(key), self.nested(value))?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                f.write_str("{")?;
                for (i, field) in record.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", self.nested(field.value()))?;
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Debug for Shallow<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elided() {
            return f.write_str("{...}");
        }
        match self.value {
            Value::Absent => f.write_str("Absent"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Seq(items) => f
                .debug_list()
                .entries(items.iter().map(|item| self.nested(item)))
                .finish(),
            Value::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (self.nested(k), self.nested(v))))
                .finish(),
            Value::Record(record) => {
                let mut map = f.debug_map();
                for field in record.fields() {
                    map.entry(&field.name(), &self.nested(field.value()));
                }
                map.finish()
            }
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Shallow { value: self, depth: 0 }, f)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Shallow { value: self, depth: 0 }, f)
    }
}

macro_rules! impl_from_number {
    ($variant:ident, $target:ty; $($source:ty),*) => {
        $(
            impl From<$source> for Value<'_> {
                fn from(n: $source) -> Self {
                    Value::$variant(n as $target)
                }
            }

            impl AsValue for $source {
                fn as_value(&self) -> Value<'_> {
                    Value::from(*self)
                }
            }
        )*
    };
}

impl_from_number!(Int, i64; i8, i16, i32, i64, isize);
impl_from_number!(Uint, u64; u8, u16, u32, u64, usize);
impl_from_number!(Float, f64; f32, f64);

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Str(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Str(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Value::Str(s)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Absent, Into::into)
    }
}

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    fn from(items: Vec<Value<'a>>) -> Self {
        Value::Seq(items)
    }
}

/// Borrow a [`Value`] view of `self`
///
/// Implemented for primitives, strings, options, sequences and maps. Record
/// types implement it by returning [`Value::record`].
pub trait AsValue {
    fn as_value(&self) -> Value<'_>;
}

impl AsValue for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl AsValue for str {
    fn as_value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self.as_str()))
    }
}

impl<T: AsValue + ?Sized> AsValue for &T {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Box<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.as_value(),
            None => Value::Absent,
        }
    }
}

impl<T: AsValue> AsValue for [T] {
    fn as_value(&self) -> Value<'_> {
        Value::Seq(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(&self) -> Value<'_> {
        self.as_slice().as_value()
    }
}

impl<K: AsValue, V: AsValue, S> AsValue for HashMap<K, V, S> {
    fn as_value(&self) -> Value<'_> {
        Value::Map(self.iter().map(|(k, v)| (k.as_value(), v.as_value())).collect())
    }
}

impl<K: AsValue, V: AsValue> AsValue for BTreeMap<K, V> {
    fn as_value(&self) -> Value<'_> {
        Value::Map(self.iter().map(|(k, v)| (k.as_value(), v.as_value())).collect())
    }
}

/// A type whose fields can be walked by the validator
pub trait Describe {
    /// The visible fields, in declaration order
    fn fields(&self) -> Vec<Field<'_>>;
}

impl<T: Describe + ?Sized> Describe for &T {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

/// One field descriptor returned by [`Describe::fields`]
#[derive(Debug)]
pub struct Field<'a> {
    name: Cow<'a, str>,
    value: Value<'a>,
    tags: Vec<(Cow<'a, str>, Cow<'a, str>)>,
    specs: Vec<RuleSpec>,
}

impl<'a> Field<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: impl Into<Value<'a>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            tags: Vec::new(),
            specs: Vec::new(),
        }
    }

    /// Attach a rule string under the default `validate` key
    pub fn rules(self, rules: impl Into<Cow<'a, str>>) -> Self {
        self.tag(DEFAULT_TAG_KEY, rules)
    }

    /// Attach a rule string under an arbitrary tag key, replacing any
    /// previous string for that key
    pub fn tag(mut self, key: impl Into<Cow<'a, str>>, rules: impl Into<Cow<'a, str>>) -> Self {
        let key = key.into();
        let rules = rules.into();
        match self.tags.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = rules,
            None => self.tags.push((key, rules)),
        }
        self
    }

    /// Attach a statically declared rule
    pub fn check(mut self, spec: RuleSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn checks(mut self, specs: impl IntoIterator<Item = RuleSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value<'a> {
        &self.value
    }

    /// The raw rule string for `key`, if one was attached
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, rules)| rules.as_ref())
    }

    pub fn specs(&self) -> &[RuleSpec] {
        &self.specs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
        y: i32,
    }

    impl Describe for Point {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![Field::new("X", self.x), Field::new("Y", self.y)]
        }
    }

    #[test]
    fn test_display_matches_go_style() {
        assert_eq!(Value::Absent.to_string(), "<nil>");
        assert_eq!(Value::from(1.5f64).to_string(), "1.5");
        assert_eq!(Value::from(3.0f64).to_string(), "3");
        assert_eq!(Value::from("Unknown").to_string(), "Unknown");
        assert_eq!(vec![1, 2, 3].as_value().to_string(), "[1 2 3]");

        let mut map = BTreeMap::new();
        map.insert("a", 1u8);
        map.insert("b", 2u8);
        assert_eq!(map.as_value().to_string(), "map[a:1 b:2]");

        let point = Point { x: 1, y: -2 };
        assert_eq!(Value::record(&point).to_string(), "{1 -2}");
    }

    struct Cycle;

    impl Describe for Cycle {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![Field::new("Me", Value::record(self))]
        }
    }

    #[test]
    fn test_cyclic_record_prints_to_bounded_depth() {
        let expected = format!("{}{{...}}{}", "{".repeat(PRINT_DEPTH), "}".repeat(PRINT_DEPTH));
        assert_eq!(Value::record(&Cycle).to_string(), expected);

        let debug = format!("{:?}", Value::record(&Cycle));
        assert!(debug.ends_with("{...}}}}}}}}}"));
    }

    #[test]
    fn test_number_conversions() {
        assert!(matches!(Value::from(-4i8), Value::Int(-4)));
        assert!(matches!(Value::from(7usize), Value::Uint(7)));
        assert!(matches!(2.5f32.as_value(), Value::Float(x) if x == 2.5));
    }

    #[test]
    fn test_options_map_to_absent() {
        let missing: Option<String> = None;
        assert!(missing.as_value().is_absent());
        assert!(Value::from(None::<&str>).is_absent());
        assert!(Value::optional_record(None::<&Point>).is_absent());
        assert_eq!(Some("x".to_string()).as_value().to_string(), "x");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Absent.kind(), "absent");
        assert_eq!(Value::from(true).kind(), "bool");
        assert_eq!(Value::seq([1, 2]).kind(), "sequence");
        assert_eq!(Value::record(&Point { x: 0, y: 0 }).kind(), "record");
    }

    #[test]
    fn test_field_tags() {
        let field = Field::new("Name", "bob")
            .rules("required")
            .tag("json", "name")
            .rules("required,min=2");

        assert_eq!(field.name(), "Name");
        assert_eq!(field.tag_value("validate"), Some("required,min=2"));
        assert_eq!(field.tag_value("json"), Some("name"));
        assert_eq!(field.tag_value("missing"), None);
        assert!(field.specs().is_empty());
    }

    #[test]
    fn test_field_specs() {
        let field = Field::new("Age", 30u8)
            .check(RuleSpec::required())
            .checks([RuleSpec::min("18"), RuleSpec::max("120")]);

        let names: Vec<_> = field.specs().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["required", "min", "max"]);
    }
}
