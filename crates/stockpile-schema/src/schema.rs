//! # Schemas
//!
//! A [`Schema`] is the immutable description of one request shape: its
//! fields in declaration order, how each raw value is coerced, whether the
//! field may be omitted, and the rules that must hold.
//!
//! Schemas are assembled with [`SchemaBuilder`]. Declaring a field returns a
//! [`FieldBuilder`]; finishing it with [`FieldBuilder::id`] yields a
//! [`FieldRef`] that later fields' predicates can use to read the value.
//!
//! ```
//! use stockpile_schema::{Predicate, Rule, SchemaBuilder};
//!
//! let mut b = SchemaBuilder::new("Shipment");
//! let express = b
//!     .field("express")
//!     .optional()
//!     .rule(Rule::boolean("express must be a boolean"))
//!     .id();
//! b.field("courier")
//!     .when(Predicate::equals(express, true))
//!     .rule(Rule::required("courier is required for express shipments"));
//! let schema = b.build();
//! assert_eq!(schema.len(), 2);
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::candidate::Validated;
use crate::engine;
use crate::error::FieldErrors;
use crate::rule::{Predicate, Rule};

/// Index of a field inside the schema that declared it.
///
/// Only meaningful for that schema; a `FieldRef` from another schema reads
/// as an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldRef(usize);

impl FieldRef {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the field in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Type conversion applied to a present, non-null raw value before any rule
/// runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coercion {
    /// Decimal string or integral number to a JSON integer.
    Integer {
        /// Violation recorded when the value cannot be converted.
        message: String,
    },
    /// Integral JSON number (`10` or `10.0`) to a JSON integer. Strings are
    /// rejected, for body fields whose clients send typed JSON.
    WholeNumber {
        /// Violation recorded when the value cannot be converted.
        message: String,
    },
    /// `"true"`/`"false"` (any case) or a JSON boolean to a JSON boolean.
    Boolean {
        /// Violation recorded when the value cannot be converted.
        message: String,
    },
    /// Strip surrounding whitespace from strings. Other values pass through.
    Trim,
}

impl Coercion {
    /// Integer coercion with the given failure message.
    pub fn integer(message: impl Into<String>) -> Self {
        Self::Integer {
            message: message.into(),
        }
    }

    /// Number-only integer coercion with the given failure message.
    pub fn whole_number(message: impl Into<String>) -> Self {
        Self::WholeNumber {
            message: message.into(),
        }
    }

    /// Boolean coercion with the given failure message.
    pub fn boolean(message: impl Into<String>) -> Self {
        Self::Boolean {
            message: message.into(),
        }
    }

    /// Convert `value`, or return the violation message.
    pub fn apply(&self, value: &Value) -> Result<Value, String> {
        match self {
            Self::Integer { message } => coerce_integer(value).ok_or_else(|| message.clone()),
            Self::WholeNumber { message } => match value {
                Value::Number(_) => coerce_integer(value).ok_or_else(|| message.clone()),
                _ => Err(message.clone()),
            },
            Self::Boolean { message } => coerce_boolean(value).ok_or_else(|| message.clone()),
            Self::Trim => Ok(match value {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other.clone(),
            }),
        }
    }
}

fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Value::from(i));
            }
            let f = n.as_f64()?;
            if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                Some(Value::from(f as i64))
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn coerce_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(b) => Some(Value::Bool(*b)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    coercion: Option<Coercion>,
    optional: bool,
    activation: Option<Predicate>,
    rules: Vec<Rule>,
}

impl FieldSpec {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            coercion: None,
            optional: false,
            activation: None,
            rules: Vec::new(),
        }
    }

    /// Wire name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coercion applied before rules, if any.
    pub fn coercion(&self) -> Option<&Coercion> {
        self.coercion.as_ref()
    }

    /// Whether an absent or `null` value skips every rule of the field.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Predicate gating every rule of the field, if any.
    pub fn activation(&self) -> Option<&Predicate> {
        self.activation.as_ref()
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Immutable, named, ordered collection of field specs.
#[derive(Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Schema name, used in logs and the registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up the handle of a declared field.
    pub fn field_ref(&self, name: &str) -> Option<FieldRef> {
        self.fields.iter().position(|f| f.name == name).map(FieldRef)
    }

    /// Validate a raw map against this schema. See [`engine::validate`].
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<Validated, FieldErrors> {
        engine::validate(raw, self)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Start an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field, or reopen it if `name` was already declared.
    ///
    /// Reopening appends further rules to the existing field rather than
    /// creating a second field with the same name.
    pub fn field(&mut self, name: &str) -> FieldBuilder<'_> {
        let index = match self.fields.iter().position(|f| f.name == name) {
            Some(index) => index,
            None => {
                self.fields.push(FieldSpec::new(name));
                self.fields.len() - 1
            }
        };
        FieldBuilder {
            spec: &mut self.fields[index],
            index,
        }
    }

    /// Freeze the schema.
    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}

/// Configures one field of a [`SchemaBuilder`].
#[derive(Debug)]
pub struct FieldBuilder<'a> {
    spec: &'a mut FieldSpec,
    index: usize,
}

impl FieldBuilder<'_> {
    /// Convert the raw value before rules run.
    pub fn coerce(self, coercion: Coercion) -> Self {
        self.spec.coercion = Some(coercion);
        self
    }

    /// Allow the field to be absent or `null`.
    pub fn optional(self) -> Self {
        self.spec.optional = true;
        self
    }

    /// Evaluate the field's rules only while `predicate` holds.
    ///
    /// Calling `when` twice requires both predicates.
    pub fn when(self, predicate: Predicate) -> Self {
        self.spec.activation = Some(match self.spec.activation.take() {
            Some(existing) => Predicate::all([existing, predicate]),
            None => predicate,
        });
        self
    }

    /// Add a rule.
    pub fn rule(self, rule: Rule) -> Self {
        self.spec.rules.push(rule);
        self
    }

    /// Finish the field and return its handle.
    pub fn id(self) -> FieldRef {
        FieldRef(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_keep_declaration_order() {
        let mut b = SchemaBuilder::new("Order");
        b.field("b");
        b.field("a");
        b.field("c");
        let schema = b.build();
        let names: Vec<_> = schema.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(schema.field_ref("a").map(FieldRef::index), Some(1));
        assert_eq!(schema.field_ref("zzz"), None);
    }

    #[test]
    fn redeclaring_a_field_extends_it() {
        let mut b = SchemaBuilder::new("Twice");
        let first = b.field("name").rule(Rule::string("must be a string")).id();
        let second = b.field("name").rule(Rule::required("is required")).id();
        let schema = b.build();
        assert_eq!(first, second);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.fields()[0].rules().len(), 2);
    }

    #[test]
    fn builder_flags_are_recorded() {
        let mut b = Schema::builder("Flags");
        b.field("n")
            .coerce(Coercion::integer("n must be an integer"))
            .optional();
        let schema = b.build();
        let spec = &schema.fields()[0];
        assert!(spec.is_optional());
        assert!(spec.activation().is_none());
        assert_eq!(spec.coercion(), Some(&Coercion::integer("n must be an integer")));
    }

    #[test]
    fn integer_coercion() {
        let c = Coercion::integer("bad");
        assert_eq!(c.apply(&json!("7")), Ok(json!(7)));
        assert_eq!(c.apply(&json!(" -5 ")), Ok(json!(-5)));
        assert_eq!(c.apply(&json!(12)), Ok(json!(12)));
        assert_eq!(c.apply(&json!(3.0)), Ok(json!(3)));
        assert_eq!(c.apply(&json!("abc")), Err("bad".to_string()));
        assert_eq!(c.apply(&json!("7.5")), Err("bad".to_string()));
        assert_eq!(c.apply(&json!(7.5)), Err("bad".to_string()));
        assert_eq!(c.apply(&json!("")), Err("bad".to_string()));
        assert_eq!(c.apply(&json!(true)), Err("bad".to_string()));
    }

    #[test]
    fn whole_number_coercion_rejects_strings() {
        let c = Coercion::whole_number("bad");
        assert_eq!(c.apply(&json!(10)), Ok(json!(10)));
        assert_eq!(c.apply(&json!(10.0)), Ok(json!(10)));
        assert_eq!(c.apply(&json!("10")), Err("bad".to_string()));
        assert_eq!(c.apply(&json!(10.5)), Err("bad".to_string()));
        assert_eq!(c.apply(&json!(false)), Err("bad".to_string()));
    }

    #[test]
    fn boolean_coercion() {
        let c = Coercion::boolean("bad");
        assert_eq!(c.apply(&json!("TRUE")), Ok(json!(true)));
        assert_eq!(c.apply(&json!("false")), Ok(json!(false)));
        assert_eq!(c.apply(&json!(false)), Ok(json!(false)));
        assert_eq!(c.apply(&json!("yes")), Err("bad".to_string()));
        assert_eq!(c.apply(&json!(1)), Err("bad".to_string()));
    }

    #[test]
    fn trim_coercion_only_touches_strings() {
        assert_eq!(Coercion::Trim.apply(&json!("  hi  ")), Ok(json!("hi")));
        assert_eq!(Coercion::Trim.apply(&json!(5)), Ok(json!(5)));
    }

    #[test]
    fn debug_lists_field_names() {
        let mut b = SchemaBuilder::new("Dbg");
        b.field("x");
        let rendered = format!("{:?}", b.build());
        assert!(rendered.contains("Dbg"));
        assert!(rendered.contains("\"x\""));
    }
}
