//! # Candidates and Validated Values
//!
//! A [`Candidate`] is the per-call working copy of a request: one slot per
//! declared field, holding the coerced value. Predicates read it; the
//! engine turns a clean candidate into a [`Validated`] value.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::schema::{FieldRef, Schema};

/// Coerced field values of one validation attempt, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    slots: Vec<Option<Value>>,
}

impl Candidate {
    /// Build a candidate from slots in schema declaration order.
    pub fn new(slots: Vec<Option<Value>>) -> Self {
        Self { slots }
    }

    /// The value of `field`, treating `null` as absent.
    pub fn get(&self, field: FieldRef) -> Option<&Value> {
        self.raw(field).filter(|v| !v.is_null())
    }

    /// The value of `field` exactly as coerced, `null` included.
    pub fn raw(&self, field: FieldRef) -> Option<&Value> {
        self.slots.get(field.index()).and_then(Option::as_ref)
    }

    /// Whether `field` holds a non-null value.
    pub fn is_present(&self, field: FieldRef) -> bool {
        self.get(field).is_some()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn into_slots(self) -> Vec<Option<Value>> {
        self.slots
    }
}

/// Output of a successful validation: the declared, present, non-null
/// fields with their coerced values. Undeclared input keys are gone.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    schema: String,
    values: Map<String, Value>,
}

impl Validated {
    pub(crate) fn from_candidate(schema: &Schema, candidate: Candidate) -> Self {
        let values = schema
            .fields()
            .iter()
            .zip(candidate.into_slots())
            .filter_map(|(field, slot)| match slot {
                Some(Value::Null) | None => None,
                Some(value) => Some((field.name().to_string(), value)),
            })
            .collect();
        Self {
            schema: schema.name().to_string(),
            values,
        }
    }

    /// Name of the schema this value passed.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Coerced value of a field by wire name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Borrow the coerced values.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Take the coerced values as a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    /// Convert into a typed value.
    ///
    /// Fails only when the target type disagrees with the schema, which is a
    /// programming error rather than a client error.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use serde_json::json;

    #[test]
    fn get_hides_null_but_raw_keeps_it() {
        let c = Candidate::new(vec![Some(Value::Null), None, Some(json!(3))]);
        let first = FieldRef::from_index(0);
        assert_eq!(c.raw(first), Some(&Value::Null));
        assert_eq!(c.get(first), None);
        assert!(!c.is_present(FieldRef::from_index(1)));
        assert!(c.is_present(FieldRef::from_index(2)));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn validated_drops_absent_and_null_fields() {
        let mut b = SchemaBuilder::new("Pair");
        b.field("a");
        b.field("b");
        b.field("c");
        let schema = b.build();
        let candidate = Candidate::new(vec![Some(json!(1)), Some(Value::Null), None]);

        let validated = Validated::from_candidate(&schema, candidate);
        assert_eq!(validated.schema_name(), "Pair");
        assert_eq!(validated.get("a"), Some(&json!(1)));
        assert_eq!(validated.get("b"), None);
        assert_eq!(validated.into_value(), json!({"a": 1}));
    }

    #[test]
    fn deserialize_into_typed_value() {
        #[derive(serde::Deserialize)]
        struct Target {
            a: i64,
            b: Option<String>,
        }

        let mut b = SchemaBuilder::new("Target");
        b.field("a");
        b.field("b");
        let schema = b.build();
        let validated = Validated::from_candidate(&schema, Candidate::new(vec![Some(json!(5)), None]));
        let target: Target = validated.deserialize().unwrap();
        assert_eq!(target.a, 5);
        assert!(target.b.is_none());
    }
}
