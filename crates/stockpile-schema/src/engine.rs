//! # Coercion & Validation Engine
//!
//! [`validate`] runs in two passes over the schema:
//!
//! 1. **Coercing.** Every declared field's raw value is converted by its
//!    [`Coercion`](crate::schema::Coercion). A failed conversion records the
//!    coercion's message, leaves the raw value in the candidate so sibling
//!    predicates still see it, and excludes that field from the second
//!    pass. Other fields are unaffected.
//! 2. **Validating.** With the full candidate in hand, every active rule of
//!    every remaining field is checked. Optional fields without a value and
//!    rules whose predicates are false contribute nothing. There is no
//!    short-circuit inside a field.
//!
//! Violations are reported per field in schema declaration order, each
//! field's coercion message first and then its rule messages in rule order.
//! On success, fields whose activation predicate was false are left out of
//! the [`Validated`] value along with absent and `null` ones.

use serde_json::{Map, Value};

use crate::candidate::{Candidate, Validated};
use crate::error::FieldErrors;
use crate::schema::{FieldRef, Schema};

/// Validate `raw` against `schema`.
///
/// Returns the coerced, validated value, or every violation found. Keys of
/// `raw` that the schema does not declare are ignored.
pub fn validate(raw: &Map<String, Value>, schema: &Schema) -> Result<Validated, FieldErrors> {
    let fields = schema.fields();
    let mut violations: Vec<Vec<String>> = vec![Vec::new(); fields.len()];
    let mut coerced_ok = vec![true; fields.len()];
    let mut active = vec![true; fields.len()];

    let slots = fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let value = raw.get(field.name())?;
            if value.is_null() {
                return Some(Value::Null);
            }
            match field.coercion() {
                None => Some(value.clone()),
                Some(coercion) => match coercion.apply(value) {
                    Ok(coerced) => Some(coerced),
                    Err(message) => {
                        violations[index].push(message);
                        coerced_ok[index] = false;
                        Some(value.clone())
                    }
                },
            }
        })
        .collect();
    let candidate = Candidate::new(slots);

    for (index, field) in fields.iter().enumerate() {
        if !coerced_ok[index] {
            continue;
        }
        if let Some(activation) = field.activation() {
            if !activation.holds(&candidate) {
                active[index] = false;
                continue;
            }
        }
        let value = candidate.raw(FieldRef::from_index(index));
        if field.is_optional() && value.map_or(true, Value::is_null) {
            continue;
        }
        for rule in field.rules() {
            if rule.is_active(&candidate) && !rule.kind().check(value) {
                violations[index].push(rule.message().to_string());
            }
        }
    }

    let mut errors = FieldErrors::new();
    for (field, messages) in fields.iter().zip(violations) {
        for message in messages {
            errors.push(field.name(), message);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Values of inactive fields were never checked and are not passed on.
    let slots = candidate
        .into_slots()
        .into_iter()
        .zip(active)
        .map(|(slot, active)| slot.filter(|_| active))
        .collect();
    Ok(Validated::from_candidate(schema, Candidate::new(slots)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Predicate, Rule};
    use crate::schema::{Coercion, SchemaBuilder};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn name_schema() -> Schema {
        let mut b = SchemaBuilder::new("Named");
        b.field("name")
            .rule(Rule::string("Name must be a string"))
            .rule(Rule::required("Name is required"))
            .rule(Rule::length(1, 5, "Name must be between 1 and 5 characters"));
        b.field("nickname")
            .optional()
            .rule(Rule::string("Nickname must be a string"));
        b.build()
    }

    #[test]
    fn all_rules_of_a_field_are_reported() {
        let errors = validate(&object(json!({})), &name_schema()).unwrap_err();
        assert_eq!(
            errors.messages_for("name").unwrap(),
            [
                "Name must be a string",
                "Name is required",
                "Name must be between 1 and 5 characters"
            ]
        );
        assert!(!errors.contains("nickname"));
    }

    #[test]
    fn optional_null_is_treated_as_absent() {
        let validated =
            validate(&object(json!({"name": "Ann", "nickname": null})), &name_schema()).unwrap();
        assert_eq!(validated.into_value(), json!({"name": "Ann"}));
    }

    #[test]
    fn optional_present_value_is_still_checked() {
        let errors =
            validate(&object(json!({"name": "Ann", "nickname": 5})), &name_schema()).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["nickname"]);
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let validated =
            validate(&object(json!({"name": "Ann", "admin": true})), &name_schema()).unwrap();
        assert!(validated.get("admin").is_none());
    }

    #[test]
    fn coercion_failure_skips_that_fields_rules_only() {
        let mut b = SchemaBuilder::new("Coerced");
        b.field("count")
            .coerce(Coercion::integer("count must be an integer"))
            .rule(Rule::integer("count must be an integer"))
            .rule(Rule::positive("count must be positive"));
        b.field("label").rule(Rule::required("label is required"));
        let schema = b.build();

        let errors = validate(&object(json!({"count": "many"})), &schema).unwrap_err();
        assert_eq!(errors.messages_for("count").unwrap(), ["count must be an integer"]);
        assert_eq!(errors.messages_for("label").unwrap(), ["label is required"]);
    }

    #[test]
    fn errors_follow_declaration_order_not_pass_order() {
        let mut b = SchemaBuilder::new("Ordered");
        b.field("first").rule(Rule::required("first is required"));
        b.field("second")
            .coerce(Coercion::integer("second must be an integer"));
        let schema = b.build();

        let errors = validate(&object(json!({"second": "x"})), &schema).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["first", "second"]);
    }

    #[test]
    fn predicates_see_coerced_siblings() {
        let mut b = SchemaBuilder::new("Gate");
        let level = b
            .field("level")
            .coerce(Coercion::integer("level must be an integer"))
            .id();
        b.field("reason")
            .when(Predicate::equals(level, 3))
            .rule(Rule::required("reason is required at level 3"));
        let schema = b.build();

        assert!(validate(&object(json!({"level": "3"})), &schema).is_err());
        assert!(validate(&object(json!({"level": "2"})), &schema).is_ok());
        assert!(validate(&object(json!({"level": "3", "reason": "x"})), &schema).is_ok());
    }

    #[test]
    fn inactive_field_values_are_not_passed_on() {
        let mut b = SchemaBuilder::new("Gate");
        let level = b.field("level").id();
        b.field("reason")
            .when(Predicate::equals(level, 3))
            .rule(Rule::string("reason must be a string"));
        let schema = b.build();

        let validated = validate(&object(json!({"level": 1, "reason": 42})), &schema).unwrap();
        assert_eq!(validated.into_value(), json!({"level": 1}));
    }

    #[test]
    fn rule_level_predicate_gates_a_single_rule() {
        let mut b = SchemaBuilder::new("RuleGate");
        let strict = b.field("strict").optional().id();
        b.field("code")
            .rule(Rule::string("code must be a string"))
            .rule(
                Rule::length(4, 4, "code must be 4 characters in strict mode")
                    .when(Predicate::equals(strict, true)),
            );
        let schema = b.build();

        assert!(validate(&object(json!({"code": "ab"})), &schema).is_ok());
        let errors =
            validate(&object(json!({"code": "ab", "strict": true})), &schema).unwrap_err();
        assert_eq!(
            errors.messages_for("code").unwrap(),
            ["code must be 4 characters in strict mode"]
        );
    }

    #[test]
    fn predicates_over_several_fields() {
        let mut b = SchemaBuilder::new("Multi");
        let kind = b.field("kind").optional().id();
        let amount = b
            .field("amount")
            .optional()
            .coerce(Coercion::integer("amount must be an integer"))
            .id();
        b.field("approver").when(Predicate::all([
            Predicate::equals(kind, "transfer"),
            Predicate::from_fn(move |c| {
                c.get(amount)
                    .and_then(Value::as_i64)
                    .map_or(false, |n| n > 1000)
            }),
        ]))
        .rule(Rule::required("approver is required for large transfers"));
        let schema = b.build();

        let large = object(json!({"kind": "transfer", "amount": "5000"}));
        let small = object(json!({"kind": "transfer", "amount": "50"}));
        let other = object(json!({"kind": "deposit", "amount": "5000"}));
        assert!(validate(&large, &schema).is_err());
        assert!(validate(&small, &schema).is_ok());
        assert!(validate(&other, &schema).is_ok());
    }
}
