//! # Rules and Predicates
//!
//! A [`Rule`] is one constraint on one field, paired with the message
//! reported when it is violated. A [`Predicate`] decides whether a rule (or
//! a whole field) is active for a given candidate.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::candidate::Candidate;
use crate::schema::FieldRef;

/// The constraint a rule checks.
///
/// Every kind receives the coerced value (`None` when absent). Type-bound
/// kinds fail on values of the wrong JSON type, including absence, so a
/// required field that is missing reports every violated rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Present, not `null`, and not the empty string.
    Required,
    /// A JSON string.
    String,
    /// A string whose character count lies in `min..=max`.
    Length {
        /// Fewest characters allowed.
        min: usize,
        /// Most characters allowed.
        max: usize,
    },
    /// An integral JSON number.
    Integer,
    /// A JSON number greater than zero.
    Positive,
    /// An integral JSON number within the inclusive bounds.
    Range {
        /// Smallest allowed value, if bounded below.
        min: Option<i64>,
        /// Largest allowed value, if bounded above.
        max: Option<i64>,
    },
    /// A JSON boolean.
    Boolean,
    /// Equal to one of the listed values.
    OneOf(Vec<Value>),
}

impl RuleKind {
    /// Whether `value` satisfies the constraint.
    pub fn check(&self, value: Option<&Value>) -> bool {
        match self {
            Self::Required => match value {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            Self::String => matches!(value, Some(Value::String(_))),
            Self::Length { min, max } => match value {
                Some(Value::String(s)) => {
                    let len = s.chars().count();
                    *min <= len && len <= *max
                }
                _ => false,
            },
            Self::Integer => value.and_then(as_integer).is_some(),
            Self::Positive => value
                .and_then(Value::as_f64)
                .map_or(false, |n| n > 0.0),
            Self::Range { min, max } => match value.and_then(as_integer) {
                Some(n) => min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi),
                None => false,
            },
            Self::Boolean => matches!(value, Some(Value::Bool(_))),
            Self::OneOf(allowed) => {
                value.map_or(false, |v| allowed.iter().any(|a| values_equal(a, v)))
            }
        }
    }
}

/// Integral value of a JSON number, accepting floats with no fractional part.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    let n = value.as_number()?;
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
        .then_some(f as i64)
}

/// JSON equality that treats `10`, `10.0` and `10u64` as the same number.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

/// One constraint on one field.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    message: String,
    activation: Option<Predicate>,
}

impl Rule {
    /// Rule of the given kind with a violation message.
    pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            activation: None,
        }
    }

    /// Present and non-empty.
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    /// A string.
    pub fn string(message: impl Into<String>) -> Self {
        Self::new(RuleKind::String, message)
    }

    /// A string of `min..=max` characters.
    pub fn length(min: usize, max: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Length { min, max }, message)
    }

    /// An integer.
    pub fn integer(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Integer, message)
    }

    /// A number greater than zero.
    pub fn positive(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Positive, message)
    }

    /// An integer in `min..=max`.
    pub fn range(min: i64, max: i64, message: impl Into<String>) -> Self {
        Self::new(
            RuleKind::Range {
                min: Some(min),
                max: Some(max),
            },
            message,
        )
    }

    /// An integer no smaller than `min`.
    pub fn at_least(min: i64, message: impl Into<String>) -> Self {
        Self::new(
            RuleKind::Range {
                min: Some(min),
                max: None,
            },
            message,
        )
    }

    /// A boolean.
    pub fn boolean(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Boolean, message)
    }

    /// One of the listed values.
    pub fn one_of<I, V>(allowed: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(
            RuleKind::OneOf(allowed.into_iter().map(Into::into).collect()),
            message,
        )
    }

    /// Only evaluate this rule while `predicate` holds.
    pub fn when(mut self, predicate: Predicate) -> Self {
        self.activation = Some(match self.activation.take() {
            Some(existing) => Predicate::all([existing, predicate]),
            None => predicate,
        });
        self
    }

    /// The constraint.
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Message reported on violation.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the rule applies to `candidate`.
    pub fn is_active(&self, candidate: &Candidate) -> bool {
        self.activation
            .as_ref()
            .map_or(true, |p| p.holds(candidate))
    }
}

type PredicateFn = dyn Fn(&Candidate) -> bool + Send + Sync;

/// Activation condition over the coerced candidate.
///
/// Cheap to clone; the closure is shared. A predicate may read any number of
/// fields.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wrap an arbitrary condition.
    pub fn from_fn(f: impl Fn(&Candidate) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// The field is present and equal to `expected`.
    pub fn equals(field: FieldRef, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        Self::from_fn(move |c| c.get(field).map_or(false, |v| values_equal(v, &expected)))
    }

    /// The field is present and not `null`.
    pub fn present(field: FieldRef) -> Self {
        Self::from_fn(move |c| c.is_present(field))
    }

    /// The field is absent or `null`.
    pub fn absent(field: FieldRef) -> Self {
        Self::from_fn(move |c| !c.is_present(field))
    }

    /// Every predicate holds. Vacuously true when empty.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let predicates: Vec<_> = predicates.into_iter().collect();
        Self::from_fn(move |c| predicates.iter().all(|p| p.holds(c)))
    }

    /// At least one predicate holds. False when empty.
    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let predicates: Vec<_> = predicates.into_iter().collect();
        Self::from_fn(move |c| predicates.iter().any(|p| p.holds(c)))
    }

    /// Negation.
    pub fn not(predicate: Predicate) -> Self {
        Self::from_fn(move |c| !predicate.holds(c))
    }

    /// Evaluate against a candidate.
    pub fn holds(&self, candidate: &Candidate) -> bool {
        (self.0)(candidate)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(kind: RuleKind, value: Value) -> bool {
        kind.check(Some(&value))
    }

    #[test]
    fn required_rejects_missing_null_and_empty() {
        assert!(!RuleKind::Required.check(None));
        assert!(!check(RuleKind::Required, Value::Null));
        assert!(!check(RuleKind::Required, json!("")));
        assert!(check(RuleKind::Required, json!(" ")));
        assert!(check(RuleKind::Required, json!(0)));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let kind = RuleKind::Length { min: 1, max: 3 };
        assert!(check(kind.clone(), json!("äöü")));
        assert!(!check(kind.clone(), json!("")));
        assert!(!check(kind.clone(), json!("abcd")));
        assert!(!check(kind, json!(12)));
    }

    #[test]
    fn integer_and_positive() {
        assert!(check(RuleKind::Integer, json!(4)));
        assert!(check(RuleKind::Integer, json!(4.0)));
        assert!(!check(RuleKind::Integer, json!(4.5)));
        assert!(!check(RuleKind::Integer, json!("4")));
        assert!(!RuleKind::Integer.check(None));

        assert!(check(RuleKind::Positive, json!(1)));
        assert!(check(RuleKind::Positive, json!(0.5)));
        assert!(!check(RuleKind::Positive, json!(0)));
        assert!(!check(RuleKind::Positive, json!(-5)));
        assert!(!check(RuleKind::Positive, json!("5")));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let kind = RuleKind::Range {
            min: Some(1),
            max: Some(100),
        };
        assert!(check(kind.clone(), json!(1)));
        assert!(check(kind.clone(), json!(100)));
        assert!(!check(kind.clone(), json!(0)));
        assert!(!check(kind.clone(), json!(101)));
        assert!(!check(kind, json!("50")));

        let open = RuleKind::Range {
            min: Some(0),
            max: None,
        };
        assert!(check(open.clone(), json!(i64::MAX)));
        assert!(!check(open, json!(-1)));
    }

    #[test]
    fn one_of_compares_numbers_by_value() {
        let kind = RuleKind::OneOf(vec![json!(10), json!("draft")]);
        assert!(check(kind.clone(), json!(10.0)));
        assert!(check(kind.clone(), json!("draft")));
        assert!(!check(kind.clone(), json!("10")));
        assert!(!kind.check(None));
    }

    #[test]
    fn rule_when_stacks_predicates() {
        let always = Predicate::from_fn(|_| true);
        let never = Predicate::from_fn(|_| false);
        let candidate = Candidate::new(vec![]);

        let rule = Rule::required("x").when(always.clone());
        assert!(rule.is_active(&candidate));

        let rule = Rule::required("x").when(always).when(never);
        assert!(!rule.is_active(&candidate));

        assert!(Rule::required("x").is_active(&candidate));
    }

    #[test]
    fn predicate_combinators() {
        let a = FieldRef::from_index(0);
        let b = FieldRef::from_index(1);
        let candidate = Candidate::new(vec![Some(json!(10)), Some(Value::Null)]);

        assert!(Predicate::equals(a, 10).holds(&candidate));
        assert!(!Predicate::equals(a, 5).holds(&candidate));
        assert!(Predicate::present(a).holds(&candidate));
        assert!(Predicate::absent(b).holds(&candidate));
        assert!(!Predicate::equals(b, Value::Null).holds(&candidate));

        assert!(Predicate::all([Predicate::present(a), Predicate::absent(b)]).holds(&candidate));
        assert!(!Predicate::all([Predicate::present(a), Predicate::present(b)]).holds(&candidate));
        assert!(Predicate::any([Predicate::present(b), Predicate::present(a)]).holds(&candidate));
        assert!(!Predicate::any(Vec::new()).holds(&candidate));
        assert!(Predicate::all(Vec::new()).holds(&candidate));
        assert!(Predicate::not(Predicate::present(b)).holds(&candidate));
    }

    #[test]
    fn out_of_range_field_ref_reads_as_absent() {
        let stray = FieldRef::from_index(9);
        let candidate = Candidate::new(vec![Some(json!(1))]);
        assert!(Predicate::absent(stray).holds(&candidate));
    }
}
