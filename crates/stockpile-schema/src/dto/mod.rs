//! # Request DTOs
//!
//! A DTO is a serde type paired with the `&'static` [`Schema`] that guards
//! it. Raw input is validated against the schema first; only a clean
//! [`Validated`](crate::Validated) value is ever deserialized into the type,
//! so handlers receive values that already satisfy every rule.

mod item;
mod params;
mod query;

pub use item::{CreateItem, UpdateItem, DRAFT_STATUS_CODE};
pub use params::IdParam;
pub use query::ListItemsQuery;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::FieldErrors;
use crate::schema::Schema;

/// Failure to turn raw input into a DTO.
#[derive(Error, Debug)]
pub enum DtoError {
    /// The input violated the schema. A client error.
    #[error("{0}")]
    Invalid(FieldErrors),

    /// The input passed the schema but did not fit the Rust type. The
    /// schema and the type disagree, which is a server fault.
    #[error("validated {schema} value does not convert into its DTO: {source}")]
    Conversion {
        /// Name of the schema the value passed.
        schema: String,
        /// The serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// A request type guarded by a validation schema.
pub trait Dto: DeserializeOwned + Send + 'static {
    /// The schema raw input must satisfy.
    fn schema() -> &'static Schema;

    /// Validate `raw` and convert it into `Self`.
    fn parse(raw: &Map<String, Value>) -> Result<Self, DtoError> {
        let schema = Self::schema();
        let validated = schema.validate(raw).map_err(DtoError::Invalid)?;
        validated
            .deserialize()
            .map_err(|source| DtoError::Conversion {
                schema: schema.name().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::OnceLock;

    /// Schema says "integer", type says "string": conversion must fail.
    #[derive(Debug, Deserialize)]
    struct Mismatched {
        #[allow(dead_code)]
        n: String,
    }

    impl Dto for Mismatched {
        fn schema() -> &'static Schema {
            static SCHEMA: OnceLock<Schema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                let mut b = Schema::builder("Mismatched");
                b.field("n").rule(Rule::integer("n must be an integer"));
                b.build()
            })
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn schema_type_mismatch_is_a_conversion_error() {
        let err = Mismatched::parse(&object(json!({"n": 4}))).unwrap_err();
        match err {
            DtoError::Conversion { schema, .. } => assert_eq!(schema, "Mismatched"),
            other => panic!("expected conversion error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_input_carries_field_errors() {
        let err = Mismatched::parse(&object(json!({"n": "x"}))).unwrap_err();
        match err {
            DtoError::Invalid(errors) => assert!(errors.contains("n")),
            other => panic!("expected invalid, got {other:?}"),
        }
    }
}
