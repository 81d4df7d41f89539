use std::sync::OnceLock;

use serde::Deserialize;
use stockpile_core::ItemId;

use super::Dto;
use crate::rule::Rule;
use crate::schema::{Coercion, Schema};

/// Path parameters of `/api/items/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IdParam {
    /// Positive item identifier, coerced from the path segment.
    pub id: ItemId,
}

impl Dto for IdParam {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let mut b = Schema::builder("IdParam");
            b.field("id")
                .coerce(Coercion::integer("ID must be an integer"))
                .rule(Rule::integer("ID must be an integer"))
                .rule(Rule::positive("ID must be a positive number"));
            b.build()
        })
    }
}
