use std::sync::OnceLock;

use serde::Deserialize;
use stockpile_core::Page;
use utoipa::IntoParams;

use super::Dto;
use crate::rule::Rule;
use crate::schema::{Coercion, Schema};

/// Largest offset a listing accepts.
const MAX_OFFSET: i64 = 1_000_000;

/// Query string of `GET /api/items`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsQuery {
    /// Page size, 1–100. Defaults to 100.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Items to skip, 0–1000000. Defaults to 0.
    #[serde(default)]
    pub offset: Option<u32>,
}

impl ListItemsQuery {
    /// The requested page, with defaults filled in.
    pub fn page(&self) -> Page {
        let default = Page::default();
        Page::new(
            self.limit.unwrap_or(default.limit),
            self.offset.unwrap_or(default.offset),
        )
    }
}

impl Dto for ListItemsQuery {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let mut b = Schema::builder("ListItemsQuery");
            b.field("limit")
                .optional()
                .coerce(Coercion::integer("limit must be an integer"))
                .rule(Rule::range(
                    1,
                    Page::MAX_LIMIT as i64,
                    "limit must be between 1 and 100",
                ));
            b.field("offset")
                .optional()
                .coerce(Coercion::integer("offset must be an integer"))
                .rule(Rule::range(
                    0,
                    MAX_OFFSET,
                    "offset must be between 0 and 1000000",
                ));
            b.build()
        })
    }
}
