use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Dto;
use crate::rule::{Predicate, Rule};
use crate::schema::{Coercion, Schema};

/// Status code marking an item as a draft. Drafts must carry special notes.
pub const DRAFT_STATUS_CODE: i64 = 10;

/// Body of `POST /api/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateItem {
    /// 1–255 characters.
    pub name: String,
    /// At most 1000 characters.
    #[serde(default)]
    pub description: Option<String>,
}

impl Dto for CreateItem {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let mut b = Schema::builder("CreateItem");
            b.field("name")
                .rule(Rule::string("Name must be a string"))
                .rule(Rule::required("Name is required"))
                .rule(Rule::length(1, 255, "Name must be between 1 and 255 characters"));
            description_field(&mut b);
            b.build()
        })
    }
}

/// Body of `PUT /api/items/{id}`. Every field is optional; only supplied
/// fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    /// 1–255 characters when supplied.
    #[serde(default)]
    pub name: Option<String>,
    /// At most 1000 characters when supplied.
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow status. `10` marks a draft.
    #[serde(default)]
    pub status_code: Option<i64>,
    /// Required, 1–500 characters, while `statusCode` is `10`. Ignored
    /// otherwise.
    #[serde(default)]
    pub special_notes: Option<String>,
}

impl UpdateItem {
    /// Whether the update marks the item as a draft.
    pub fn is_draft(&self) -> bool {
        self.status_code == Some(DRAFT_STATUS_CODE)
    }
}

impl Dto for UpdateItem {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let mut b = Schema::builder("UpdateItem");
            b.field("name")
                .optional()
                .rule(Rule::string("Name must be a string"))
                .rule(Rule::length(1, 255, "Name must be between 1 and 255 characters"));
            description_field(&mut b);
            let status = b
                .field("statusCode")
                .optional()
                .coerce(Coercion::whole_number("Status code must be an integer"))
                .rule(Rule::integer("Status code must be an integer"))
                .id();
            b.field("specialNotes")
                .when(Predicate::equals(status, DRAFT_STATUS_CODE))
                .rule(Rule::string("Special notes must be a string"))
                .rule(Rule::length(
                    1,
                    500,
                    "Special notes must be between 1 and 500 characters",
                ));
            b.build()
        })
    }
}

fn description_field(b: &mut crate::schema::SchemaBuilder) {
    b.field("description")
        .optional()
        .rule(Rule::string("Description must be a string"))
        .rule(Rule::length(0, 1000, "Description must not exceed 1000 characters"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::DtoError;
    use serde_json::{json, Map, Value};

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn invalid<T: Dto + std::fmt::Debug>(raw: Value) -> crate::FieldErrors {
        match T::parse(&object(raw)) {
            Err(DtoError::Invalid(errors)) => errors,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn create_item_accepts_name_and_description() {
        let dto = CreateItem::parse(&object(json!({
            "name": "Widget",
            "description": "A small widget",
            "colour": "blue"
        })))
        .unwrap();
        assert_eq!(dto.name, "Widget");
        assert_eq!(dto.description.as_deref(), Some("A small widget"));
    }

    #[test]
    fn create_item_missing_name_reports_every_name_rule() {
        let errors = invalid::<CreateItem>(json!({}));
        assert_eq!(
            errors.messages_for("name").unwrap(),
            [
                "Name must be a string",
                "Name is required",
                "Name must be between 1 and 255 characters"
            ]
        );
    }

    #[test]
    fn create_item_name_too_long() {
        let errors = invalid::<CreateItem>(json!({"name": "x".repeat(256)}));
        assert_eq!(
            errors.messages_for("name").unwrap(),
            ["Name must be between 1 and 255 characters"]
        );
    }

    #[test]
    fn create_item_null_description_is_absent() {
        let dto = CreateItem::parse(&object(json!({"name": "W", "description": null}))).unwrap();
        assert!(dto.description.is_none());
    }

    #[test]
    fn update_item_empty_body_is_valid() {
        let dto = UpdateItem::parse(&Map::new()).unwrap();
        assert_eq!(dto, UpdateItem::default());
        assert!(!dto.is_draft());
    }

    #[test]
    fn update_item_empty_name_is_rejected() {
        let errors = invalid::<UpdateItem>(json!({"name": ""}));
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn update_item_status_code_must_be_a_json_integer() {
        let dto = UpdateItem::parse(&object(json!({"statusCode": 3}))).unwrap();
        assert_eq!(dto.status_code, Some(3));
        let dto = UpdateItem::parse(&object(json!({"statusCode": 3.0}))).unwrap();
        assert_eq!(dto.status_code, Some(3));

        for raw in [json!({"statusCode": "three"}), json!({"statusCode": "5"})] {
            let errors = invalid::<UpdateItem>(raw);
            assert_eq!(
                errors.messages_for("statusCode").unwrap(),
                ["Status code must be an integer"]
            );
        }
    }

    #[test]
    fn string_draft_code_does_not_open_the_draft_gate() {
        let errors = invalid::<UpdateItem>(json!({"statusCode": "10"}));
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["statusCode"]);
        assert_eq!(
            errors.messages_for("statusCode").unwrap(),
            ["Status code must be an integer"]
        );
    }

    #[test]
    fn draft_requires_special_notes() {
        let errors = invalid::<UpdateItem>(json!({"statusCode": 10}));
        assert_eq!(
            errors.messages_for("specialNotes").unwrap(),
            [
                "Special notes must be a string",
                "Special notes must be between 1 and 500 characters"
            ]
        );

        let dto = UpdateItem::parse(&object(json!({
            "statusCode": 10,
            "specialNotes": "hold for review"
        })))
        .unwrap();
        assert!(dto.is_draft());
        assert_eq!(dto.special_notes.as_deref(), Some("hold for review"));
    }

    #[test]
    fn non_draft_ignores_special_notes_entirely() {
        let dto = UpdateItem::parse(&object(json!({
            "statusCode": 5,
            "specialNotes": 12345
        })))
        .unwrap();
        assert_eq!(dto.status_code, Some(5));
        assert!(dto.special_notes.is_none());
    }
}
