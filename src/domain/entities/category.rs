//! Category entity: a named pool of guessable words.

use serde::{Deserialize, Serialize};

use crate::domain::collection::{Collection, CollectionRecord};

/// A row of the `categories` collection.
///
/// `must_hint` marks categories whose words are only playable together with
/// their hint; `must_present` marks categories that must always be offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub must_hint: bool,
    pub must_present: bool,
}

impl CollectionRecord for Category {
    const COLLECTION: Collection = Collection::Categories;
}

/// Input data for creating a new category. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub must_hint: bool,
    pub must_present: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_reads_store_shape_unchanged() {
        let value = json!({
            "id": "c1",
            "name": "Animals",
            "mustHint": false,
            "mustPresent": true
        });

        let category: Category = serde_json::from_value(value).unwrap();

        assert_eq!(
            category,
            Category {
                id: "c1".to_string(),
                name: "Animals".to_string(),
                must_hint: false,
                must_present: true,
            }
        );
    }

    #[test]
    fn test_category_ignores_system_fields() {
        let value = json!({
            "id": "c2",
            "collectionId": "pbc_123",
            "collectionName": "categories",
            "created": "2025-01-01 10:00:00.000Z",
            "name": "Intle",
            "mustHint": false,
            "mustPresent": false
        });

        let category: Category = serde_json::from_value(value).unwrap();
        assert_eq!(category.name, "Intle");
    }

    #[test]
    fn test_new_category_serializes_camel_case() {
        let new_category = NewCategory {
            name: "Floatle".to_string(),
            must_hint: true,
            must_present: false,
        };

        assert_eq!(
            serde_json::to_value(&new_category).unwrap(),
            json!({"name": "Floatle", "mustHint": true, "mustPresent": false})
        );
    }
}
