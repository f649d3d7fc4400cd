//! Word entity: one guessable answer inside a category.

use serde::{Deserialize, Serialize};

use crate::domain::collection::{Collection, CollectionRecord};

/// A row of the `words` collection.
///
/// `category` holds the id of a [`super::Category`]; the store enforces the
/// reference. Unset hints may arrive absent, `null`, or as an empty string,
/// and are passed through as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub word: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_long: Option<String>,
}

impl CollectionRecord for Word {
    const COLLECTION: Collection = Collection::Words;
}

/// Input data for creating a new word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub word: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_long: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_word_without_hints() {
        let word: Word =
            serde_json::from_value(json!({"id": "w1", "word": "cat", "category": "c1"})).unwrap();

        assert_eq!(word.id, "w1");
        assert_eq!(word.word, "cat");
        assert_eq!(word.category, "c1");
        assert!(word.hint.is_none());
        assert!(word.hint_long.is_none());
    }

    #[test]
    fn test_word_with_hints() {
        let word: Word = serde_json::from_value(json!({
            "id": "w2",
            "word": "3.14",
            "category": "c9",
            "hint": "2 decimal places",
            "hintLong": "Roughly pi"
        }))
        .unwrap();

        assert_eq!(word.hint.as_deref(), Some("2 decimal places"));
        assert_eq!(word.hint_long.as_deref(), Some("Roughly pi"));
    }

    #[test]
    fn test_word_null_and_empty_hints_pass_through() {
        let word: Word = serde_json::from_value(json!({
            "id": "w3",
            "word": "dog",
            "category": "c1",
            "hint": "",
            "hintLong": null
        }))
        .unwrap();

        assert_eq!(word.hint.as_deref(), Some(""));
        assert!(word.hint_long.is_none());
    }

    #[test]
    fn test_new_word_omits_missing_hints() {
        let new_word = NewWord {
            word: "cat".to_string(),
            category: "c1".to_string(),
            hint: None,
            hint_long: Some("A small feline".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&new_word).unwrap(),
            json!({"word": "cat", "category": "c1", "hintLong": "A small feline"})
        );
    }
}
