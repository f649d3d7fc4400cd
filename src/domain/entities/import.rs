//! On-disk format of category import files.

use serde::{Deserialize, Serialize};

use super::{NewCategory, NewWord};

/// One import file: a category and all of its words.
///
/// ```json
/// {
///   "name": "Floatle",
///   "mustHint": false,
///   "mustPresent": false,
///   "words": [{ "word": "12.5", "hint": "1 decimal place" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryImport {
    pub name: String,
    #[serde(default)]
    pub must_hint: bool,
    #[serde(default)]
    pub must_present: bool,
    #[serde(default)]
    pub words: Vec<WordImport>,
}

/// A word inside an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordImport {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_long: Option<String>,
}

impl CategoryImport {
    pub fn new_category(&self) -> NewCategory {
        NewCategory {
            name: self.name.clone(),
            must_hint: self.must_hint,
            must_present: self.must_present,
        }
    }

    /// File name the import is written under: the lowercased category name.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name.to_lowercase())
    }
}

impl WordImport {
    pub fn plain(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            hint: None,
            hint_long: None,
        }
    }

    /// Binds the word to the category it is imported into.
    pub fn into_new_word(self, category_id: &str) -> NewWord {
        NewWord {
            word: self.word,
            category: category_id.to_string(),
            hint: self.hint,
            hint_long: self.hint_long,
        }
    }
}
