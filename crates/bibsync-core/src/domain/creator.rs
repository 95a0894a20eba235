//! Creator (author, editor, ...) representation

use serde::{Deserialize, Serialize};

/// A creator of a record, in the reference manager's shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub creator_type: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Creator {
    /// Create an author creator.
    pub fn author(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            creator_type: "author".to_string(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Split a display name into first/last, taking the final
    /// whitespace-delimited token as the surname.
    pub fn from_display_name(name: &str) -> Self {
        let parts: Vec<&str> = name.split_whitespace().collect();
        match parts.as_slice() {
            [] => Self::author("", ""),
            [single] => Self::author("", *single),
            [given @ .., family] => Self::author(given.join(" "), *family),
        }
    }

    /// Format as "Given Family" for display.
    pub fn display_name(&self) -> String {
        if self.first_name.is_empty() {
            self.last_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}
