//! Item type enumeration

use serde::{Deserialize, Serialize};

/// The item types the engine knows how to push to the remote store.
///
/// `Other` covers everything the mapping does not recognize; such records
/// can live in the table but are rejected on outbound sync rather than
/// silently coerced to a default type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    JournalArticle,
    ConferencePaper,
    Preprint,
    Other,
}

impl ItemType {
    /// The remote store's name for this type, or `None` for unmapped types.
    pub fn remote_name(&self) -> Option<&'static str> {
        match self {
            ItemType::JournalArticle => Some("journalArticle"),
            ItemType::ConferencePaper => Some("conferencePaper"),
            ItemType::Preprint => Some("preprint"),
            ItemType::Other => None,
        }
    }

    /// Map a remote store item type name back to the enumeration.
    pub fn from_remote_name(name: &str) -> Self {
        match name {
            "journalArticle" => ItemType::JournalArticle,
            "conferencePaper" => ItemType::ConferencePaper,
            "preprint" => ItemType::Preprint,
            _ => ItemType::Other,
        }
    }

    /// Map a search-source venue type tag to an item type.
    ///
    /// Unknown venue tags fall back to `JournalArticle`, matching how the
    /// search source labels untyped venues.
    pub fn from_venue_type(venue_type: &str) -> Self {
        match venue_type {
            "journal" => ItemType::JournalArticle,
            "conference" => ItemType::ConferencePaper,
            "repository" => ItemType::Preprint,
            _ => ItemType::JournalArticle,
        }
    }
}

impl Default for ItemType {
    fn default() -> Self {
        ItemType::JournalArticle
    }
}
