//! Canonical paper record

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{Creator, ItemType};

/// Origin of a canonical record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordSource {
    OpenAlex,
    Zotero,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::OpenAlex => "openalex",
            RecordSource::Zotero => "zotero",
        }
    }
}

/// Column order of the exported library table. `id` is the index column.
pub const CANONICAL_COLUMNS: &[&str] = &[
    "id",
    "title",
    "abstractNote",
    "date",
    "DOI",
    "creators",
    "itemType",
    "publicationTitle",
    "proceedingsTitle",
    "conferenceName",
    "place",
    "volume",
    "issue",
    "pages",
    "series",
    "seriesTitle",
    "seriesText",
    "journalAbbreviation",
    "language",
    "ISSN",
    "ISBN",
    "shortTitle",
    "url",
    "accessDate",
    "archive",
    "archiveLocation",
    "libraryCatalog",
    "callNumber",
    "rights",
    "extra",
    "zoteroKey",
    "citedByCount",
    "fulltext",
    "summary",
    "tags",
    "collections",
    "relations",
    "source",
];

/// One row of the canonical library table.
///
/// `id` is unique and immutable once assigned: either the remote store's
/// native key or a pseudo-id synthesized from the search source's work
/// identifier. Optional bibliographic fields use `None` for "absent";
/// `fulltext` uses the empty string for "not yet retrieved".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: String,
    pub title: Option<String>,
    pub abstract_note: Option<String>,
    pub date: Option<String>,
    pub doi: Option<String>,
    pub creators: Vec<Creator>,
    pub item_type: ItemType,
    pub publication_title: Option<String>,
    pub proceedings_title: Option<String>,
    pub conference_name: Option<String>,
    pub place: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub series: Option<String>,
    pub series_title: Option<String>,
    pub series_text: Option<String>,
    pub journal_abbreviation: Option<String>,
    pub language: Option<String>,
    pub issn: Option<String>,
    pub isbn: Option<String>,
    pub short_title: Option<String>,
    pub url: Option<String>,
    pub access_date: Option<String>,
    pub archive: Option<String>,
    pub archive_location: Option<String>,
    pub library_catalog: Option<String>,
    pub call_number: Option<String>,
    pub rights: Option<String>,
    pub extra: Option<String>,

    // Engine-managed fields
    pub zotero_key: Option<String>,
    pub cited_by_count: Option<String>,
    pub fulltext: String,
    pub summary: Option<String>,
    pub tags: BTreeSet<String>,
    pub collections: BTreeSet<String>,
    pub relations: BTreeMap<String, String>,
    pub source: RecordSource,
}

impl PaperRecord {
    /// Create an empty record with the given identity and origin.
    pub fn new(id: impl Into<String>, source: RecordSource) -> Self {
        Self {
            id: id.into(),
            title: None,
            abstract_note: None,
            date: None,
            doi: None,
            creators: Vec::new(),
            item_type: ItemType::default(),
            publication_title: None,
            proceedings_title: None,
            conference_name: None,
            place: None,
            volume: None,
            issue: None,
            pages: None,
            series: None,
            series_title: None,
            series_text: None,
            journal_abbreviation: None,
            language: None,
            issn: None,
            isbn: None,
            short_title: None,
            url: None,
            access_date: None,
            archive: None,
            archive_location: None,
            library_catalog: None,
            call_number: None,
            rights: None,
            extra: None,
            zotero_key: None,
            cited_by_count: None,
            fulltext: String::new(),
            summary: None,
            tags: BTreeSet::new(),
            collections: BTreeSet::new(),
            relations: BTreeMap::new(),
            source,
        }
    }

    /// The dedup key component for titles: a non-empty title, or `None`.
    pub fn title_key(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// The dedup key component for DOIs: a non-empty DOI, or `None`.
    pub fn doi_key(&self) -> Option<&str> {
        self.doi.as_deref().filter(|d| !d.is_empty())
    }

    /// Link this record to a remote item. An empty key never overwrites an
    /// existing link: once a record has been pushed it stays linked.
    pub fn link_remote(&mut self, key: &str) {
        if !key.is_empty() {
            self.zotero_key = Some(key.to_string());
        }
    }

    /// Value of a remote-template field, by the store's field name.
    ///
    /// Absent and unknown fields degrade to the empty string so a template
    /// can be filled field-by-field without per-field error handling.
    pub fn template_value(&self, field: &str) -> Value {
        fn s(value: &Option<String>) -> Value {
            Value::String(value.clone().unwrap_or_default())
        }

        match field {
            "itemType" => Value::String(
                self.item_type.remote_name().unwrap_or_default().to_string(),
            ),
            "title" => s(&self.title),
            "abstractNote" => s(&self.abstract_note),
            "date" => s(&self.date),
            "DOI" => s(&self.doi),
            "publicationTitle" => s(&self.publication_title),
            "proceedingsTitle" => s(&self.proceedings_title),
            "conferenceName" => s(&self.conference_name),
            "place" => s(&self.place),
            "volume" => s(&self.volume),
            "issue" => s(&self.issue),
            "pages" => s(&self.pages),
            "series" => s(&self.series),
            "seriesTitle" => s(&self.series_title),
            "seriesText" => s(&self.series_text),
            "journalAbbreviation" => s(&self.journal_abbreviation),
            "language" => s(&self.language),
            "ISSN" => s(&self.issn),
            "ISBN" => s(&self.isbn),
            "shortTitle" => s(&self.short_title),
            "url" => s(&self.url),
            "accessDate" => s(&self.access_date),
            "archive" => s(&self.archive),
            "archiveLocation" => s(&self.archive_location),
            "libraryCatalog" => s(&self.library_catalog),
            "callNumber" => s(&self.call_number),
            "rights" => s(&self.rights),
            "extra" => s(&self.extra),
            "creators" => serde_json::to_value(&self.creators)
                .unwrap_or_else(|_| Value::Array(Vec::new())),
            "tags" => Value::Array(
                self.tags.iter().map(|t| json!({ "tag": t })).collect(),
            ),
            "collections" => Value::Array(
                self.collections
                    .iter()
                    .map(|c| Value::String(c.clone()))
                    .collect(),
            ),
            _ => Value::String(String::new()),
        }
    }

    /// Value of an exported column as a plain string. Nested fields are
    /// serialized as JSON.
    pub fn column_value(&self, column: &str) -> String {
        fn nested<T: Serialize>(value: &T) -> String {
            serde_json::to_string(value).unwrap_or_default()
        }

        match column {
            "id" => self.id.clone(),
            "zoteroKey" => self.zotero_key.clone().unwrap_or_default(),
            "citedByCount" => self.cited_by_count.clone().unwrap_or_default(),
            "fulltext" => self.fulltext.clone(),
            "summary" => self.summary.clone().unwrap_or_default(),
            "creators" => nested(&self.creators),
            "tags" => nested(&self.tags),
            "collections" => nested(&self.collections),
            "relations" => nested(&self.relations),
            "source" => self.source.as_str().to_string(),
            "itemType" => self
                .item_type
                .remote_name()
                .unwrap_or_default()
                .to_string(),
            other => match self.template_value(other) {
                Value::String(text) => text,
                value => value.to_string(),
            },
        }
    }
}
