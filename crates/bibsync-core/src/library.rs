//! The canonical paper library and its public operations

use std::mem;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::PaperRecord;
use crate::error::LibraryError;
use crate::export::export_csv;
use crate::fulltext::{attachment_info, retrieve_fulltext, FulltextError, ItemAttachments};
use crate::merge::merge_batch;
use crate::sources::{records_from_works, MetadataSource, SourceError, Work, WorkQuery};
use crate::store::{Fulltext, ReferenceStore, StoreError};
use crate::sync::{pull_remote, push_library};

/// Which text of a record to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    Fulltext,
    Abstract,
}

impl TextKind {
    fn label(&self) -> &'static str {
        match self {
            TextKind::Fulltext => "full text",
            TextKind::Abstract => "abstract",
        }
    }
}

/// Manager of the canonical library table, wired to a metadata search
/// source and a reference-manager store through their capability traits.
///
/// All operations are synchronous and single-owner; a batch merge replaces
/// the whole table, while individual remote calls within a sync pass stay
/// independent.
pub struct PaperLibrary<S, R> {
    source: S,
    store: R,
    collection_key: Option<String>,
    table: Vec<PaperRecord>,
}

impl<S: MetadataSource, R: ReferenceStore> PaperLibrary<S, R> {
    pub fn new(source: S, store: R, collection_key: Option<String>) -> Self {
        Self {
            source,
            store,
            collection_key,
            table: Vec::new(),
        }
    }

    /// The current library table.
    pub fn records(&self) -> &[PaperRecord] {
        &self.table
    }

    pub fn record(&self, id: &str) -> Option<&PaperRecord> {
        self.table.iter().find(|record| record.id == id)
    }

    /// Number of search results for a query, as a status message.
    pub fn count_search_results(&self, query: &WorkQuery) -> Result<String, LibraryError> {
        let count = self.source.count_works(query)?;
        if count == 0 {
            return Ok("No papers found for the query".to_string());
        }
        Ok(format!("Number of results for query '{query}': {count}"))
    }

    /// Search the metadata source for works matching a query.
    pub fn retrieve_papers(
        &self,
        query: &WorkQuery,
        limit: Option<usize>,
    ) -> Result<Vec<Work>, LibraryError> {
        Ok(self.source.search_works(query, limit)?)
    }

    /// Look up a single work by DOI.
    pub fn paper_by_doi(&self, doi: &str) -> Result<Option<Work>, SourceError> {
        self.source.work_by_doi(doi)
    }

    /// Normalize search results and merge them into the table.
    pub fn add_papers(&mut self, works: &[Work]) -> Result<String, LibraryError> {
        if works.is_empty() {
            return Err(LibraryError::Validation(
                "no papers provided to add to the library".to_string(),
            ));
        }
        let batch = records_from_works(works);
        let (table, report) = merge_batch(mem::take(&mut self.table), batch);
        self.table = table;
        info!(added = report.added, updated = report.updated, "merged search results");
        Ok(report.to_string())
    }

    /// Pull the remote library into the table (inbound sync).
    pub fn update_from_remote(&mut self) -> Result<String, LibraryError> {
        let (table, report) = pull_remote(
            mem::take(&mut self.table),
            &self.store,
            self.collection_key.as_deref(),
        )?;
        self.table = table;
        Ok(report.to_string())
    }

    /// Push the table to the remote library (outbound sync).
    pub fn push_to_remote(&mut self, update_existing: bool) -> Result<String, LibraryError> {
        let report = push_library(
            &mut self.table,
            &self.store,
            self.collection_key.as_deref(),
            update_existing,
        )?;
        Ok(report.to_string())
    }

    /// Synchronize both directions: remote into the table, then the table
    /// back out.
    pub fn sync_remote(&mut self, update_existing: bool) -> Result<String, LibraryError> {
        let pulled = self.update_from_remote()?;
        let pushed = self.push_to_remote(update_existing)?;
        Ok(format!(
            "Remote -> local library: {pulled}\nLocal library -> remote: {pushed}"
        ))
    }

    /// Attachments of a remote item.
    pub fn attachment_info(&self, item_key: &str) -> Result<ItemAttachments, StoreError> {
        attachment_info(&self.store, item_key)
    }

    /// Full text of a remote item, through its first PDF attachment.
    pub fn fulltext_for_item(&self, item_key: &str) -> Result<Fulltext, FulltextError> {
        retrieve_fulltext(&self.store, item_key)
    }

    /// Fetch full text for every linked record, isolating per-record
    /// failures.
    pub fn retrieve_all_attachments(&mut self) -> String {
        let mut downloaded: Vec<String> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for record in &mut self.table {
            let Some(key) = record.zotero_key.clone() else {
                continue;
            };
            let title = record.title.clone().unwrap_or_default();
            match retrieve_fulltext(&self.store, &key) {
                Ok(fulltext) => {
                    record.fulltext = fulltext.content;
                    downloaded.push(title);
                }
                Err(error) => {
                    debug!(key = %key, %error, "could not download full text");
                    errors.push(title);
                }
            }
        }

        format!(
            "Downloaded {} full texts. {} errors occurred.",
            downloaded.len(),
            errors.len()
        )
    }

    /// Read a record's full text or abstract.
    pub fn paper_text(&self, id: &str, kind: TextKind) -> Result<String, LibraryError> {
        let record = self
            .record(id)
            .ok_or_else(|| LibraryError::RecordNotFound(id.to_string()))?;

        let text = match kind {
            TextKind::Fulltext => record.fulltext.clone(),
            TextKind::Abstract => record.abstract_note.clone().unwrap_or_default(),
        };
        if text.is_empty() {
            return Err(LibraryError::Validation(format!(
                "{} not available for paper with id {id}; retrieve it from the \
                 remote library first",
                kind.label()
            )));
        }
        Ok(text)
    }

    /// Replace a record's tags.
    pub fn set_tags(&mut self, id: &str, tags: Vec<String>) -> Result<String, LibraryError> {
        let record = self
            .table
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| LibraryError::RecordNotFound(id.to_string()))?;
        record.tags = tags.iter().cloned().collect();
        Ok(format!("Tags {tags:?} set for paper with id {id}."))
    }

    /// Attach a summary to a record.
    pub fn add_summary(&mut self, id: &str, summary: &str) -> Result<String, LibraryError> {
        let record = self
            .table
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| LibraryError::RecordNotFound(id.to_string()))?;
        record.summary = Some(summary.to_string());
        Ok(format!("Summary added for paper with id {id}."))
    }

    /// Export the table to a CSV file.
    pub fn export_to_csv(&self, path: &Path) -> Result<String, LibraryError> {
        export_csv(&self.table, path)?;
        Ok(format!("Library exported to {}.", path.display()))
    }
}
