//! Normalization of search-API works into canonical records

use tracing::error;

use super::Work;
use crate::domain::{Creator, ItemType, PaperRecord, RecordSource};
use crate::text::decode_inverted_index;

/// Synthesize a pseudo-id from a work's native identifier.
///
/// Work ids arrive as URLs (`https://openalex.org/W2741809807`); the pseudo-id
/// keeps only the final path segment under a source prefix. Works without an
/// id yield the empty string.
pub fn pseudo_id(work: &Work) -> String {
    match work.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => {
            let short = id.rsplit('/').next().unwrap_or(id);
            format!("ALEX-{short}")
        }
        None => String::new(),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// Normalize one work into a canonical record.
///
/// Pure: every missing optional field degrades to an empty value. The record
/// id is the work's native id when present, else the synthesized pseudo-id.
pub fn record_from_work(work: &Work) -> PaperRecord {
    let id = match non_empty(&work.id) {
        Some(id) => id,
        None => pseudo_id(work),
    };
    let mut record = PaperRecord::new(id, RecordSource::OpenAlex);

    record.title = non_empty(&work.title);
    record.date = non_empty(&work.publication_date);
    record.volume = non_empty(&work.volume);
    record.doi = non_empty(&work.doi).map(|doi| doi.replace("https://doi.org/", ""));
    record.pages = Some(format!(
        "{}-{}",
        work.first_page.as_deref().unwrap_or_default(),
        work.last_page.as_deref().unwrap_or_default()
    ));

    record.creators = work
        .authorships
        .iter()
        .filter_map(|authorship| authorship.author.as_ref())
        .filter_map(|author| non_empty(&author.display_name))
        .map(|name| Creator::from_display_name(&name))
        .collect();

    if let Some(venue) = &work.host_venue {
        record.publication_title = non_empty(&venue.display_name);
        record.issue = non_empty(&venue.issue);
        let venue_type = venue.venue_type.as_deref().unwrap_or_default().to_lowercase();
        record.item_type = ItemType::from_venue_type(&venue_type);
        if record.item_type == ItemType::ConferencePaper {
            record.proceedings_title = non_empty(&venue.display_name);
        }
    }

    record.cited_by_count = work
        .cited_by_count
        .filter(|&count| count > 0)
        .map(|count| count.to_string());

    record.abstract_note = match non_empty(&work.abstract_note) {
        Some(text) => Some(text),
        None => work
            .abstract_inverted_index
            .as_ref()
            .map(decode_inverted_index),
    };

    record.fulltext = work.fulltext.clone().unwrap_or_default();
    record
}

/// Normalize a batch of works, skipping records that cannot be identified.
///
/// A work with neither a native id nor a synthesizable pseudo-id is logged
/// and dropped; one bad work never aborts the batch.
pub fn records_from_works(works: &[Work]) -> Vec<PaperRecord> {
    works
        .iter()
        .filter_map(|work| {
            let record = record_from_work(work);
            if record.id.is_empty() {
                error!(
                    title = work.title.as_deref().unwrap_or_default(),
                    "skipping search result without a usable identifier"
                );
                return None;
            }
            Some(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{Authorship, HostVenue, WorkAuthor};
    use std::collections::BTreeMap;

    fn authorship(name: &str) -> Authorship {
        Authorship {
            author: Some(WorkAuthor {
                display_name: Some(name.to_string()),
            }),
        }
    }

    #[test]
    fn normalizes_journal_work() {
        let work = Work {
            id: Some("https://openalex.org/W123".to_string()),
            title: Some("A Study".to_string()),
            publication_date: Some("2024-01-31".to_string()),
            doi: Some("https://doi.org/10.1234/abc".to_string()),
            first_page: Some("10".to_string()),
            last_page: Some("20".to_string()),
            cited_by_count: Some(7),
            host_venue: Some(HostVenue {
                display_name: Some("Journal of Studies".to_string()),
                venue_type: Some("journal".to_string()),
                issue: Some("4".to_string()),
            }),
            authorships: vec![authorship("Ada Augusta Lovelace")],
            ..Default::default()
        };

        let record = record_from_work(&work);
        assert_eq!(record.id, "https://openalex.org/W123");
        assert_eq!(record.doi.as_deref(), Some("10.1234/abc"));
        assert_eq!(record.pages.as_deref(), Some("10-20"));
        assert_eq!(record.item_type, ItemType::JournalArticle);
        assert_eq!(
            record.publication_title.as_deref(),
            Some("Journal of Studies")
        );
        assert_eq!(record.issue.as_deref(), Some("4"));
        assert_eq!(record.cited_by_count.as_deref(), Some("7"));
        assert_eq!(record.creators[0].last_name, "Lovelace");
        assert_eq!(record.creators[0].first_name, "Ada Augusta");
    }

    #[test]
    fn conference_venue_sets_proceedings_title() {
        let work = Work {
            id: Some("https://openalex.org/W9".to_string()),
            host_venue: Some(HostVenue {
                display_name: Some("Proc. of Things".to_string()),
                venue_type: Some("Conference".to_string()),
                issue: None,
            }),
            ..Default::default()
        };

        let record = record_from_work(&work);
        assert_eq!(record.item_type, ItemType::ConferencePaper);
        assert_eq!(record.proceedings_title.as_deref(), Some("Proc. of Things"));
    }

    #[test]
    fn missing_pages_yield_bare_dash() {
        let record = record_from_work(&Work {
            id: Some("https://openalex.org/W1".to_string()),
            ..Default::default()
        });
        assert_eq!(record.pages.as_deref(), Some("-"));
    }

    #[test]
    fn abstract_decoded_only_when_explicit_text_absent() {
        let mut index = BTreeMap::new();
        index.insert("From".to_string(), vec![0]);
        index.insert("index".to_string(), vec![1]);

        let mut work = Work {
            id: Some("https://openalex.org/W2".to_string()),
            abstract_inverted_index: Some(index),
            ..Default::default()
        };
        assert_eq!(
            record_from_work(&work).abstract_note.as_deref(),
            Some("From index")
        );

        work.abstract_note = Some("Explicit text".to_string());
        assert_eq!(
            record_from_work(&work).abstract_note.as_deref(),
            Some("Explicit text")
        );
    }

    #[test]
    fn pseudo_id_uses_last_path_segment() {
        let work = Work {
            id: Some("https://openalex.org/W2741809807".to_string()),
            ..Default::default()
        };
        assert_eq!(pseudo_id(&work), "ALEX-W2741809807");
        assert_eq!(pseudo_id(&Work::default()), "");
    }

    #[test]
    fn unidentifiable_works_are_skipped_not_fatal() {
        let works = vec![
            Work {
                id: Some("https://openalex.org/W1".to_string()),
                ..Default::default()
            },
            Work::default(),
        ];
        let records = records_from_works(&works);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "https://openalex.org/W1");
    }
}
