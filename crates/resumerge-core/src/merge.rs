//! Deduplicating merge of extracted records into an existing collection.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::batch::{RecordBatch, SourceFailure};
use crate::models::record::{Field, ResumeRecord};

/// How dedup keys are read from records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Field whose value identifies a record.
    pub key_field: Field,
    /// Compare keys ignoring ASCII case.
    pub case_insensitive_keys: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            key_field: Field::Email,
            case_insensitive_keys: false,
        }
    }
}

impl MergeOptions {
    /// Dedup key of a record, or `None` if the key field is unknown.
    pub fn key_of(&self, record: &ResumeRecord) -> Option<String> {
        record.get(self.key_field).and_then(|v| self.normalize_key(v))
    }

    fn normalize_key(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else if self.case_insensitive_keys {
            Some(trimmed.to_ascii_lowercase())
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Existing records plus accepted new ones, indexed by dedup key.
///
/// Only grows: existing rows are never updated, reordered or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCollection {
    records: Vec<ResumeRecord>,
    keys: HashSet<String>,
    options: MergeOptions,
}

impl MergedCollection {
    /// Index existing records with default options.
    pub fn new(existing: Vec<ResumeRecord>) -> Self {
        Self::with_options(existing, MergeOptions::default())
    }

    /// Index existing records. Records without a key are kept but not
    /// indexed, so they can never be matched.
    pub fn with_options(existing: Vec<ResumeRecord>, options: MergeOptions) -> Self {
        let keys = existing.iter().filter_map(|r| options.key_of(r)).collect();
        Self {
            records: existing,
            keys,
            options,
        }
    }

    pub fn records(&self) -> &[ResumeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ResumeRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn options(&self) -> MergeOptions {
        self.options
    }

    /// Whether a key value is already known.
    pub fn contains_key(&self, value: &str) -> bool {
        self.options
            .normalize_key(value)
            .is_some_and(|k| self.keys.contains(&k))
    }

    /// Number of distinct indexed keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

/// A batch record rejected because its key was already known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRejection {
    pub source_id: String,
    pub key: String,
}

/// Per-source outcome of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Sources whose records were appended, in batch order.
    pub accepted: Vec<String>,
    /// Sources rejected as duplicates.
    pub duplicates: Vec<DuplicateRejection>,
    /// Sources that failed before extraction.
    pub failures: Vec<SourceFailure>,
}

impl MergeReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            accepted: self.accepted.len(),
            duplicates: self.duplicates.len(),
            failed: self.failures.len(),
        }
    }
}

/// Counts a caller can render as one status message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub accepted: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.duplicates + self.failed
    }

    /// One-line status for the end of a run.
    pub fn status_line(&self) -> String {
        if self.total() == 0 {
            "No resumes uploaded.".to_string()
        } else {
            format!("All resumes have been processed and the sheet has been updated ({}).", self)
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new, {} already processed, {} failed",
            self.accepted, self.duplicates, self.failed
        )
    }
}

/// Merge a batch into an existing collection.
///
/// Records with an unknown key are always accepted. A known key is rejected
/// if it matches an existing record or a record accepted earlier in the same
/// batch. Accepted records are appended in batch order.
pub fn merge(existing: MergedCollection, batch: RecordBatch) -> (MergedCollection, MergeReport) {
    let mut collection = existing;
    let mut report = MergeReport {
        failures: batch.failures,
        ..MergeReport::default()
    };

    for extracted in batch.records {
        match collection.options.key_of(&extracted.record) {
            Some(key) if collection.keys.contains(&key) => {
                info!("Resume {} already processed. Skipping.", extracted.source_id);
                report.duplicates.push(DuplicateRejection {
                    source_id: extracted.source_id,
                    key,
                });
            }
            Some(key) => {
                collection.keys.insert(key);
                collection.records.push(extracted.record);
                report.accepted.push(extracted.source_id);
            }
            None => {
                debug!(
                    "{} has no {}, accepting without dedup",
                    extracted.source_id, collection.options.key_field
                );
                collection.records.push(extracted.record);
                report.accepted.push(extracted.source_id);
            }
        }
    }

    info!("Merge complete: {}", report.summary());

    (collection, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ExtractedRecord;
    use pretty_assertions::assert_eq;

    fn person(name: &str, email: Option<&str>) -> ResumeRecord {
        let record = ResumeRecord::new().with(Field::Name, name);
        match email {
            Some(e) => record.with(Field::Email, e),
            None => record,
        }
    }

    fn batch_of(records: Vec<(&str, ResumeRecord)>) -> RecordBatch {
        RecordBatch {
            records: records
                .into_iter()
                .map(|(id, record)| ExtractedRecord {
                    source_id: id.to_string(),
                    record,
                    missing_fields: Vec::new(),
                })
                .collect(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_existing_email_is_rejected() {
        let existing = MergedCollection::new(vec![person("Jane", Some("jane@x.com"))]);
        let batch = batch_of(vec![("jane.txt", person("Jane D", Some("jane@x.com")))]);

        let (merged, report) = merge(existing, batch);

        assert_eq!(merged.len(), 1);
        assert!(report.accepted.is_empty());
        assert_eq!(
            report.duplicates,
            vec![DuplicateRejection {
                source_id: "jane.txt".to_string(),
                key: "jane@x.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_same_batch_duplicate() {
        let batch = batch_of(vec![
            ("first.pdf", person("A", Some("dup@x.com"))),
            ("second.pdf", person("B", Some("dup@x.com"))),
        ]);

        let (merged, report) = merge(MergedCollection::new(Vec::new()), batch);

        assert_eq!(merged.records(), &[person("A", Some("dup@x.com"))]);
        assert_eq!(report.accepted, vec!["first.pdf".to_string()]);
        assert_eq!(report.duplicates[0].source_id, "second.pdf");
    }

    #[test]
    fn test_unknown_keys_always_accepted() {
        let existing = MergedCollection::new(vec![person("Old", None)]);
        let batch = batch_of(vec![("a", person("A", None)), ("b", person("B", None))]);

        let (merged, report) = merge(existing, batch);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.key_count(), 0);
        assert_eq!(report.summary(), RunSummary { accepted: 2, duplicates: 0, failed: 0 });
    }

    #[test]
    fn test_existing_prefix_and_order_preserved() {
        let existing_records = vec![
            person("E1", Some("e1@x.com")),
            person("E2", None),
            person("E3", Some("e3@x.com")),
        ];
        let batch = batch_of(vec![
            ("n1", person("N1", Some("n1@x.com"))),
            ("dup", person("D", Some("e3@x.com"))),
            ("n2", person("N2", None)),
        ]);

        let (merged, _) = merge(MergedCollection::new(existing_records.clone()), batch);

        assert_eq!(&merged.records()[..3], existing_records.as_slice());
        let names: Vec<_> = merged.records()[3..]
            .iter()
            .map(|r| r.get(Field::Name).unwrap())
            .collect();
        assert_eq!(names, vec!["N1", "N2"]);
    }

    #[test]
    fn test_resubmission_is_noop() {
        let existing = MergedCollection::new(vec![person("E", Some("e@x.com"))]);
        let batch = batch_of(vec![
            ("a", person("A", Some("a@x.com"))),
            ("e", person("E again", Some("e@x.com"))),
        ]);

        let (once, _) = merge(existing, batch.clone());
        let (twice, report) = merge(once.clone(), batch);

        assert_eq!(twice.records(), once.records());
        assert!(report.accepted.is_empty());
        assert_eq!(report.duplicates.len(), 2);
    }

    #[test]
    fn test_keys_are_trimmed_and_case_sensitive_by_default() {
        let existing = MergedCollection::new(vec![person("E", Some(" jane@x.com "))]);
        assert!(existing.contains_key("jane@x.com"));
        assert!(!existing.contains_key("Jane@X.com"));

        let batch = batch_of(vec![("upper", person("J", Some("JANE@x.com")))]);
        let (merged, report) = merge(existing, batch);
        assert_eq!(merged.len(), 2);
        assert_eq!(report.accepted, vec!["upper".to_string()]);
    }

    #[test]
    fn test_case_insensitive_keys_option() {
        let options = MergeOptions {
            case_insensitive_keys: true,
            ..MergeOptions::default()
        };
        let existing =
            MergedCollection::with_options(vec![person("E", Some("jane@x.com"))], options);
        let batch = batch_of(vec![("upper", person("J", Some("JANE@X.COM")))]);

        let (merged, report) = merge(existing, batch);
        assert_eq!(merged.len(), 1);
        assert_eq!(report.duplicates[0].key, "jane@x.com");
        // stored values are untouched
        assert_eq!(merged.records()[0].get(Field::Email), Some("jane@x.com"));
    }

    #[test]
    fn test_alternate_key_field() {
        let options = MergeOptions {
            key_field: Field::Phone,
            ..MergeOptions::default()
        };
        let existing = MergedCollection::with_options(
            vec![ResumeRecord::new().with(Field::Phone, "9876543210")],
            options,
        );
        let batch = batch_of(vec![(
            "p",
            ResumeRecord::new()
                .with(Field::Phone, "9876543210")
                .with(Field::Email, "new@x.com"),
        )]);

        let (merged, report) = merge(existing, batch);
        assert_eq!(merged.len(), 1);
        assert_eq!(report.summary().duplicates, 1);
    }

    #[test]
    fn test_failures_carried_into_report() {
        let batch = RecordBatch {
            records: Vec::new(),
            failures: vec![SourceFailure {
                source_id: "bad.pdf".to_string(),
                reason: "PDF has no pages".to_string(),
            }],
        };

        let (_, report) = merge(MergedCollection::new(Vec::new()), batch);
        assert_eq!(report.summary(), RunSummary { accepted: 0, duplicates: 0, failed: 1 });
        assert_eq!(report.summary().to_string(), "0 new, 0 already processed, 1 failed");
    }

    #[test]
    fn test_status_line() {
        assert_eq!(RunSummary::default().status_line(), "No resumes uploaded.");
        assert_eq!(
            RunSummary { accepted: 2, duplicates: 1, failed: 0 }.status_line(),
            "All resumes have been processed and the sheet has been updated (2 new, 1 already processed, 0 failed)."
        );
    }
}
