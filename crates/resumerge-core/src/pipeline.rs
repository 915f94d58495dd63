//! End-to-end update run: load the store, extract a batch, merge, save.

use tracing::{info, instrument};

use crate::batch::{BatchProcessor, RecordBatch, Source, SourceFailure};
use crate::error::Result;
use crate::merge::{merge, MergeOptions, MergeReport, MergedCollection, RunSummary};
use crate::models::config::ResumergeConfig;
use crate::resume::{FieldExtractor, ResumeParser};
use crate::store::RecordStore;

/// Result of one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The collection as saved (or as it would be saved, for a preview).
    pub collection: MergedCollection,
    /// Per-source outcome.
    pub report: MergeReport,
    pub summary: RunSummary,
}

impl RunOutcome {
    pub fn failures(&self) -> &[SourceFailure] {
        &self.report.failures
    }

    pub fn status_line(&self) -> String {
        self.summary.status_line()
    }
}

/// Extraction, dedup and persistence wired together.
#[derive(Debug, Clone)]
pub struct Pipeline<P> {
    processor: BatchProcessor<P>,
    merge: MergeOptions,
}

impl Pipeline<FieldExtractor> {
    /// Build a pipeline from configuration.
    pub fn from_config(config: &ResumergeConfig) -> Result<Self> {
        Ok(Self::new(config.extraction.extractor()?, config.merge))
    }
}

impl<P: ResumeParser> Pipeline<P> {
    pub fn new(parser: P, merge: MergeOptions) -> Self {
        Self {
            processor: BatchProcessor::new(parser),
            merge,
        }
    }

    pub fn processor(&self) -> &BatchProcessor<P> {
        &self.processor
    }

    /// Run a batch and save the merged collection.
    ///
    /// The store is loaded before any source is processed, so a corrupt
    /// store fails the run without touching it. Nothing is written when
    /// there are no sources.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub fn run<S: RecordStore>(&self, store: &S, sources: Vec<Source>) -> Result<RunOutcome> {
        let had_sources = !sources.is_empty();
        let outcome = self.preview(store, sources)?;

        if had_sources {
            store.save(outcome.collection.records())?;
        }
        info!("{}", outcome.status_line());

        Ok(outcome)
    }

    /// Same as [`Pipeline::run`] without saving.
    pub fn preview<S: RecordStore>(&self, store: &S, sources: Vec<Source>) -> Result<RunOutcome> {
        let existing = store.load()?.unwrap_or_default();
        let collection = MergedCollection::with_options(existing, self.merge);

        let batch = if sources.is_empty() {
            RecordBatch::default()
        } else {
            self.processor.process(sources)
        };

        let (collection, report) = merge(collection, batch);
        let summary = report.summary();

        Ok(RunOutcome {
            collection,
            report,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ResumergeError, StoreError};
    use crate::models::record::Field;
    use crate::store::{CsvStore, MemoryStore};
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline<FieldExtractor> {
        Pipeline::from_config(&ResumergeConfig::default()).unwrap()
    }

    fn resume(name: &str, email: &str) -> String {
        format!("Name: {}\nEmail: {}\nSkills: Rust\n", name, email)
    }

    #[test]
    fn test_second_run_rejects_known_email() {
        let store = MemoryStore::new();
        let pipeline = pipeline();

        let first = pipeline
            .run(&store, vec![Source::text("jane.txt", resume("Jane Doe", "jane@x.com"))])
            .unwrap();
        assert_eq!(first.summary.accepted, 1);

        let second = pipeline
            .run(&store, vec![Source::text("jane2.txt", resume("Jane D", "jane@x.com"))])
            .unwrap();
        assert_eq!(second.summary, RunSummary { accepted: 0, duplicates: 1, failed: 0 });

        let saved = store.snapshot().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].get(Field::Name), Some("Jane Doe"));
    }

    #[test]
    fn test_mixed_batch() {
        let store = MemoryStore::with_records(vec![
            crate::ResumeRecord::new().with(Field::Email, "old@x.com"),
        ]);

        let outcome = pipeline()
            .run(
                &store,
                vec![
                    Source::text("a.txt", resume("Ann Lee", "a@x.com")),
                    Source::failed("b.pdf", "PDF is encrypted"),
                    Source::text("c.txt", resume("Old Timer", "old@x.com")),
                    Source::text("d.txt", resume("Dup Lee", "a@x.com")),
                ],
            )
            .unwrap();

        assert_eq!(outcome.summary, RunSummary { accepted: 1, duplicates: 2, failed: 1 });
        assert_eq!(outcome.failures()[0].source_id, "b.pdf");
        let emails: Vec<_> = store
            .snapshot()
            .unwrap()
            .iter()
            .map(|r| r.get(Field::Email).unwrap_or("").to_string())
            .collect();
        assert_eq!(emails, vec!["old@x.com", "a@x.com"]);
    }

    #[test]
    fn test_no_sources_writes_nothing() {
        let store = MemoryStore::new();
        let outcome = pipeline().run(&store, Vec::new()).unwrap();

        assert_eq!(outcome.status_line(), "No resumes uploaded.");
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_corrupt_store_stops_run_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        let original = "Name,Email,Salary\nA,a@x.com,10\n";
        std::fs::write(&path, original).unwrap();

        let result = pipeline().run(
            &CsvStore::new(&path),
            vec![Source::text("n.txt", resume("New One", "n@x.com"))],
        );

        assert!(matches!(
            result,
            Err(ResumergeError::Store(StoreError::UnknownColumn(_)))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_preview_does_not_save() {
        let store = MemoryStore::new();
        let outcome = pipeline()
            .preview(&store, vec![Source::text("a.txt", resume("Ann Lee", "a@x.com"))])
            .unwrap();

        assert_eq!(outcome.collection.len(), 1);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_csv_store_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("Bulk Upload Sheet-3.csv"));
        let pipeline = pipeline();

        pipeline
            .run(&store, vec![Source::text("a.txt", resume("Ann Lee", "a@x.com"))])
            .unwrap();
        let outcome = pipeline
            .run(&store, vec![Source::text("b.txt", resume("Bob Ray", "b@x.com"))])
            .unwrap();

        assert_eq!(outcome.collection.len(), 2);
        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved[1].get(Field::Name), Some("Bob Ray"));
        assert_eq!(saved[1].get(Field::Skills), Some("Rust"));
    }
}
