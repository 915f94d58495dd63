//! Batch processing: extract and normalize a sequence of documents.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::record::ResumeRecord;
use crate::resume::{normalize, FieldMiss, ResumeParser};

/// Content of an input document as handed over by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContent {
    /// Decoded plain text.
    Text(String),
    /// Decoding failed upstream, with the reason.
    DecodeFailed(String),
}

/// One input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Identifier shown in reports (usually the file path).
    pub id: String,
    pub content: SourceContent,
}

impl Source {
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: SourceContent::Text(text.into()),
        }
    }

    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: SourceContent::DecodeFailed(reason.into()),
        }
    }
}

/// A normalized record and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub source_id: String,
    pub record: ResumeRecord,
    pub missing_fields: Vec<FieldMiss>,
}

/// A source that produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source_id: String,
    pub reason: String,
}

/// Records extracted in one run, plus the sources that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    pub records: Vec<ExtractedRecord>,
    pub failures: Vec<SourceFailure>,
}

impl RecordBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.failures.is_empty()
    }
}

/// Drives a parser and the normalizer over input documents, in order.
#[derive(Debug, Clone)]
pub struct BatchProcessor<P> {
    parser: P,
}

impl<P: ResumeParser> BatchProcessor<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Process every source. A decode failure is recorded and skipped; it
    /// never stops the sources after it.
    pub fn process<I>(&self, sources: I) -> RecordBatch
    where
        I: IntoIterator<Item = Source>,
    {
        let mut batch = RecordBatch::default();

        for source in sources {
            match source.content {
                SourceContent::DecodeFailed(reason) => {
                    warn!("Skipping {}: {}", source.id, reason);
                    batch.failures.push(SourceFailure {
                        source_id: source.id,
                        reason,
                    });
                }
                SourceContent::Text(text) => {
                    let extraction = self.parser.parse(&text);
                    if !extraction.missing_fields.is_empty() {
                        debug!(
                            "{}: {} fields not found",
                            source.id,
                            extraction.missing_fields.len()
                        );
                    }
                    batch.records.push(ExtractedRecord {
                        source_id: source.id,
                        record: normalize(extraction.record),
                        missing_fields: extraction.missing_fields,
                    });
                }
            }
        }

        info!(
            "Batch processed: {} records, {} failures",
            batch.records.len(),
            batch.failures.len()
        );

        batch
    }
}
