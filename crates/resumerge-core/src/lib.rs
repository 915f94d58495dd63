//! Core library for resume field extraction and deduplicated storage.
//!
//! This crate provides:
//! - Document decoding (PDF via lopdf/pdf-extract, UTF-8 text)
//! - Rule-driven field extraction into a fixed 23-field record
//! - Record normalization
//! - Email-keyed dedup merge into an append-only collection
//! - A CSV-backed record store and the run pipeline tying it together

pub mod batch;
pub mod drive;
pub mod error;
pub mod merge;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod resume;
pub mod store;

pub use batch::{BatchProcessor, ExtractedRecord, RecordBatch, Source, SourceContent, SourceFailure};
pub use error::{DecodeError, ResumergeError, Result, RuleError, StoreError};
pub use merge::{merge, DuplicateRejection, MergeOptions, MergeReport, MergedCollection, RunSummary};
pub use models::config::{ResumergeConfig, RulesetChoice};
pub use models::record::{Field, ResumeRecord};
pub use pdf::{load_source, DocumentDecoder, DocumentKind, PdfDecoder, PlainTextDecoder};
pub use pipeline::{Pipeline, RunOutcome};
pub use resume::{
    normalize, Extraction, FieldExtractor, FieldMiss, HeadingNameResolver, MissReason,
    PatternRuleset, PersonNameResolver, ResumeParser,
};
pub use store::{CsvStore, MemoryStore, RecordStore};
