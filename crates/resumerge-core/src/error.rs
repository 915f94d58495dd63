//! Error types for the resumerge-core library.

use thiserror::Error;

/// Main error type for the resumerge library.
#[derive(Error, Debug)]
pub enum ResumergeError {
    /// Document decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid extraction ruleset.
    #[error("ruleset error: {0}")]
    Rule(#[from] RuleError),

    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a document into plain text.
///
/// These never abort a batch; the batch processor records them against the
/// source that produced them.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file extension is not one we know how to decode.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Plain text input was not valid UTF-8.
    #[error("text is not valid UTF-8")]
    InvalidUtf8,

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Decoding succeeded but produced no text.
    #[error("no text extracted")]
    EmptyText,

    /// The source could not be read.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in a pattern ruleset definition.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A rule's pattern is not a valid regular expression.
    #[error("invalid pattern for {field}: {reason}")]
    InvalidPattern { field: String, reason: String },

    /// A rule has no label, marker or pattern to match on.
    #[error("rule for {0} has nothing to match")]
    Empty(String),

    /// The same field appears twice in one ruleset.
    #[error("field {0} is defined more than once")]
    DuplicateField(String),

    /// No built-in ruleset with this name.
    #[error("unknown ruleset: {0}")]
    UnknownRuleset(String),
}

/// Errors related to the persistent record table.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store exists but its header has a column we cannot map.
    #[error("unknown column in store: {0}")]
    UnknownColumn(String),

    /// The store exists but is structurally broken.
    #[error("store is corrupt: {0}")]
    Corrupt(String),

    /// CSV encoding/decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the resumerge library.
pub type Result<T> = std::result::Result<T, ResumergeError>;
