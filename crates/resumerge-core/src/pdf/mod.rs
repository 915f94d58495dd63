//! Document decoding: turning PDF or text files into plain text.

mod decoder;

pub use decoder::{load_source, DocumentKind, PdfDecoder, PlainTextDecoder};

use crate::error::DecodeError;

/// Result type for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Trait for document decoders.
pub trait DocumentDecoder {
    /// Decode raw document bytes into plain text.
    fn decode(&self, data: &[u8]) -> Result<String>;
}
