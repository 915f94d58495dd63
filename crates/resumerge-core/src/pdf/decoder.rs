//! PDF and plain-text decoders using lopdf and pdf-extract.

use std::fs;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::{DocumentDecoder, Result};
use crate::batch::Source;
use crate::error::DecodeError;

/// Supported document kinds, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    fn decode(&self, data: &[u8]) -> Result<String> {
        match self {
            Self::Pdf => PdfDecoder::new().decode(data),
            Self::Text => PlainTextDecoder.decode(data),
        }
    }
}

/// PDF text decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfDecoder;

impl PdfDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Parse the document, decrypting it when it only has an empty user
    /// password, and return bytes pdf-extract can read.
    fn prepare(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(data).map_err(|e| DecodeError::Parse(e.to_string()))?;

        let raw = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DecodeError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| DecodeError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(DecodeError::NoPages);
        }
        debug!("Loaded PDF with {} pages", page_count);

        Ok(raw)
    }
}

impl DocumentDecoder for PdfDecoder {
    fn decode(&self, data: &[u8]) -> Result<String> {
        let raw = self.prepare(data)?;
        // pdf-extract panics on some malformed content streams
        let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&raw))
            .map_err(|_| DecodeError::TextExtraction("text extractor panicked".to_string()))?
            .map_err(|e| DecodeError::TextExtraction(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(DecodeError::EmptyText);
        }
        Ok(text)
    }
}

/// UTF-8 plain text decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextDecoder;

impl DocumentDecoder for PlainTextDecoder {
    fn decode(&self, data: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(data).map_err(|_| DecodeError::InvalidUtf8)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        if text.trim().is_empty() {
            return Err(DecodeError::EmptyText);
        }
        Ok(text.to_string())
    }
}

/// Read and decode a file into a batch source.
///
/// Any failure becomes a decode-failure source rather than an error, so one
/// bad file cannot stop a batch.
pub fn load_source(path: &Path) -> Source {
    let id = path.display().to_string();

    let decoded = match DocumentKind::from_path(path) {
        Some(kind) => fs::read(path)
            .map_err(DecodeError::from)
            .and_then(|data| kind.decode(&data)),
        None => Err(DecodeError::UnsupportedFormat(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| "(none)".to_string()),
        )),
    };

    match decoded {
        Ok(text) => {
            debug!("Decoded {} ({} chars)", id, text.len());
            Source::text(id, text)
        }
        Err(e) => {
            warn!("Failed to decode {}: {}", id, e);
            Source::failed(id, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::SourceContent;
    use std::io::Write;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("a/b.PDF")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("cv.txt")), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_path(Path::new("cv.docx")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_plain_text_decoder() {
        let text = PlainTextDecoder.decode("\u{feff}Email: a@b.co".as_bytes()).unwrap();
        assert_eq!(text, "Email: a@b.co");

        assert!(matches!(
            PlainTextDecoder.decode(&[0xff, 0xfe, 0x00]),
            Err(DecodeError::InvalidUtf8)
        ));
        assert!(matches!(
            PlainTextDecoder.decode(b"  \n "),
            Err(DecodeError::EmptyText)
        ));
    }

    #[test]
    fn test_pdf_decoder_rejects_garbage() {
        let result = PdfDecoder::new().decode(b"definitely not a pdf");
        assert!(matches!(result, Err(DecodeError::Parse(_))));
    }

    #[test]
    fn test_load_source_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Name: Jane\nEmail: jane@x.com\n").unwrap();

        let source = load_source(file.path());
        assert_eq!(source.id, file.path().display().to_string());
        assert_eq!(
            source.content,
            SourceContent::Text("Name: Jane\nEmail: jane@x.com\n".to_string())
        );
    }

    #[test]
    fn test_load_source_failures_are_markers() {
        let dir = tempfile::tempdir().unwrap();

        let docx = dir.path().join("cv.docx");
        fs::write(&docx, b"PK").unwrap();
        let source = load_source(&docx);
        assert_eq!(
            source.content,
            SourceContent::DecodeFailed("unsupported file format: docx".to_string())
        );

        let missing = dir.path().join("gone.txt");
        assert!(matches!(load_source(&missing).content, SourceContent::DecodeFailed(_)));

        let broken = dir.path().join("broken.pdf");
        fs::write(&broken, b"%PDF-1.4 truncated").unwrap();
        assert!(matches!(load_source(&broken).content, SourceContent::DecodeFailed(_)));
    }
}
