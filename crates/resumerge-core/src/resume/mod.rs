//! Resume field extraction module.

mod extractor;
pub mod names;
mod normalize;
pub mod rules;

pub use extractor::{Extraction, FieldExtractor, FieldMiss};
pub use names::{HeadingNameResolver, PersonNameResolver};
pub use normalize::normalize;
pub use rules::{CompiledRuleset, ExtractionRule, FieldRule, MissReason, PatternRuleset, ValueClass};

/// Trait for resume parsing.
pub trait ResumeParser {
    /// Parse a resume from plain text.
    fn parse(&self, text: &str) -> Extraction;
}
