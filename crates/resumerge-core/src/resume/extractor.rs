//! Ruleset-driven resume field extractor.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::record::{Field, ResumeRecord};

use super::names::{HeadingNameResolver, PersonNameResolver};
use super::rules::{CompiledRuleset, MissReason};
use super::ResumeParser;

/// A field the ruleset tried and could not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMiss {
    pub field: Field,
    pub reason: MissReason,
}

/// Result of extracting one document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Extracted record; every canonical field is present.
    pub record: ResumeRecord,
    /// Fields the ruleset attempted but could not resolve.
    pub missing_fields: Vec<FieldMiss>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Applies a compiled ruleset to plain text.
#[derive(Clone)]
pub struct FieldExtractor {
    ruleset: CompiledRuleset,
    resolver: Option<Arc<dyn PersonNameResolver>>,
}

impl FieldExtractor {
    /// Create an extractor backed by the heading-line name resolver.
    pub fn new(ruleset: CompiledRuleset) -> Self {
        Self {
            ruleset,
            resolver: Some(Arc::new(HeadingNameResolver::new())),
        }
    }

    /// Replace the resolver used by `person_name` rules.
    pub fn with_name_resolver(mut self, resolver: impl PersonNameResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Disable `person_name` rules; they then always miss.
    pub fn without_name_resolver(mut self) -> Self {
        self.resolver = None;
        self
    }

    pub fn ruleset(&self) -> &CompiledRuleset {
        &self.ruleset
    }

    /// Extract a record from `text`. Never fails: unmatched fields stay
    /// unknown and are listed in `missing_fields`.
    pub fn extract(&self, text: &str) -> Extraction {
        let start = Instant::now();
        let mut record = ResumeRecord::new();
        let mut missing_fields = Vec::new();

        for rule in self.ruleset.rules() {
            match rule.resolve(text, self.resolver.as_deref()) {
                Ok(value) => record.set(rule.field(), Some(value)),
                Err(reason) => {
                    debug!("Could not extract {} ({})", rule.field(), reason);
                    missing_fields.push(FieldMiss {
                        field: rule.field(),
                        reason,
                    });
                }
            }
        }

        debug!(
            "Extracted {} fields with ruleset '{}', {} missing",
            record.known_count(),
            self.ruleset.name(),
            missing_fields.len()
        );

        Extraction {
            record,
            missing_fields,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl std::fmt::Debug for FieldExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldExtractor")
            .field("ruleset", &self.ruleset.name())
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

impl ResumeParser for FieldExtractor {
    fn parse(&self, text: &str) -> Extraction {
        self.extract(text)
    }
}
