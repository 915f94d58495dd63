//! Pattern rulesets: data definitions and their compiled form.
//!
//! A [`PatternRuleset`] is plain serde data so it can live in a config file.
//! [`PatternRuleset::compile`] validates it and builds every regex once; the
//! resulting [`CompiledRuleset`] is immutable and shared by all documents of
//! a run.

pub mod builtin;
pub mod patterns;

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::models::record::Field;
use crate::resume::names::PersonNameResolver;

/// How a single field is located in raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionRule {
    /// Everything between a start marker and the nearest following end
    /// marker. Spans lines.
    Section {
        start: String,
        end: Vec<String>,
    },

    /// A label, optional `:`/whitespace separators, then a value of the
    /// given class.
    Labeled {
        labels: Vec<String>,
        #[serde(default)]
        value: ValueClass,
    },

    /// A free-standing pattern anywhere in the text. Capture group 1 is the
    /// value when the pattern has one, otherwise the whole match.
    Pattern { pattern: String },

    /// Delegated to a [`PersonNameResolver`].
    PersonName,
}

/// Shape of the value that follows a label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueClass {
    /// Remainder of the line.
    #[default]
    Line,
    /// Letters, spaces and name punctuation on the same line.
    Words,
    /// Digits with embedded spaces or dashes on the same line.
    Digits,
    /// A run of digits.
    Number,
    /// A four-digit year.
    Year,
    /// An email address.
    Email,
    /// Everything up to the end of the text.
    Rest,
    /// One of the listed keywords.
    OneOf(Vec<String>),
    /// A custom regex fragment.
    Pattern(String),
}

impl ValueClass {
    fn fragment(&self) -> String {
        match self {
            ValueClass::Line => r"[^\r\n]+".to_string(),
            ValueClass::Words => r"[A-Za-z][A-Za-z \t.'\-]*".to_string(),
            ValueClass::Digits => r"\d[\d \t\-]*".to_string(),
            ValueClass::Number => r"\d+".to_string(),
            ValueClass::Year => r"\d{4}".to_string(),
            ValueClass::Email => r"[\w.+\-]+@[\w.\-]+".to_string(),
            ValueClass::Rest => r"[\s\S]+".to_string(),
            ValueClass::OneOf(words) => {
                let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
                format!(r"(?:{})\b", alternatives.join("|"))
            }
            ValueClass::Pattern(p) => p.clone(),
        }
    }
}

/// A field together with its primary rule and ordered fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: Field,
    #[serde(flatten)]
    pub rule: ExtractionRule,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<ExtractionRule>,
}

impl FieldRule {
    pub fn new(field: Field, rule: ExtractionRule) -> Self {
        Self {
            field,
            rule,
            fallbacks: Vec::new(),
        }
    }

    /// Add a rule tried when the previous ones miss.
    pub fn or_else(mut self, rule: ExtractionRule) -> Self {
        self.fallbacks.push(rule);
        self
    }
}

/// An ordered mapping from field to rule; one complete extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRuleset {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub rules: Vec<FieldRule>,
}

impl PatternRuleset {
    /// Validate and compile all rules.
    pub fn compile(&self) -> Result<CompiledRuleset, RuleError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(self.rules.len());

        for field_rule in &self.rules {
            if !seen.insert(field_rule.field) {
                return Err(RuleError::DuplicateField(field_rule.field.to_string()));
            }

            let strategies = std::iter::once(&field_rule.rule)
                .chain(field_rule.fallbacks.iter())
                .map(|r| CompiledRule::compile(field_rule.field, r))
                .collect::<Result<Vec<_>, _>>()?;

            rules.push(CompiledFieldRule {
                field: field_rule.field,
                strategies,
            });
        }

        Ok(CompiledRuleset {
            name: self.name.clone(),
            rules,
        })
    }

    /// Fields this ruleset attempts to extract, in order.
    pub fn fields(&self) -> Vec<Field> {
        self.rules.iter().map(|r| r.field).collect()
    }
}

/// Why a field resolved to unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// The label, marker or pattern was not found.
    NotFound,
    /// A section start was found but no end marker follows it.
    NoTerminator,
    /// The rule needs a name resolver and none is configured.
    NoResolver,
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissReason::NotFound => write!(f, "not found"),
            MissReason::NoTerminator => write!(f, "no terminator"),
            MissReason::NoResolver => write!(f, "no name resolver"),
        }
    }
}

/// Compiled, immutable ruleset.
#[derive(Debug, Clone)]
pub struct CompiledRuleset {
    name: String,
    rules: Vec<CompiledFieldRule>,
}

impl CompiledRuleset {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[CompiledFieldRule] {
        &self.rules
    }
}

/// A field with its compiled strategies, primary first.
#[derive(Debug, Clone)]
pub struct CompiledFieldRule {
    field: Field,
    strategies: Vec<CompiledRule>,
}

impl CompiledFieldRule {
    pub fn field(&self) -> Field {
        self.field
    }

    /// Try each strategy in order. The first non-empty capture wins; when all
    /// miss, the primary strategy's reason is reported.
    pub fn resolve(
        &self,
        text: &str,
        resolver: Option<&dyn PersonNameResolver>,
    ) -> Result<String, MissReason> {
        let mut first_miss = None;

        for strategy in &self.strategies {
            match strategy.apply(text, resolver) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    first_miss.get_or_insert(reason);
                }
            }
        }

        Err(first_miss.unwrap_or(MissReason::NotFound))
    }
}

#[derive(Debug, Clone)]
enum CompiledRule {
    Section { start: Regex, end: Regex },
    Capture(Regex),
    PersonName,
}

impl CompiledRule {
    fn compile(field: Field, rule: &ExtractionRule) -> Result<Self, RuleError> {
        let build = |pattern: &str| {
            Regex::new(pattern).map_err(|e| RuleError::InvalidPattern {
                field: field.to_string(),
                reason: e.to_string(),
            })
        };

        match rule {
            ExtractionRule::Section { start, end } => {
                let ends: Vec<&String> = end.iter().filter(|m| !m.trim().is_empty()).collect();
                if start.trim().is_empty() || ends.is_empty() {
                    return Err(RuleError::Empty(field.to_string()));
                }

                let start_re = build(&format!("(?i){}", bounded(start)))?;
                let alternatives: Vec<String> = ends.iter().map(|m| bounded(m)).collect();
                let end_re = build(&format!("(?i)(?:{})", alternatives.join("|")))?;

                Ok(CompiledRule::Section {
                    start: start_re,
                    end: end_re,
                })
            }
            ExtractionRule::Labeled { labels, value } => {
                let labels: Vec<String> = labels
                    .iter()
                    .filter(|l| !l.trim().is_empty())
                    .map(|l| bounded(l))
                    .collect();
                if labels.is_empty() {
                    return Err(RuleError::Empty(field.to_string()));
                }

                let pattern = format!(r"(?i)(?:{})[:\s]*({})", labels.join("|"), value.fragment());
                Ok(CompiledRule::Capture(build(&pattern)?))
            }
            ExtractionRule::Pattern { pattern } => {
                if pattern.is_empty() {
                    return Err(RuleError::Empty(field.to_string()));
                }
                Ok(CompiledRule::Capture(build(pattern)?))
            }
            ExtractionRule::PersonName => Ok(CompiledRule::PersonName),
        }
    }

    fn apply(
        &self,
        text: &str,
        resolver: Option<&dyn PersonNameResolver>,
    ) -> Result<String, MissReason> {
        let raw = match self {
            CompiledRule::Section { start, end } => {
                let start = start.find(text).ok_or(MissReason::NotFound)?;
                let body_start = start.end();
                // the section body must be at least one character long
                let search_from = text[body_start..]
                    .chars()
                    .next()
                    .map_or(text.len(), |c| body_start + c.len_utf8());
                let end = end
                    .find_at(text, search_from)
                    .ok_or(MissReason::NoTerminator)?;
                text[body_start..end.start()].to_string()
            }
            CompiledRule::Capture(re) => {
                let caps = re.captures(text).ok_or(MissReason::NotFound)?;
                caps.get(1)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str().to_string())
                    .ok_or(MissReason::NotFound)?
            }
            CompiledRule::PersonName => resolver
                .ok_or(MissReason::NoResolver)?
                .find_person_name(text)
                .ok_or(MissReason::NotFound)?,
        };

        let value = raw.trim();
        if value.is_empty() {
            return Err(MissReason::NotFound);
        }
        Ok(value.to_string())
    }
}

/// Escape a literal marker and put word boundaries on the sides that start or
/// end with a word character. Spaces inside the marker match any whitespace
/// run, including none.
fn bounded(marker: &str) -> String {
    let marker = marker.trim();
    let escaped = marker
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*");

    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(marker.chars().next()) { r"\b" } else { "" };
    let trail = if is_word(marker.chars().last()) { r"\b" } else { "" };

    format!("{}{}{}", lead, escaped, trail)
}
