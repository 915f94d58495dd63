//! Configuration structures for the resumerge pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ResumergeError, Result, RuleError};
use crate::merge::MergeOptions;
use crate::resume::rules::{builtin, PatternRuleset};
use crate::resume::FieldExtractor;
use crate::store::CsvStore;

/// Main configuration for the resumerge pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumergeConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Deduplication configuration.
    pub merge: MergeOptions,

    /// Record store configuration.
    pub store: StoreConfig,

    /// Input selection configuration.
    pub input: InputConfig,

    /// Download configuration.
    pub fetch: FetchConfig,
}

/// Which ruleset to extract with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetChoice {
    /// Built-in `labeled` ruleset.
    Labeled,
    /// Built-in `sections` ruleset.
    Sections,
    /// Built-in `entity` ruleset.
    Entity,
    /// A ruleset defined inline.
    Custom(PatternRuleset),
}

impl RulesetChoice {
    /// Resolve to a ruleset definition.
    pub fn ruleset(&self) -> PatternRuleset {
        match self {
            RulesetChoice::Labeled => builtin::labeled(),
            RulesetChoice::Sections => builtin::sections(),
            RulesetChoice::Entity => builtin::entity(),
            RulesetChoice::Custom(ruleset) => ruleset.clone(),
        }
    }

    /// Choose a built-in ruleset by name.
    pub fn from_name(name: &str) -> std::result::Result<Self, RuleError> {
        match name.to_ascii_lowercase().as_str() {
            "labeled" => Ok(RulesetChoice::Labeled),
            "sections" => Ok(RulesetChoice::Sections),
            "entity" => Ok(RulesetChoice::Entity),
            _ => Err(RuleError::UnknownRuleset(name.to_string())),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Ruleset applied to every document of a run.
    pub ruleset: RulesetChoice,

    /// Use the heading-line resolver for `person_name` rules.
    pub resolve_names: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ruleset: RulesetChoice::Labeled,
            resolve_names: true,
        }
    }
}

impl ExtractionConfig {
    /// Compile the chosen ruleset into an extractor.
    pub fn extractor(&self) -> Result<FieldExtractor> {
        let extractor = FieldExtractor::new(self.ruleset.ruleset().compile()?);
        Ok(if self.resolve_names {
            extractor
        } else {
            extractor.without_name_resolver()
        })
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the CSV table.
    pub path: PathBuf,

    /// Column delimiter.
    pub delimiter: char,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Bulk Upload Sheet-3.csv"),
            delimiter: ',',
        }
    }
}

impl StoreConfig {
    /// Open the configured store.
    pub fn open(&self) -> Result<CsvStore> {
        if !self.delimiter.is_ascii() {
            return Err(ResumergeError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        Ok(CsvStore::new(&self.path).with_delimiter(self.delimiter as u8))
    }
}

/// Input selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// File extensions picked up when a folder is given.
    pub extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["pdf".to_string(), "txt".to_string()],
        }
    }
}

impl InputConfig {
    /// Whether a path has one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|a| a.eq_ignore_ascii_case(ext)))
    }
}

/// Download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Directory downloaded resumes are written to.
    pub download_dir: PathBuf,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloaded_resumes"),
            timeout_secs: 120,
        }
    }
}

impl ResumergeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ResumergeError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ResumergeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Field;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ResumergeConfig::default();
        assert_eq!(config.extraction.ruleset, RulesetChoice::Labeled);
        assert_eq!(config.merge, MergeOptions::default());
        assert_eq!(config.store.path, PathBuf::from("Bulk Upload Sheet-3.csv"));
        assert!(config.input.accepts(Path::new("x/cv.PDF")));
        assert!(!config.input.accepts(Path::new("cv.docx")));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ResumergeConfig = serde_json::from_str(
            r#"{"extraction": {"ruleset": "sections"}, "merge": {"case_insensitive_keys": true}}"#,
        )
        .unwrap();

        assert_eq!(config.extraction.ruleset, RulesetChoice::Sections);
        assert!(config.extraction.resolve_names);
        assert!(config.merge.case_insensitive_keys);
        assert_eq!(config.merge.key_field, Field::Email);
        assert_eq!(config.fetch.download_dir, PathBuf::from("downloaded_resumes"));
    }

    #[test]
    fn test_custom_ruleset_in_config() {
        let config: ResumergeConfig = serde_json::from_str(
            r#"{"extraction": {"ruleset": {"custom": {
                "name": "mine",
                "rules": [
                    {"field": "Email", "kind": "labeled", "labels": ["E-mail", "Email"], "value": "email"},
                    {"field": "Skills", "kind": "section", "start": "SKILLS", "end": ["LANGUAGES"]}
                ]
            }}}}"#,
        )
        .unwrap();

        let ruleset = config.extraction.ruleset.ruleset();
        assert_eq!(ruleset.name, "mine");
        assert_eq!(ruleset.fields(), vec![Field::Email, Field::Skills]);
        ruleset.compile().unwrap();
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ResumergeConfig::default();
        config.extraction.ruleset = RulesetChoice::Entity;
        config.store.delimiter = ';';
        config.save(&path).unwrap();

        let loaded = ResumergeConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.ruleset, RulesetChoice::Entity);
        assert_eq!(loaded.store.delimiter, ';');
    }

    #[test]
    fn test_invalid_delimiter() {
        let store = StoreConfig {
            delimiter: '§',
            ..StoreConfig::default()
        };
        assert!(matches!(store.open(), Err(ResumergeError::Config(_))));
    }

    #[test]
    fn test_ruleset_choice_from_name() {
        assert_eq!(RulesetChoice::from_name("Sections").unwrap(), RulesetChoice::Sections);
        assert!(RulesetChoice::from_name("nope").is_err());
    }
}
