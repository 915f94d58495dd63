//! Built-in rulesets.
//!
//! - `labeled`: every field introduced by a `Label:` prefix.
//! - `sections`: contact details by pattern, body fields by section headers
//!   (SUMMARY, EXPERIENCE, EDUCATION, SKILLS, PROJECTS, ACHIEVEMENTS).
//! - `entity`: name from a person-name resolver, contact details by
//!   free-standing patterns, the rest by label.

use super::patterns;
use super::{ExtractionRule, FieldRule, PatternRuleset, ValueClass};
use crate::error::RuleError;
use crate::models::record::Field;

/// Names of the built-in rulesets.
pub const NAMES: [&str; 3] = ["labeled", "sections", "entity"];

/// Look up a built-in ruleset by name.
pub fn by_name(name: &str) -> Result<PatternRuleset, RuleError> {
    match name.to_ascii_lowercase().as_str() {
        "labeled" => Ok(labeled()),
        "sections" => Ok(sections()),
        "entity" => Ok(entity()),
        _ => Err(RuleError::UnknownRuleset(name.to_string())),
    }
}

fn label(field: Field, labels: &[&str], value: ValueClass) -> FieldRule {
    FieldRule::new(
        field,
        ExtractionRule::Labeled {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            value,
        },
    )
}

fn line(field: Field, name: &str) -> FieldRule {
    label(field, &[name], ValueClass::Line)
}

fn pattern(field: Field, pattern: &str) -> FieldRule {
    FieldRule::new(
        field,
        ExtractionRule::Pattern {
            pattern: pattern.to_string(),
        },
    )
}

fn section(field: Field, start: &str, end: &str) -> FieldRule {
    FieldRule::new(
        field,
        ExtractionRule::Section {
            start: start.to_string(),
            end: vec![end.to_string()],
        },
    )
}

fn gender_words() -> ValueClass {
    ValueClass::OneOf(vec!["Male".into(), "Female".into(), "Other".into()])
}

/// Label-based ruleset for form-like resumes.
pub fn labeled() -> PatternRuleset {
    PatternRuleset {
        name: "labeled".to_string(),
        description: "Every field introduced by a `Label:` prefix".to_string(),
        rules: vec![
            label(Field::Name, &["Name"], ValueClass::Words),
            label(Field::Phone, &["Number", "Phone"], ValueClass::Digits),
            label(Field::Email, &["Email"], ValueClass::Email),
            label(
                Field::Dob,
                &["DOB"],
                ValueClass::Pattern(patterns::DOB_LABELED_VALUE.to_string()),
            ),
            label(Field::Gender, &["Gender"], gender_words()),
            label(Field::Pincode, &["Pincode"], ValueClass::Pattern(r"\d{6}".to_string())),
            line(Field::Address, "Address"),
            line(Field::Qualification, "Qualification"),
            line(Field::Specialization, "Specialization"),
            line(Field::Experience, "Experience"),
            line(Field::Sectors, "Sectors"),
            line(Field::Skills, "Skills"),
            line(Field::Mark, "Mark"),
            line(Field::College, "College"),
            label(Field::YearGap, &["Year Gap"], ValueClass::Number),
            label(Field::PassingYear, &["Passing Year"], ValueClass::Year),
            line(Field::PreferredLocation, "Preferred Location"),
        ],
    }
}

/// Section-header ruleset for designed, multi-section resumes.
pub fn sections() -> PatternRuleset {
    PatternRuleset {
        name: "sections".to_string(),
        description: "Contact details by pattern, body fields between section headers"
            .to_string(),
        rules: vec![
            label(Field::Name, &["Name"], ValueClass::Words).or_else(ExtractionRule::PersonName),
            pattern(Field::Phone, patterns::PHONE),
            pattern(Field::Email, patterns::EMAIL),
            pattern(Field::LinkedIn, patterns::LINKEDIN),
            label(
                Field::Location,
                &["Location"],
                ValueClass::Pattern(r"[\w \t,]+".to_string()),
            ),
            section(Field::Summary, "SUMMARY", "EXPERIENCE"),
            section(Field::Experience, "EXPERIENCE", "EDUCATION"),
            section(Field::Education, "EDUCATION", "SKILLS"),
            section(Field::Skills, "SKILLS", "PROJECTS"),
            section(Field::Projects, "PROJECTS", "ACHIEVEMENTS"),
            section(Field::Achievements, "ACHIEVEMENTS", "www.enhancv.com"),
        ],
    }
}

/// Entity ruleset: resolver-backed name, free-standing contact patterns.
pub fn entity() -> PatternRuleset {
    PatternRuleset {
        name: "entity".to_string(),
        description: "Name from a person-name resolver, contact details anywhere in the text"
            .to_string(),
        rules: vec![
            FieldRule::new(Field::Name, ExtractionRule::PersonName),
            pattern(Field::Phone, patterns::PHONE),
            pattern(Field::Email, patterns::EMAIL),
            pattern(Field::Dob, patterns::DOB),
            pattern(Field::Gender, patterns::GENDER),
            pattern(Field::Pincode, patterns::PINCODE),
            line(Field::Address, "Address"),
            line(Field::Qualification, "Qualification"),
            line(Field::Specialization, "Specialization"),
            line(Field::Experience, "Experience"),
            line(Field::Sectors, "Sectors"),
            line(Field::Skills, "Skills"),
            line(Field::Mark, "Mark"),
            line(Field::College, "College"),
            line(Field::YearGap, "Year Gap"),
            label(Field::PassingYear, &["Passing Year"], ValueClass::Year),
            line(Field::PreferredLocation, "Preferred Location"),
        ],
    }
}
