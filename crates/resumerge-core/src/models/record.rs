//! Resume record model with a fixed, canonical field set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named field of a resume record.
///
/// Declaration order is the canonical column order of the persisted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Phone,
    Email,
    LinkedIn,
    Location,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Achievements,
    #[serde(rename = "DOB")]
    Dob,
    Gender,
    Pincode,
    Address,
    Qualification,
    Specialization,
    Sectors,
    Mark,
    College,
    YearGap,
    PassingYear,
    PreferredLocation,
}

impl Field {
    /// Number of canonical fields.
    pub const COUNT: usize = 23;

    /// All fields in canonical order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::Name,
        Field::Phone,
        Field::Email,
        Field::LinkedIn,
        Field::Location,
        Field::Summary,
        Field::Experience,
        Field::Education,
        Field::Skills,
        Field::Projects,
        Field::Achievements,
        Field::Dob,
        Field::Gender,
        Field::Pincode,
        Field::Address,
        Field::Qualification,
        Field::Specialization,
        Field::Sectors,
        Field::Mark,
        Field::College,
        Field::YearGap,
        Field::PassingYear,
        Field::PreferredLocation,
    ];

    /// Canonical column header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Phone => "Phone",
            Field::Email => "Email",
            Field::LinkedIn => "LinkedIn",
            Field::Location => "Location",
            Field::Summary => "Summary",
            Field::Experience => "Experience",
            Field::Education => "Education",
            Field::Skills => "Skills",
            Field::Projects => "Projects",
            Field::Achievements => "Achievements",
            Field::Dob => "DOB",
            Field::Gender => "Gender",
            Field::Pincode => "Pincode",
            Field::Address => "Address",
            Field::Qualification => "Qualification",
            Field::Specialization => "Specialization",
            Field::Sectors => "Sectors",
            Field::Mark => "Mark",
            Field::College => "College",
            Field::YearGap => "YearGap",
            Field::PassingYear => "PassingYear",
            Field::PreferredLocation => "PreferredLocation",
        }
    }

    /// Map a column header to a field.
    ///
    /// Matching ignores case and spaces, so `"Year Gap"` and `"YearGap"` are
    /// the same column. `"Number"` is the phone column of older sheets.
    pub fn from_header(header: &str) -> Option<Field> {
        let squashed: String = header
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        if squashed == "number" {
            return Some(Field::Phone);
        }

        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(&squashed))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_header(s).ok_or_else(|| format!("unknown field: {}", s))
    }
}

/// A structured resume: one optional value per canonical field.
///
/// Every record carries the full field set; `None` is the "unknown" value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Field, Option<String>>",
    into = "BTreeMap<Field, Option<String>>"
)]
pub struct ResumeRecord {
    values: [Option<String>; Field::COUNT],
}

impl ResumeRecord {
    /// Create a record with every field unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Set a field value.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        self.values[field.index()] = value;
    }

    /// Builder-style setter.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Iterate over all fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        Field::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    /// Apply `f` to every value, in canonical order.
    pub fn map_values(self, mut f: impl FnMut(String) -> Option<String>) -> Self {
        Self {
            values: self.values.map(|v| v.and_then(&mut f)),
        }
    }

    /// Number of known (non-`None`) fields.
    pub fn known_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

impl From<BTreeMap<Field, Option<String>>> for ResumeRecord {
    fn from(map: BTreeMap<Field, Option<String>>) -> Self {
        let mut record = ResumeRecord::new();
        for (field, value) in map {
            record.set(field, value);
        }
        record
    }
}

impl From<ResumeRecord> for BTreeMap<Field, Option<String>> {
    fn from(record: ResumeRecord) -> Self {
        Field::ALL.into_iter().zip(record.values).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_order_matches_discriminants() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_from_header_aliases() {
        assert_eq!(Field::from_header("Email"), Some(Field::Email));
        assert_eq!(Field::from_header("email"), Some(Field::Email));
        assert_eq!(Field::from_header("Number"), Some(Field::Phone));
        assert_eq!(Field::from_header("Year Gap"), Some(Field::YearGap));
        assert_eq!(Field::from_header("Passing Year"), Some(Field::PassingYear));
        assert_eq!(
            Field::from_header("Preferred Location"),
            Some(Field::PreferredLocation)
        );
        assert_eq!(Field::from_header("DOB"), Some(Field::Dob));
        assert_eq!(Field::from_header("Salary"), None);
    }

    #[test]
    fn test_new_record_has_full_shape() {
        let record = ResumeRecord::new();
        assert_eq!(record.iter().count(), Field::COUNT);
        assert_eq!(record.known_count(), 0);
    }

    #[test]
    fn test_serde_keeps_every_field() {
        let record = ResumeRecord::new()
            .with(Field::Name, "Jane Doe")
            .with(Field::Dob, "01-02-1990");

        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), Field::COUNT);
        assert_eq!(obj["Name"], "Jane Doe");
        assert_eq!(obj["DOB"], "01-02-1990");
        assert!(obj["Email"].is_null());

        let back: ResumeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_deserialize_partial_map() {
        let back: ResumeRecord = serde_json::from_str(r#"{"Email": "a@b.co"}"#).unwrap();
        assert_eq!(back.get(Field::Email), Some("a@b.co"));
        assert_eq!(back.known_count(), 1);
    }
}
