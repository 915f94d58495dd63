//! Structural normalization of extracted records.

use crate::models::record::ResumeRecord;

/// Trim every value and collapse blank values to unknown.
///
/// Values are otherwise left alone: no case folding, no reformatting.
pub fn normalize(record: ResumeRecord) -> ResumeRecord {
    record.map_values(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == value.len() {
            Some(value)
        } else {
            Some(trimmed.to_string())
        }
    })
}
