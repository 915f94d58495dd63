//! Common regex patterns for resume extraction.
//!
//! The `&str` constants are embedded in the built-in rulesets, which are plain
//! data and get compiled per ruleset. The compiled statics are used directly
//! by code that needs them outside a ruleset.

use lazy_static::lazy_static;
use regex::Regex;

/// Ten-digit phone number.
pub const PHONE: &str = r"\b\d{10}\b";

/// Email address.
pub const EMAIL: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

/// Public LinkedIn profile URL.
pub const LINKEDIN: &str = r"(?i)(https?://(?:www\.)?linkedin\.com/in/[\w-]+)";

/// Date of birth as DD-MM-YYYY.
pub const DOB: &str = r"\b\d{2}-\d{2}-\d{4}\b";

/// Date of birth after a label: DD-MM-YY or DD-MM-YYYY.
pub const DOB_LABELED_VALUE: &str = r"\d{2}-\d{2}-\d{2}(?:\d{2})?";

/// Gender keyword.
pub const GENDER: &str = r"(?i)\b(Male|Female|Other)\b";

/// Six-digit postal index number.
pub const PINCODE: &str = r"\b\d{6}\b";

lazy_static! {
    pub static ref EMAIL_PATTERN: Regex = Regex::new(EMAIL).unwrap();

    pub static ref PHONE_PATTERN: Regex = Regex::new(
        r"(?:\+\d{1,3}[\s\-]?)?\d{3}[\s\-]?\d{3}[\s\-]?\d{4}"
    ).unwrap();

    pub static ref URL_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:https?://|www\.)\S+"
    ).unwrap();

    // Words commonly used as section headers; never part of a person name.
    pub static ref HEADER_WORDS: Regex = Regex::new(
        r"(?i)^(?:resume|curriculum|vitae|cv|summary|profile|objective|experience|education|skills|projects|achievements|contact|references|declaration|personal|details)$"
    ).unwrap();
}
