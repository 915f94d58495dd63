//! Person-name resolution for rules of kind `person_name`.

use super::rules::patterns::{EMAIL_PATTERN, HEADER_WORDS, PHONE_PATTERN, URL_PATTERN};

/// Capability that finds a person's name in free text.
///
/// Implementations may wrap an entity recognizer; the extractor only sees
/// this trait.
pub trait PersonNameResolver: Send + Sync {
    fn find_person_name(&self, text: &str) -> Option<String>;
}

impl<F> PersonNameResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn find_person_name(&self, text: &str) -> Option<String> {
        self(text)
    }
}

/// Picks the first heading-like line that reads as a name.
///
/// Resumes usually open with the candidate's name on its own line: two to
/// four capitalised words, no digits, no contact details.
#[derive(Debug, Clone)]
pub struct HeadingNameResolver {
    max_lines: usize,
}

impl HeadingNameResolver {
    pub fn new() -> Self {
        Self { max_lines: 8 }
    }

    /// Number of non-empty lines from the top that are considered.
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    fn looks_like_name(line: &str) -> bool {
        if EMAIL_PATTERN.is_match(line) || PHONE_PATTERN.is_match(line) || URL_PATTERN.is_match(line)
        {
            return false;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        if !(2..=4).contains(&words.len()) {
            return false;
        }

        words.iter().all(|w| {
            let mut chars = w.chars();
            let starts_upper = chars.next().is_some_and(|c| c.is_uppercase());
            let rest_ok = w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\''));
            starts_upper && rest_ok && !HEADER_WORDS.is_match(w.trim_end_matches('.'))
        })
    }
}

impl Default for HeadingNameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonNameResolver for HeadingNameResolver {
    fn find_person_name(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(self.max_lines)
            .find(|l| Self::looks_like_name(l))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_heading_line() {
        let text = "\n  Jane Q. Doe \njane@x.com | 9876543210\nSUMMARY\n...";
        assert_eq!(
            HeadingNameResolver::new().find_person_name(text),
            Some("Jane Q. Doe".to_string())
        );
    }

    #[test]
    fn test_all_caps_name() {
        let text = "BISWOJIT BISWAL\nSoftware Engineer at Acme 2020";
        assert_eq!(
            HeadingNameResolver::new().find_person_name(text),
            Some("BISWOJIT BISWAL".to_string())
        );
    }

    #[test]
    fn test_skips_headers_and_contact_lines() {
        let text = "CURRICULUM VITAE\nPersonal Details\nEmail: a@b.co\nRavi Kumar\n";
        assert_eq!(
            HeadingNameResolver::new().find_person_name(text),
            Some("Ravi Kumar".to_string())
        );
    }

    #[test]
    fn test_no_name_in_window() {
        let text = "1. intro\n2. more\nJohn Smith";
        let resolver = HeadingNameResolver::new().with_max_lines(2);
        assert_eq!(resolver.find_person_name(text), None);
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |_: &str| Some("Fixed Name".to_string());
        assert_eq!(resolver.find_person_name("x"), Some("Fixed Name".to_string()));
    }
}
