//! Shared-drive link handling for the download step.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FILE_PATH_ID: Regex = Regex::new(r"/file/d/([\w-]+)").unwrap();
    static ref QUERY_ID: Regex = Regex::new(r"[?&]id=([\w-]+)").unwrap();
    static ref CONFIRM_PARAM: Regex = Regex::new(r"confirm=([\w-]+)").unwrap();
    static ref CONFIRM_INPUT: Regex =
        Regex::new(r#"name="confirm"\s+value="([\w-]+)""#).unwrap();
    static ref UUID_INPUT: Regex = Regex::new(r#"name="uuid"\s+value="([\w-]+)""#).unwrap();
}

const DOWNLOAD_BASE: &str = "https://drive.google.com/uc?export=download&id=";

/// Extract the file id from a share link.
///
/// Accepts `.../file/d/<id>/view` links and links carrying an `id=` query
/// parameter. A bare id is returned as-is.
pub fn file_id(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    if let Some(caps) = FILE_PATH_ID.captures(link) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = QUERY_ID.captures(link) {
        return Some(caps[1].to_string());
    }

    let bare = link.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    bare.then(|| link.to_string())
}

/// Direct download URL for a file id.
pub fn download_url(id: &str) -> String {
    format!("{}{}", DOWNLOAD_BASE, id)
}

/// Follow-up URL for the virus-scan warning page served for large files.
///
/// `None` when the page carries no confirm token, e.g. a sign-in page for a
/// file that is not shared.
pub fn confirm_url(id: &str, page: &str) -> Option<String> {
    let token = CONFIRM_INPUT
        .captures(page)
        .or_else(|| CONFIRM_PARAM.captures(page))
        .map(|caps| caps[1].to_string())?;

    let mut url = format!("{}&confirm={}", download_url(id), token);
    if let Some(caps) = UUID_INPUT.captures(page) {
        url.push_str("&uuid=");
        url.push_str(&caps[1]);
    }
    Some(url)
}

/// Whether the first bytes of a download are an HTML page rather than a file.
pub fn is_html(head: &[u8]) -> bool {
    let text = String::from_utf8_lossy(head);
    let start = text
        .trim_start_matches('\u{feff}')
        .trim_start()
        .chars()
        .take(64)
        .collect::<String>()
        .to_ascii_lowercase();
    start.starts_with("<!doctype html") || start.starts_with("<html")
}

/// Pick a file extension from the first bytes of a download.
///
/// HTML pages get `html`, which callers treat as a failed download.
/// `head` may end in the middle of a UTF-8 sequence.
pub fn guess_extension(head: &[u8]) -> &'static str {
    if head.starts_with(b"%PDF") {
        return "pdf";
    }
    if is_html(head) {
        return "html";
    }
    match std::str::from_utf8(head) {
        Ok(_) => "txt",
        Err(e) if e.error_len().is_none() => "txt",
        Err(_) => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_id_from_view_link() {
        assert_eq!(
            file_id("https://drive.google.com/file/d/1AbC-d_E9/view?usp=sharing"),
            Some("1AbC-d_E9".to_string())
        );
    }

    #[test]
    fn test_file_id_from_query() {
        assert_eq!(
            file_id("https://drive.google.com/open?id=XYZ123"),
            Some("XYZ123".to_string())
        );
        assert_eq!(
            file_id("https://drive.google.com/uc?export=download&id=XYZ123"),
            Some("XYZ123".to_string())
        );
    }

    #[test]
    fn test_file_id_bare_and_invalid() {
        assert_eq!(file_id("  1AbC  "), Some("1AbC".to_string()));
        assert_eq!(file_id("https://example.com/resume.pdf"), None);
        assert_eq!(file_id(""), None);
    }

    #[test]
    fn test_download_url() {
        assert_eq!(
            download_url("abc"),
            "https://drive.google.com/uc?export=download&id=abc"
        );
    }

    #[test]
    fn test_guess_extension() {
        assert_eq!(guess_extension(b"%PDF-1.7\n"), "pdf");
        assert_eq!(guess_extension(b"Name: Jane"), "txt");
        assert_eq!(guess_extension(&[0xff, 0xd8, 0xff]), "bin");
        // truncated multi-byte character at the end
        assert_eq!(guess_extension(&"Né".as_bytes()[..2]), "txt");
    }

    const SCAN_WARNING: &str = r#"<!DOCTYPE html><html><head><title>Google Drive - Virus scan warning</title></head>
<body><form id="download-form" action="https://drive.usercontent.google.com/download" method="get">
<input type="hidden" name="id" value="1AbC"><input type="hidden" name="export" value="download">
<input type="hidden" name="confirm" value="t"><input type="hidden" name="uuid" value="a1b2-c3">
</form></body></html>"#;

    #[test]
    fn test_html_pages_are_not_resumes() {
        assert!(is_html(SCAN_WARNING.as_bytes()));
        assert!(is_html(b"\n  <html lang=\"en\"><head><title>Sign in</title>"));
        assert_eq!(guess_extension(SCAN_WARNING.as_bytes()), "html");
        assert!(!is_html(b"Name: Jane\nEmail: jane@x.com\nSkills: HTML, CSS"));
    }

    #[test]
    fn test_confirm_url_from_scan_warning() {
        assert_eq!(
            confirm_url("1AbC", SCAN_WARNING),
            Some("https://drive.google.com/uc?export=download&id=1AbC&confirm=t&uuid=a1b2-c3".to_string())
        );
        assert_eq!(
            confirm_url("1AbC", r#"<a href="/uc?export=download&amp;confirm=Xy_9&amp;id=1AbC">"#),
            Some("https://drive.google.com/uc?export=download&id=1AbC&confirm=Xy_9".to_string())
        );
        assert_eq!(confirm_url("1AbC", "<html><body>Sign in</body></html>"), None);
    }
}
