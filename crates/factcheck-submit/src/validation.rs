//! Draft validation
//!
//! Every field is checked, but only a title error blocks a submission.
//! The other errors are reported back to the form.

use factcheck_domain::{
    ClaimDraft, FieldError, MediaType, ValidationReport, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS,
};
use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .expect("URL pattern is valid")
});

/// Field name of the title, the only blocking field
pub const TITLE_FIELD: &str = "title";

/// Field name used for media type errors
pub const MEDIA_TYPE_FIELD: &str = "mediaType";

/// Check the title; `None` when it is acceptable
pub fn validate_title(title: &str) -> Option<String> {
    if title.trim().is_empty() {
        return Some("Title is required".to_string());
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Some(format!(
            "Title must be {} characters or less",
            MAX_TITLE_CHARS
        ));
    }
    None
}

/// Check the description length
pub fn validate_description(description: &str) -> Option<String> {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Some(format!(
            "Description must be {} characters or less",
            MAX_DESCRIPTION_CHARS
        ));
    }
    None
}

/// Check one source; blank sources are fine, they are dropped later
pub fn validate_source(source: &str) -> Option<String> {
    let source = source.trim();
    if source.is_empty() || URL_PATTERN.is_match(source) {
        None
    } else {
        Some("Please enter a valid URL".to_string())
    }
}

/// Parse a media type label as typed into the form
pub fn parse_media_type(raw: &str) -> Result<MediaType, FieldError> {
    MediaType::parse(raw).ok_or_else(|| {
        FieldError::new(
            MEDIA_TYPE_FIELD,
            format!(
                "Media type must be one of: {}",
                MediaType::ALL.map(|m| m.as_str()).join(", ")
            ),
        )
    })
}

/// Validate every field of a draft
///
/// Source errors are keyed `sources[i]` with the row index.
pub fn validate_draft(draft: &ClaimDraft) -> ValidationReport {
    let mut report = ValidationReport::new();

    if let Some(message) = validate_title(&draft.title) {
        report.push(TITLE_FIELD, message);
    }
    if let Some(message) = validate_description(&draft.description) {
        report.push("description", message);
    }
    for (i, source) in draft.sources.iter().enumerate() {
        if let Some(message) = validate_source(source) {
            report.push(format!("sources[{}]", i), message);
        }
    }

    report
}

/// Whether a report prevents submission
pub fn is_blocking(report: &ValidationReport) -> bool {
    report.has(TITLE_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_rules() {
        assert_eq!(validate_title("   ").as_deref(), Some("Title is required"));
        assert!(validate_title(&"a".repeat(100)).is_none());
        assert!(validate_title(&"a".repeat(101)).is_some());
        // Counted in characters, not bytes
        assert!(validate_title(&"é".repeat(100)).is_none());
    }

    #[test]
    fn test_description_limit() {
        assert!(validate_description(&"x".repeat(500)).is_none());
        assert!(validate_description(&"x".repeat(501)).is_some());
    }

    #[test]
    fn test_source_urls() {
        assert!(validate_source("").is_none());
        assert!(validate_source("https://www.example.com/a?b=c").is_none());
        assert!(validate_source("http://news.example.org").is_none());
        assert!(validate_source("example.com").is_some());
        assert!(validate_source("ftp://example.com").is_some());
        assert!(validate_source("https://no-tld").is_some());
    }

    #[test]
    fn test_media_type_labels() {
        assert_eq!(
            parse_media_type("social media post").unwrap(),
            MediaType::SocialMediaPost
        );
        let err = parse_media_type("podcast").unwrap_err();
        assert_eq!(err.field, MEDIA_TYPE_FIELD);
        assert!(err.message.contains("Social Media Post"));
    }

    #[test]
    fn test_only_title_blocks() {
        let mut draft = ClaimDraft::new("Vaccines cause flu");
        draft.description = "d".repeat(600);
        draft.set_source(0, "not a url");
        draft.set_source(2, "https://example.com");

        let report = validate_draft(&draft);
        assert!(report.has("description"));
        assert!(report.has("sources[0]"));
        assert!(!report.has("sources[1]"));
        assert!(!report.has("sources[2]"));
        assert!(!is_blocking(&report));

        draft.title = String::new();
        assert!(is_blocking(&validate_draft(&draft)));
    }
}
