//! Document field validation, literal matching, and activity constants.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository layer and the API handlers.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Activity type constants
// ---------------------------------------------------------------------------

pub const ACTIVITY_CREATED: &str = "created";
pub const ACTIVITY_UPDATED: &str = "updated";
pub const ACTIVITY_DELETED: &str = "deleted";

/// All valid activity types.
pub const VALID_ACTIVITY_TYPES: &[&str] =
    &[ACTIVITY_CREATED, ACTIVITY_UPDATED, ACTIVITY_DELETED];

// ---------------------------------------------------------------------------
// Change description constants
// ---------------------------------------------------------------------------

/// Change description recorded on the version created alongside a document.
pub const CHANGE_INITIAL_VERSION: &str = "Initial version";

/// Change description recorded on versions created by updates.
pub const CHANGE_DOCUMENT_UPDATED: &str = "Document updated";

/// Feed line for an activity, e.g. `Created document "Onboarding"`.
///
/// Both storage backends record this string verbatim so the activity feed
/// reads the same regardless of backend.
pub fn activity_description(activity_type: &str, title: &str) -> String {
    let verb = match activity_type {
        ACTIVITY_CREATED => "Created",
        ACTIVITY_UPDATED => "Updated",
        ACTIVITY_DELETED => "Deleted",
        other => other,
    };
    format!("{verb} document \"{title}\"")
}

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_CONTENT_LENGTH: usize = 100_000;
pub const MAX_SUMMARY_LENGTH: usize = 2_000;
pub const MAX_TAG_COUNT: usize = 20;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a document title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate document content (max 100 000 chars).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.len() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a document summary (max 2 000 chars).
pub fn validate_summary(summary: &str) -> Result<(), CoreError> {
    if summary.len() > MAX_SUMMARY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Summary must be at most {MAX_SUMMARY_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate document tags (each non-empty, <= 50 chars, max 20 tags).
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > MAX_TAG_COUNT {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_TAG_COUNT} tags is allowed"
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::Validation("Tags must not be empty".into()));
        }
        if tag.len() > MAX_TAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "Each tag must be at most {MAX_TAG_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Validate an email address (non-empty, <= 255 chars, one `@` with
/// non-empty local and domain parts, no whitespace).
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() {
        return Err(CoreError::Validation("Email must not be empty".into()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Email must not contain whitespace".into(),
        ));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(CoreError::Validation(
            "Email must be a valid address".into(),
        )),
    }
}

/// Validate a display name (non-empty, <= 100 chars).
pub fn validate_display_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Display name must not be empty".into(),
        ));
    }
    if name.len() > MAX_DISPLAY_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Display name must be at most {MAX_DISPLAY_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Literal matching
// ---------------------------------------------------------------------------

/// Case-insensitive literal substring match against a document's
/// searchable fields: title, content, summary, and any tag.
///
/// The in-memory backend applies this per document; the Postgres backend
/// expresses the same predicate with escaped `ILIKE` patterns.
pub fn matches_literal(
    query: &str,
    title: &str,
    content: &str,
    summary: Option<&str>,
    tags: &[String],
) -> bool {
    let needle = query.to_lowercase();
    title.to_lowercase().contains(&needle)
        || content.to_lowercase().contains(&needle)
        || summary.is_some_and(|s| s.to_lowercase().contains(&needle))
        || tags.iter().any(|t| t.to_lowercase().contains(&needle))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_title ------------------------------------------------------

    #[test]
    fn title_rejects_empty() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn title_rejects_over_limit() {
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn title_accepts_reasonable_input() {
        assert!(validate_title("Release Notes").is_ok());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH)).is_ok());
    }

    // -- validate_tags -------------------------------------------------------

    #[test]
    fn tags_reject_empty_entries() {
        assert!(validate_tags(&["ok".to_string(), " ".to_string()]).is_err());
    }

    #[test]
    fn tags_reject_too_many() {
        let tags: Vec<String> = (0..MAX_TAG_COUNT + 1).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&tags).is_err());
    }

    #[test]
    fn tags_accept_empty_list() {
        assert!(validate_tags(&[]).is_ok());
    }

    // -- validate_email ------------------------------------------------------

    #[test]
    fn email_accepts_plain_address() {
        assert!(validate_email("ada@example.com").is_ok());
    }

    #[test]
    fn email_rejects_missing_at() {
        assert!(validate_email("ada.example.com").is_err());
    }

    #[test]
    fn email_rejects_missing_domain_dot() {
        assert!(validate_email("ada@localhost").is_err());
    }

    #[test]
    fn email_rejects_whitespace() {
        assert!(validate_email("ada smith@example.com").is_err());
    }

    // -- activity_description ------------------------------------------------

    #[test]
    fn activity_description_formats_verb_and_title() {
        assert_eq!(
            activity_description(ACTIVITY_CREATED, "Onboarding"),
            "Created document \"Onboarding\""
        );
        assert_eq!(
            activity_description(ACTIVITY_DELETED, "Old Notes"),
            "Deleted document \"Old Notes\""
        );
    }

    // -- matches_literal -----------------------------------------------------

    #[test]
    fn literal_match_is_case_insensitive_on_title() {
        assert!(matches_literal("release", "Release Notes", "", None, &[]));
        assert!(matches_literal("RELEASE", "Release Notes", "", None, &[]));
    }

    #[test]
    fn literal_match_covers_tags() {
        let tags = vec!["beta".to_string()];
        assert!(matches_literal("BETA", "Release Notes", "", None, &tags));
    }

    #[test]
    fn literal_match_covers_summary() {
        assert!(matches_literal(
            "overview",
            "Title",
            "body",
            Some("An Overview of the release"),
            &[]
        ));
    }

    #[test]
    fn literal_match_misses_absent_term() {
        let tags = vec!["beta".to_string()];
        assert!(!matches_literal("gamma", "Release Notes", "", None, &tags));
    }

    #[test]
    fn literal_match_skips_null_summary() {
        assert!(!matches_literal("overview", "Title", "body", None, &[]));
    }
}
