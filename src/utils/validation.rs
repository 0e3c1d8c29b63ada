//! Shared validation rules for titles and free-text fields.
//!
//! Every entry point (CLI form, CSV import, session API) goes through these so
//! a record is checked once before it reaches a store.

use crate::error::{QaError, Result};

/// Maximum length for test case titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for descriptions, steps, expected results and notes.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Validates a test case title.
///
/// Rules:
/// - Must not be empty or whitespace-only after trimming
/// - Must not exceed MAX_TITLE_LENGTH characters
/// - Must not contain control characters (including newlines)
pub fn validate_title(title: &str) -> Result<()> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(QaError::EmptyTitle);
    }

    let actual = trimmed.chars().count();
    if actual > MAX_TITLE_LENGTH {
        return Err(QaError::TitleTooLong {
            max: MAX_TITLE_LENGTH,
            actual,
        });
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(QaError::InvalidInput(
            "Title cannot contain control characters or newlines".to_string(),
        ));
    }

    Ok(())
}

/// Validates a multi-line text field.
///
/// Newlines, carriage returns and tabs are allowed; other control characters
/// are not.
pub fn validate_text(text: &str, field_name: &str) -> Result<()> {
    let actual = text.chars().count();
    if actual > MAX_TEXT_LENGTH {
        return Err(QaError::InvalidInput(format!(
            "{field_name} too long: {actual} characters (max: {MAX_TEXT_LENGTH})"
        )));
    }

    if text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(QaError::InvalidInput(format!(
            "{field_name} contains invalid control characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_valid() {
        assert!(validate_title("Login with valid credentials").is_ok());
        assert!(validate_title("  padded  ").is_ok());
    }

    #[test]
    fn test_validate_title_empty() {
        assert!(matches!(validate_title(""), Err(QaError::EmptyTitle)));
        assert!(matches!(validate_title(" \t "), Err(QaError::EmptyTitle)));
    }

    #[test]
    fn test_validate_title_too_long() {
        let title = "x".repeat(MAX_TITLE_LENGTH + 1);
        match validate_title(&title) {
            Err(QaError::TitleTooLong { max, actual }) => {
                assert_eq!(max, MAX_TITLE_LENGTH);
                assert_eq!(actual, MAX_TITLE_LENGTH + 1);
            }
            other => panic!("expected TitleTooLong, got {other:?}"),
        }
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_title_control_chars() {
        assert!(validate_title("line one\nline two").is_err());
        assert!(validate_title("bell\x07").is_err());
    }

    #[test]
    fn test_validate_text_allows_newlines() {
        assert!(validate_text("1. open\n2. click\r\n3. verify\t", "Steps").is_ok());
        let err = validate_text("bad\x00", "Steps").unwrap_err();
        assert!(err.to_string().contains("Steps"));
    }
}
