//! Field-level normalisation rules shared by every provider config.

/// Message reported for blank string fields.
pub const EMPTY_STRING_MESSAGE: &str = "Value cannot be empty string";

/// Trim `value`, rejecting it when nothing is left.
pub fn empty_string(value: &str) -> Result<String, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EMPTY_STRING_MESSAGE);
    }
    Ok(trimmed.to_string())
}

pub fn to_lowercase(value: String) -> String {
    if value.chars().any(char::is_uppercase) {
        value.to_lowercase()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_trims_surrounding_whitespace() {
        assert_eq!(empty_string("  gpt-4o \n").unwrap(), "gpt-4o");
    }

    #[test]
    fn test_empty_string_rejects_whitespace_only() {
        assert_eq!(empty_string(" \t ").unwrap_err(), EMPTY_STRING_MESSAGE);
        assert_eq!(empty_string("").unwrap_err(), EMPTY_STRING_MESSAGE);
    }

    #[test]
    fn test_to_lowercase_is_stable() {
        let once = to_lowercase("GPT-4o".to_string());
        assert_eq!(once, "gpt-4o");
        assert_eq!(to_lowercase(once.clone()), once);
    }
}
