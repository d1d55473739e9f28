//! Player name validation for leaderboard submissions

/// Maximum player name length, in characters.
pub const MAX_NAME_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Name is empty")]
    Blank,

    #[error("Name is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Name contains control characters")]
    ControlCharacters,
}

/// Trim `raw` and check it is usable as a leaderboard name.
pub fn validate_player_name(raw: &str) -> Result<String, NameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NameError::Blank);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(NameError::TooLong {
            max: MAX_NAME_CHARS,
        });
    }
    if name.chars().any(char::is_control) {
        return Err(NameError::ControlCharacters);
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts() {
        assert_eq!(validate_player_name("  Ana  ").unwrap(), "Ana");
        assert_eq!(validate_player_name("Zoë 2").unwrap(), "Zoë 2");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(validate_player_name(""), Err(NameError::Blank));
        assert_eq!(validate_player_name(" \t "), Err(NameError::Blank));
    }

    #[test]
    fn rejects_long_names_by_chars_not_bytes() {
        assert!(validate_player_name(&"é".repeat(MAX_NAME_CHARS)).is_ok());
        assert_eq!(
            validate_player_name(&"a".repeat(MAX_NAME_CHARS + 1)),
            Err(NameError::TooLong { max: MAX_NAME_CHARS })
        );
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(validate_player_name("a\u{7}b"), Err(NameError::ControlCharacters));
    }
}
