use serde::Deserialize;

use crate::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordChange {
    /// Mismatch is reported before length.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.new != self.confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.new.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(new: &str, confirm: &str) -> PasswordChange {
        PasswordChange {
            current: "hunter2".to_string(),
            new: new.to_string(),
            confirm: confirm.to_string(),
        }
    }

    #[test]
    fn mismatch_wins_over_length() {
        assert_eq!(
            change("short", "shorter").validate(),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn seven_characters_is_too_short() {
        let err = change("abcdefg", "abcdefg").validate().unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 8 characters.");
        assert_eq!(err.title(), "Password too short");
    }

    #[test]
    fn eight_characters_is_accepted() {
        assert_eq!(change("abcdefgh", "abcdefgh").validate(), Ok(()));
    }
}
