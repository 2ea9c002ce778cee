use crate::models::UserRole;
use thiserror::Error;

pub const MIN_USERNAME_CHARS: usize = 2;
pub const MAX_STORY_NAME_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username must be at least 2 characters.")]
    UsernameTooShort,

    #[error("Please select a role.")]
    MissingRole,

    #[error("Story name cannot be empty.")]
    StoryNameEmpty,

    #[error("Story name too long.")]
    StoryNameTooLong,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub role: Option<String>,
}

impl LoginForm {
    /// Checks every field, collecting all problems rather than stopping at the first.
    pub fn validate(&self) -> Result<(String, UserRole), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.username.chars().count() < MIN_USERNAME_CHARS {
            errors.push(ValidationError::UsernameTooShort);
        }

        let role = self.role.as_deref().and_then(|r| r.parse::<UserRole>().ok());
        if role.is_none() {
            errors.push(ValidationError::MissingRole);
        }

        match role {
            Some(role) if errors.is_empty() => Ok((self.username.clone(), role)),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoryForm {
    pub story_name: String,
}

impl StoryForm {
    pub fn validate(&self) -> Result<String, ValidationError> {
        let length = self.story_name.chars().count();
        if length == 0 {
            Err(ValidationError::StoryNameEmpty)
        } else if length > MAX_STORY_NAME_CHARS {
            Err(ValidationError::StoryNameTooLong)
        } else {
            Ok(self.story_name.clone())
        }
    }
}
