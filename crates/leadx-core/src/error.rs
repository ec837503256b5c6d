// crates/leadx-core/src/error.rs

use thiserror::Error;

use leadx_repository::RepositoryError;
use leadx_sheets::SheetError;

/// A form submission that failed its checks. `Display` is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Map at least Email or Phone to continue.")]
    MappingIncomplete,

    #[error("Please enter a template title.")]
    TitleRequired,

    #[error("Please enter an email subject line.")]
    SubjectRequired,

    #[error("Please enter the message body.")]
    BodyRequired,

    #[error("New password and confirmation must match.")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },

    #[error("Please enter a note.")]
    NoteRequired,

    #[error("Choose a {step} before continuing.")]
    StepIncomplete { step: &'static str },
}

impl ValidationError {
    /// Short headline for the notification.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MappingIncomplete => "Mapping incomplete",
            ValidationError::TitleRequired => "Title Required",
            ValidationError::SubjectRequired => "Subject Required",
            ValidationError::BodyRequired => "Body Required",
            ValidationError::PasswordMismatch => "Passwords don't match",
            ValidationError::PasswordTooShort { .. } => "Password too short",
            ValidationError::NoteRequired => "Note Required",
            ValidationError::StepIncomplete { .. } => "Step incomplete",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct LabelError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum LeadxError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid value: {0}")]
    Label(#[from] LabelError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{operation} failed: {message}")]
    Simulated {
        operation: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LeadxError>;
