use crate::model::NoteId;
use thiserror::Error;

/// A local precondition failed; nothing was sent to the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Note cannot be empty")]
    EmptyNote,

    #[error("Please enter email and password")]
    MissingCredentials,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password should be at least {0} characters")]
    WeakPassword(usize),

    #[error("Email already in use: {0}")]
    EmailInUse(String),

    #[error("Invalid email or password")]
    InvalidCredential,

    #[error("User not logged in")]
    NotSignedIn,

    #[error("Auth backend error: {0}")]
    Backend(String),
}

/// Failures at the document store boundary.
///
/// Kept `Clone` so the same error can be handed to every listener of a
/// failed subscription and forwarded as a view event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store IO error: {0}")]
    Io(String),

    #[error("Store serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

#[derive(Error, Debug)]
pub enum NotezyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Backend error: {0}")]
    Backend(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, NotezyError>;
