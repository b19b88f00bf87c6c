use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("unknown appointment status: {0}")]
    UnknownStatus(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid time {0:?} (expected HH:MM)")]
    InvalidTime(String),
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
