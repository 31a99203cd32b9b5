//! Unified error type for the hostel manager.
//!
//! Core functions return [`Result`]; the web layer maps each variant onto an
//! HTTP status in [`crate::web::error`].

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use validator::ValidationErrors;

/// All failures the application can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Password hash could not be produced or parsed
    #[error("Password hashing failed: {message}")]
    PasswordHash {
        /// Underlying hasher error
        message: String,
    },

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A submitted form field failed validation
    #[error("{message}")]
    Validation {
        /// User-facing description of the problem
        message: String,
    },

    /// Negative or non-finite money amount
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Amount that was rejected
        amount: f64,
    },

    /// A unique field collided with an existing record
    #[error("A record with {field} '{value}' already exists")]
    Duplicate {
        /// Name of the unique field
        field: &'static str,
        /// Value that collided
        value: String,
    },

    /// Room lookup failed
    #[error("Room not found: {room}")]
    RoomNotFound {
        /// Room number or id that was looked up
        room: String,
    },

    /// Student lookup failed
    #[error("Student not found: {student}")]
    StudentNotFound {
        /// Student id that was looked up
        student: String,
    },

    /// Booking lookup failed
    #[error("Booking not found: {id}")]
    BookingNotFound {
        /// Booking id
        id: i64,
    },

    /// Feedback lookup failed
    #[error("Feedback not found: {id}")]
    FeedbackNotFound {
        /// Feedback id
        id: i64,
    },

    /// Booking has already left the pending state
    #[error("Booking {id} has already been assigned a room")]
    BookingAlreadyAssigned {
        /// Booking id
        id: i64,
    },

    /// A specific room was requested but it is full
    #[error("Room {room_number} has no beds available")]
    NoBedsAvailable {
        /// Room that was full
        room_number: String,
    },

    /// Unknown username or wrong password
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// Correct password, but the account has a different role than selected
    #[error("Incorrect role selected for this account.")]
    RoleMismatch,

    /// No valid session token on the request
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated, but not an administrator
    #[error("Administrator access required")]
    Forbidden,

    /// The account has no student profile attached
    #[error("Please complete your student profile before continuing.")]
    StudentProfileMissing,
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Maps a unique-index violation to [`Error::Duplicate`]; any other
    /// database error is kept as [`Error::Database`].
    ///
    /// Covers writes that lose a race against a concurrent insert after the
    /// duplicate pre-check passed.
    pub fn on_unique_violation(err: DbErr, field: &'static str, value: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate {
                field,
                value: value.into(),
            },
            _ => Self::Database(err),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::PasswordHash {
            message: err.to_string(),
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid."), ToString::to_string)
                })
            })
            .collect();
        messages.sort();
        messages.dedup();
        Self::validation(messages.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_validation_errors_become_one_message() {
        let mut email = ValidationError::new("email");
        email.message = Some("Enter a valid email address.".into());
        let mut errors = ValidationErrors::new();
        errors.add("email", email);
        errors.add("name", ValidationError::new("length"));

        let Error::Validation { message } = Error::from(errors) else {
            unreachable!("always a validation error");
        };
        assert_eq!(message, "Enter a valid email address. name is invalid.");
    }

    #[test]
    fn test_non_unique_db_error_is_kept() {
        let err = Error::on_unique_violation(DbErr::Custom("boom".into()), "room number", "A-1");
        assert!(matches!(err, Error::Database(_)));
    }
}
