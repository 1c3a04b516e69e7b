use chrono::NaiveDate;
use thiserror::Error;

/// Rejections produced by the input validators.
///
/// These never reach the data store: the console re-prompts until the
/// operator supplies a value that parses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Use HH:MM (24-hour format)")]
    InvalidTime(String),

    #[error("Appointment date {0} cannot be in the past")]
    PastDate(NaiveDate),

    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Invalid gender '{0}'. Expected Male, Female or Other")]
    InvalidGender(String),

    #[error("Invalid blood group '{0}'. Expected one of A+, A-, B+, B-, AB+, AB-, O+, O-")]
    InvalidBloodGroup(String),

    #[error("Invalid status '{0}'")]
    InvalidStatus(String),

    #[error("Invalid ID '{0}'. Expected a positive number")]
    InvalidId(String),

    #[error("Invalid choice '{value}'. Please select 1-{max}")]
    InvalidChoice { value: String, max: usize },

    #[error("{field} must not be empty")]
    Empty { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    pub fn invalid_amount(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn empty(field: impl Into<String>) -> Self {
        Self::Empty {
            field: field.into(),
        }
    }

    pub fn too_long(field: impl Into<String>, max: usize) -> Self {
        Self::TooLong {
            field: field.into(),
            max,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::InvalidDate("2024/01/01".into());
        assert_eq!(err.to_string(), "Invalid date '2024/01/01'. Use YYYY-MM-DD");

        let err = ValidationError::InvalidChoice {
            value: "7".into(),
            max: 3,
        };
        assert_eq!(err.to_string(), "Invalid choice '7'. Please select 1-3");

        let err = ValidationError::empty("First Name");
        assert_eq!(err.to_string(), "First Name must not be empty");

        let err = ValidationError::too_long("Email Address", 100);
        assert_eq!(err.to_string(), "Email Address must be at most 100 characters");
    }
}
