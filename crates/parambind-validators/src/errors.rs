//! Rule-level validation errors

use thiserror::Error;

/// Error returned by a single rule validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("Length too short: {length} (minimum: {min})")]
	TooShort { length: usize, min: usize },

	#[error("Length too long: {length} (maximum: {max})")]
	TooLong { length: usize, max: usize },

	#[error("Value too small: {value} (minimum: {min})")]
	TooSmall { value: String, min: String },

	#[error("Value too large: {value} (maximum: {max})")]
	TooLarge { value: String, max: String },

	#[error("Invalid email address: {0}")]
	InvalidEmail(String),

	#[error("Value does not match pattern: {0}")]
	PatternMismatch(String),

	#[error("Value must not be blank")]
	Blank,

	#[error("{0}")]
	Custom(String),
}

impl ValidationError {
	/// Stable machine-readable code for this error kind
	///
	/// # Examples
	///
	/// ```
	/// use parambind_validators::ValidationError;
	///
	/// assert_eq!(ValidationError::Blank.code(), "not_blank");
	/// assert_eq!(ValidationError::TooShort { length: 1, min: 3 }.code(), "too_short");
	/// ```
	pub fn code(&self) -> &'static str {
		match self {
			Self::TooShort { .. } => "too_short",
			Self::TooLong { .. } => "too_long",
			Self::TooSmall { .. } => "too_small",
			Self::TooLarge { .. } => "too_large",
			Self::InvalidEmail(_) => "invalid_email",
			Self::PatternMismatch(_) => "pattern_mismatch",
			Self::Blank => "not_blank",
			Self::Custom(_) => "custom",
		}
	}
}

/// Result of a single rule validation
pub type ValidationResult<T> = Result<T, ValidationError>;
