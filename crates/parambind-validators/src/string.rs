//! String validators

use crate::lazy_patterns::EMAIL_REGEX;
use crate::{ValidationError, ValidationResult, Validator};
use regex::Regex;

/// Minimum length validator, counted in characters
#[derive(Debug, Clone, Copy)]
pub struct MinLengthValidator {
	min: usize,
}

impl MinLengthValidator {
	/// Creates a new MinLengthValidator with the specified minimum length.
	///
	/// # Examples
	///
	/// ```
	/// use parambind_validators::{MinLengthValidator, Validator};
	///
	/// let validator = MinLengthValidator::new(5);
	/// assert!(validator.validate("hello").is_ok());
	/// assert!(validator.validate("hi").is_err());
	/// ```
	pub fn new(min: usize) -> Self {
		Self { min }
	}
}

impl Validator<str> for MinLengthValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		let length = value.chars().count();
		if length < self.min {
			return Err(ValidationError::TooShort {
				length,
				min: self.min,
			});
		}
		Ok(())
	}
}

/// Maximum length validator, counted in characters
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthValidator {
	max: usize,
}

impl MaxLengthValidator {
	/// Creates a new MaxLengthValidator with the specified maximum length.
	///
	/// # Examples
	///
	/// ```
	/// use parambind_validators::{MaxLengthValidator, Validator};
	///
	/// let validator = MaxLengthValidator::new(5);
	/// assert!(validator.validate("hello").is_ok());
	/// assert!(validator.validate("hello!").is_err());
	/// ```
	pub fn new(max: usize) -> Self {
		Self { max }
	}
}

impl Validator<str> for MaxLengthValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		let length = value.chars().count();
		if length > self.max {
			return Err(ValidationError::TooLong {
				length,
				max: self.max,
			});
		}
		Ok(())
	}
}

/// Rejects empty and whitespace-only strings
#[derive(Debug, Clone, Copy, Default)]
pub struct NotBlankValidator;

impl NotBlankValidator {
	pub fn new() -> Self {
		Self
	}
}

impl Validator<str> for NotBlankValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if value.trim().is_empty() {
			return Err(ValidationError::Blank);
		}
		Ok(())
	}
}

/// Email address validator
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl EmailValidator {
	/// Creates a new EmailValidator.
	///
	/// # Examples
	///
	/// ```
	/// use parambind_validators::{EmailValidator, Validator};
	///
	/// let validator = EmailValidator::new();
	/// assert!(validator.validate("user@example.com").is_ok());
	/// assert!(validator.validate("invalid").is_err());
	/// ```
	pub fn new() -> Self {
		Self
	}
}

impl Validator<str> for EmailValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if value.len() > 254 || !EMAIL_REGEX.is_match(value) {
			return Err(ValidationError::InvalidEmail(value.to_string()));
		}
		Ok(())
	}
}

/// Regular expression validator
#[derive(Debug, Clone)]
pub struct RegexValidator {
	regex: Regex,
}

impl RegexValidator {
	/// Compiles `pattern` into a validator.
	///
	/// # Examples
	///
	/// ```
	/// use parambind_validators::{RegexValidator, Validator};
	///
	/// let validator = RegexValidator::new(r"^\d+$").unwrap();
	/// assert!(validator.validate("12345").is_ok());
	/// assert!(validator.validate("abc").is_err());
	/// ```
	pub fn new(pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self {
			regex: Regex::new(pattern)?,
		})
	}
}

impl Validator<str> for RegexValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if !self.regex.is_match(value) {
			return Err(ValidationError::PatternMismatch(
				self.regex.as_str().to_string(),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("user@example.com", true)]
	#[case("first.last+tag@sub.example.org", true)]
	#[case("invalid", false)]
	#[case("no-tld@example", false)]
	#[case("double..dot@example.com", false)]
	#[case("@example.com", false)]
	fn test_email_validator(#[case] input: &str, #[case] valid: bool) {
		assert_eq!(EmailValidator::new().validate(input).is_ok(), valid);
	}

	#[rstest]
	fn test_length_counts_characters_not_bytes() {
		let validator = MaxLengthValidator::new(3);
		assert!(validator.validate("日本語").is_ok());
		assert!(validator.validate("日本語!").is_err());
	}

	#[rstest]
	fn test_min_length_error_reports_lengths() {
		let err = MinLengthValidator::new(3).validate("ab").unwrap_err();
		assert_eq!(err, ValidationError::TooShort { length: 2, min: 3 });
		assert_eq!(err.to_string(), "Length too short: 2 (minimum: 3)");
	}

	#[rstest]
	#[case("", false)]
	#[case("   ", false)]
	#[case(" a ", true)]
	fn test_not_blank(#[case] input: &str, #[case] valid: bool) {
		assert_eq!(NotBlankValidator::new().validate(input).is_ok(), valid);
	}

	#[rstest]
	fn test_regex_validator_invalid_pattern() {
		assert!(RegexValidator::new("(unclosed").is_err());
	}
}
