//! Numeric validators

use crate::{ValidationError, ValidationResult, Validator};
use std::fmt::Display;

/// Minimum value validator
#[derive(Debug, Clone, Copy)]
pub struct MinValueValidator<T> {
	min: T,
}

impl<T> MinValueValidator<T> {
	pub fn new(min: T) -> Self {
		Self { min }
	}
}

impl<T: PartialOrd + Display> Validator<T> for MinValueValidator<T> {
	fn validate(&self, value: &T) -> ValidationResult<()> {
		if *value < self.min {
			return Err(ValidationError::TooSmall {
				value: value.to_string(),
				min: self.min.to_string(),
			});
		}
		Ok(())
	}
}

/// Maximum value validator
#[derive(Debug, Clone, Copy)]
pub struct MaxValueValidator<T> {
	max: T,
}

impl<T> MaxValueValidator<T> {
	pub fn new(max: T) -> Self {
		Self { max }
	}
}

impl<T: PartialOrd + Display> Validator<T> for MaxValueValidator<T> {
	fn validate(&self, value: &T) -> ValidationResult<()> {
		if *value > self.max {
			return Err(ValidationError::TooLarge {
				value: value.to_string(),
				max: self.max.to_string(),
			});
		}
		Ok(())
	}
}

/// Inclusive range validator
#[derive(Debug, Clone, Copy)]
pub struct RangeValidator<T> {
	min: MinValueValidator<T>,
	max: MaxValueValidator<T>,
}

impl<T: Copy> RangeValidator<T> {
	/// Creates a validator accepting `min..=max`.
	///
	/// # Examples
	///
	/// ```
	/// use parambind_validators::{RangeValidator, Validator};
	///
	/// let validator = RangeValidator::new(0, 120);
	/// assert!(validator.validate(&30).is_ok());
	/// assert!(validator.validate(&121).is_err());
	/// ```
	pub fn new(min: T, max: T) -> Self {
		Self {
			min: MinValueValidator::new(min),
			max: MaxValueValidator::new(max),
		}
	}
}

impl<T: PartialOrd + Display> Validator<T> for RangeValidator<T> {
	fn validate(&self, value: &T) -> ValidationResult<()> {
		self.min.validate(value)?;
		self.max.validate(value)
	}
}
