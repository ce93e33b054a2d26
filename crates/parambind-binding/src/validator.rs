//! Validation of bound objects

use crate::target::{BoundValue, TargetType};
use parambind_core::exception::Result;
use parambind_validators::ViolationList;

/// Checks a bound object and reports every violation it finds
pub trait ObjectValidator: Send + Sync {
	/// Validate `value` for `groups`; an empty list means it is valid
	fn validate(
		&self,
		value: &BoundValue,
		target: &TargetType,
		groups: &[String],
	) -> Result<ViolationList>;
}

/// Runs the constraints the target type declares through its `Validate` impl
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintValidator;

impl ConstraintValidator {
	pub fn new() -> Self {
		Self
	}
}

impl ObjectValidator for ConstraintValidator {
	fn validate(
		&self,
		value: &BoundValue,
		target: &TargetType,
		groups: &[String],
	) -> Result<ViolationList> {
		target.validate(value, groups)
	}
}
