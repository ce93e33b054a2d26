//! Constraint validators for parambind
//!
//! This crate provides the rule validators used to check bound request
//! objects, together with the group-aware [`Constraints`] collector and the
//! [`ViolationList`] returned when an object does not satisfy its rules.
//!
//! ## Declaring constraints
//!
//! ```
//! use parambind_validators::{Constraints, EmailValidator, MinLengthValidator, Validate};
//!
//! #[derive(Default)]
//! struct CreateUserDto {
//!     username: String,
//!     email: String,
//! }
//!
//! impl Validate for CreateUserDto {
//!     fn constraints(&self, c: &mut Constraints) {
//!         c.check("username", self.username.as_str(), &MinLengthValidator::new(3), &["create"])
//!             .check("email", self.email.as_str(), &EmailValidator::new(), &[]);
//!     }
//! }
//!
//! let dto = CreateUserDto::default();
//! let violations = dto.validate_groups(&["create".to_string()]);
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].property_path, "username");
//! ```

pub(crate) mod lazy_patterns;

pub mod constraints;
pub mod errors;
pub mod numeric;
pub mod string;
pub mod violation;

pub use constraints::{Constraints, DEFAULT_GROUP, Validate};
pub use errors::{ValidationError, ValidationResult};
pub use numeric::{MaxValueValidator, MinValueValidator, RangeValidator};
pub use string::{
	EmailValidator, MaxLengthValidator, MinLengthValidator, NotBlankValidator, RegexValidator,
};
pub use violation::{ConstraintViolation, ViolationList};

/// Re-export commonly used types
pub mod prelude {
	pub use super::constraints::{Constraints, DEFAULT_GROUP, Validate};
	pub use super::errors::{ValidationError, ValidationResult};
	pub use super::numeric::{MaxValueValidator, MinValueValidator, RangeValidator};
	pub use super::string::{
		EmailValidator, MaxLengthValidator, MinLengthValidator, NotBlankValidator,
		RegexValidator,
	};
	pub use super::violation::{ConstraintViolation, ViolationList};
	pub use super::Validator;
}

/// Trait for rule validators
pub trait Validator<T: ?Sized> {
	fn validate(&self, value: &T) -> ValidationResult<()>;
}
