//! Group-aware constraint collection
//!
//! Objects describe their rules by implementing [`Validate`]. Each rule is
//! attached to zero or more validation groups; a rule without groups belongs
//! to [`DEFAULT_GROUP`]. Validating with no requested groups is the same as
//! requesting `["Default"]`.

use crate::{ConstraintViolation, Validator, ViolationList};
use std::fmt::Display;

/// Group used by rules and requests that do not name one
pub const DEFAULT_GROUP: &str = "Default";

/// Collects violations for the active validation groups
#[derive(Debug, Clone)]
pub struct Constraints {
	groups: Vec<String>,
	prefix: Option<String>,
	violations: ViolationList,
}

impl Constraints {
	/// Creates a collector for the requested groups.
	///
	/// # Examples
	///
	/// ```
	/// use parambind_validators::Constraints;
	///
	/// let c = Constraints::new(Vec::<String>::new());
	/// assert!(c.is_active(&[]));
	/// assert!(!c.is_active(&["create"]));
	///
	/// let c = Constraints::new(["create"]);
	/// assert!(c.is_active(&["create", "update"]));
	/// assert!(!c.is_active(&[]));
	/// ```
	pub fn new<I, S>(groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut groups: Vec<String> = groups.into_iter().map(Into::into).collect();
		if groups.is_empty() {
			groups.push(DEFAULT_GROUP.to_string());
		}
		Self {
			groups,
			prefix: None,
			violations: ViolationList::new(),
		}
	}

	/// Requested groups, never empty
	pub fn groups(&self) -> &[String] {
		&self.groups
	}

	/// Whether a rule declared for `rule_groups` runs under the requested groups
	pub fn is_active(&self, rule_groups: &[&str]) -> bool {
		if rule_groups.is_empty() {
			return self.groups.iter().any(|g| g == DEFAULT_GROUP);
		}
		rule_groups
			.iter()
			.any(|rule_group| self.groups.iter().any(|g| g == rule_group))
	}

	/// Runs `validator` against `value` when any of `groups` is active
	pub fn check<T, V>(
		&mut self,
		path: &str,
		value: &T,
		validator: &V,
		groups: &[&str],
	) -> &mut Self
	where
		T: Display + ?Sized,
		V: Validator<T>,
	{
		if !self.is_active(groups) {
			return self;
		}
		if let Err(error) = validator.validate(value) {
			let violation =
				ConstraintViolation::new(self.path(path), error.to_string(), error.code())
					.with_invalid_value(value.to_string());
			self.violations.push(violation);
		}
		self
	}

	/// Like [`check`](Self::check), skipping `None`
	pub fn check_optional<T, V>(
		&mut self,
		path: &str,
		value: Option<&T>,
		validator: &V,
		groups: &[&str],
	) -> &mut Self
	where
		T: Display + ?Sized,
		V: Validator<T>,
	{
		match value {
			Some(value) => self.check(path, value, validator, groups),
			None => self,
		}
	}

	/// Records a violation computed by the caller, when any of `groups` is active
	pub fn add(&mut self, path: &str, message: impl Into<String>, groups: &[&str]) -> &mut Self {
		if self.is_active(groups) {
			self.violations
				.push(ConstraintViolation::new(self.path(path), message, "custom"));
		}
		self
	}

	/// Validates a nested object, prefixing its property paths with `path`
	pub fn nested<T: Validate + ?Sized>(&mut self, path: &str, value: &T) -> &mut Self {
		let mut child = Self {
			groups: self.groups.clone(),
			prefix: Some(self.path(path)),
			violations: ViolationList::new(),
		};
		value.constraints(&mut child);
		self.violations.extend(child.violations);
		self
	}

	pub fn into_violations(self) -> ViolationList {
		self.violations
	}

	fn path(&self, path: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}.{}", prefix, path),
			None => path.to_string(),
		}
	}
}

/// Implemented by types that declare validation rules
pub trait Validate {
	/// Declares the rules of this object. The default declares none.
	fn constraints(&self, _constraints: &mut Constraints) {}

	/// Runs the declared rules for `groups`
	fn validate_groups(&self, groups: &[String]) -> ViolationList {
		let mut constraints = Constraints::new(groups.iter().cloned());
		self.constraints(&mut constraints);
		constraints.into_violations()
	}
}
