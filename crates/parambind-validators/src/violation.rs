//! Constraint violations produced by object validation

use serde::Serialize;
use std::fmt;
use std::ops::Index;

/// A single failed constraint on a bound object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintViolation {
	/// Dotted path of the offending property (e.g. `address.street`)
	pub property_path: String,
	/// Human-readable message
	pub message: String,
	/// Machine-readable code of the failed rule
	pub code: String,
	/// Rendered offending value, when one is available
	#[serde(skip_serializing_if = "Option::is_none")]
	pub invalid_value: Option<String>,
}

impl ConstraintViolation {
	pub fn new(
		property_path: impl Into<String>,
		message: impl Into<String>,
		code: impl Into<String>,
	) -> Self {
		Self {
			property_path: property_path.into(),
			message: message.into(),
			code: code.into(),
			invalid_value: None,
		}
	}

	pub fn with_invalid_value(mut self, value: impl Into<String>) -> Self {
		self.invalid_value = Some(value.into());
		self
	}
}

impl fmt::Display for ConstraintViolation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.property_path, self.message)
	}
}

/// Ordered list of constraint violations
///
/// # Examples
///
/// ```
/// use parambind_validators::{ConstraintViolation, ViolationList};
///
/// let mut list = ViolationList::new();
/// assert!(list.is_empty());
///
/// list.push(ConstraintViolation::new("email", "Invalid email address: x", "invalid_email"));
/// assert_eq!(list.len(), 1);
/// assert_eq!(list.to_string(), "email: Invalid email address: x");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ViolationList(Vec<ConstraintViolation>);

impl ViolationList {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn push(&mut self, violation: ConstraintViolation) {
		self.0.push(violation);
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, ConstraintViolation> {
		self.0.iter()
	}

	/// Violations reported for one property path
	pub fn for_path<'a>(
		&'a self,
		property_path: &'a str,
	) -> impl Iterator<Item = &'a ConstraintViolation> + 'a {
		self.0
			.iter()
			.filter(move |v| v.property_path == property_path)
	}
}

impl Index<usize> for ViolationList {
	type Output = ConstraintViolation;

	fn index(&self, index: usize) -> &Self::Output {
		&self.0[index]
	}
}

impl Extend<ConstraintViolation> for ViolationList {
	fn extend<I: IntoIterator<Item = ConstraintViolation>>(&mut self, iter: I) {
		self.0.extend(iter);
	}
}

impl FromIterator<ConstraintViolation> for ViolationList {
	fn from_iter<I: IntoIterator<Item = ConstraintViolation>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl From<Vec<ConstraintViolation>> for ViolationList {
	fn from(violations: Vec<ConstraintViolation>) -> Self {
		Self(violations)
	}
}

impl IntoIterator for ViolationList {
	type Item = ConstraintViolation;
	type IntoIter = std::vec::IntoIter<ConstraintViolation>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a ViolationList {
	type Item = &'a ConstraintViolation;
	type IntoIter = std::slice::Iter<'a, ConstraintViolation>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl fmt::Display for ViolationList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, violation) in self.0.iter().enumerate() {
			if i > 0 {
				writeln!(f)?;
			}
			write!(f, "{}", violation)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_serializes_as_array() {
		let list: ViolationList = vec![
			ConstraintViolation::new("username", "Length too short: 1 (minimum: 3)", "too_short")
				.with_invalid_value("a"),
			ConstraintViolation::new("email", "Value must not be blank", "not_blank"),
		]
		.into();

		let json = serde_json::to_value(&list).unwrap();
		assert_eq!(
			json,
			serde_json::json!([
				{
					"property_path": "username",
					"message": "Length too short: 1 (minimum: 3)",
					"code": "too_short",
					"invalid_value": "a"
				},
				{
					"property_path": "email",
					"message": "Value must not be blank",
					"code": "not_blank"
				}
			])
		);
	}

	#[rstest]
	fn test_for_path_filters() {
		let list: ViolationList = vec![
			ConstraintViolation::new("a", "one", "custom"),
			ConstraintViolation::new("b", "two", "custom"),
			ConstraintViolation::new("a", "three", "custom"),
		]
		.into();

		let messages: Vec<_> = list.for_path("a").map(|v| v.message.as_str()).collect();
		assert_eq!(messages, vec!["one", "three"]);
	}

	#[rstest]
	fn test_display_joins_lines() {
		let list: ViolationList = vec![
			ConstraintViolation::new("a", "one", "custom"),
			ConstraintViolation::new("b", "two", "custom"),
		]
		.into();
		assert_eq!(list.to_string(), "a: one\nb: two");
	}
}
