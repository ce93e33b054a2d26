//! Type descriptors for binding targets
//!
//! Binding metadata names its target with a [`TargetType`]. The descriptor
//! erases the concrete type but keeps the handful of operations the hook
//! needs: build an empty instance, move instances to and from JSON, and run
//! the declared constraints.

use parambind_core::exception::{Error, Result};
use parambind_validators::{Validate, ViolationList};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A mapped object, as stored in the attribute bag
pub type BoundValue = Arc<dyn Any + Send + Sync>;

/// Types that request data can be bound onto
///
/// Implemented automatically for every type with the required bounds.
pub trait Bindable:
	Default + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
}

impl<T> Bindable for T where
	T: Default + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
}

/// Erased description of a [`Bindable`] type
#[derive(Clone, Copy)]
pub struct TargetType {
	type_id: TypeId,
	type_name: &'static str,
	construct: fn() -> BoundValue,
	is_instance: fn(&(dyn Any + Send + Sync)) -> bool,
	to_json: fn(&(dyn Any + Send + Sync)) -> Option<serde_json::Result<Value>>,
	from_json: fn(Value) -> serde_json::Result<BoundValue>,
	validate: fn(&(dyn Any + Send + Sync), &[String]) -> Option<ViolationList>,
}

impl TargetType {
	/// Describe `T`
	///
	/// # Examples
	///
	/// ```
	/// use parambind_binding::TargetType;
	/// use parambind_validators::Validate;
	/// use serde::{Deserialize, Serialize};
	///
	/// #[derive(Default, Serialize, Deserialize)]
	/// struct Search {
	///     q: String,
	/// }
	///
	/// impl Validate for Search {}
	///
	/// let target = TargetType::of::<Search>();
	/// assert!(target.is::<Search>());
	/// assert_eq!(target.short_name(), "Search");
	/// assert!(target.matches(&target.construct()));
	/// ```
	pub fn of<T: Bindable>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			construct: construct::<T>,
			is_instance: is_instance::<T>,
			to_json: to_json::<T>,
			from_json: from_json::<T>,
			validate: validate::<T>,
		}
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Fully qualified type name
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Type name without its module path
	pub fn short_name(&self) -> &'static str {
		let base = self.type_name.split('<').next().unwrap_or(self.type_name);
		base.rsplit("::").next().unwrap_or(base)
	}

	pub fn is<T: 'static>(&self) -> bool {
		self.type_id == TypeId::of::<T>()
	}

	/// Whether `value` is an instance of this type
	pub fn matches(&self, value: &BoundValue) -> bool {
		(self.is_instance)(value.as_ref())
	}

	/// A fresh `Default` instance
	pub fn construct(&self) -> BoundValue {
		(self.construct)()
	}

	/// Serialize `value` into JSON
	///
	/// # Errors
	///
	/// Fails with [`Error::Mapping`] when `value` has another type or does
	/// not serialize.
	pub fn to_json(&self, value: &BoundValue) -> Result<Value> {
		match (self.to_json)(value.as_ref()) {
			Some(result) => result.map_err(|e| {
				Error::Mapping(format!("cannot serialize {}: {}", self.short_name(), e))
			}),
			None => Err(self.mismatch()),
		}
	}

	/// Deserialize an instance from JSON
	pub fn from_json(&self, value: Value) -> Result<BoundValue> {
		(self.from_json)(value)
			.map_err(|e| Error::Mapping(format!("invalid {}: {}", self.short_name(), e)))
	}

	/// Run the declared constraints of `value` for `groups`
	pub fn validate(&self, value: &BoundValue, groups: &[String]) -> Result<ViolationList> {
		(self.validate)(value.as_ref(), groups).ok_or_else(|| self.mismatch())
	}

	fn mismatch(&self) -> Error {
		Error::Mapping(format!("value is not an instance of {}", self.type_name))
	}
}

fn construct<T: Bindable>() -> BoundValue {
	Arc::new(T::default())
}

fn is_instance<T: Bindable>(value: &(dyn Any + Send + Sync)) -> bool {
	value.is::<T>()
}

fn to_json<T: Bindable>(value: &(dyn Any + Send + Sync)) -> Option<serde_json::Result<Value>> {
	value.downcast_ref::<T>().map(serde_json::to_value)
}

fn from_json<T: Bindable>(value: Value) -> serde_json::Result<BoundValue> {
	serde_json::from_value::<T>(value).map(|v| Arc::new(v) as BoundValue)
}

fn validate<T: Bindable>(
	value: &(dyn Any + Send + Sync),
	groups: &[String],
) -> Option<ViolationList> {
	value.downcast_ref::<T>().map(|v| v.validate_groups(groups))
}

impl PartialEq for TargetType {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for TargetType {}

impl fmt::Debug for TargetType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("TargetType").field(&self.type_name).finish()
	}
}

impl fmt::Display for TargetType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.type_name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parambind_validators::{Constraints, MinLengthValidator};
	use rstest::rstest;
	use serde::Deserialize;

	#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
	struct Tag {
		name: String,
	}

	impl Validate for Tag {
		fn constraints(&self, c: &mut Constraints) {
			c.check("name", self.name.as_str(), &MinLengthValidator::new(2), &[]);
		}
	}

	#[derive(Default, Serialize, Deserialize)]
	struct Other;

	impl Validate for Other {}

	#[rstest]
	fn test_json_round_trip_keeps_type() {
		let target = TargetType::of::<Tag>();
		let value: BoundValue = Arc::new(Tag {
			name: "rust".to_string(),
		});

		let json = target.to_json(&value).unwrap();
		assert_eq!(json, serde_json::json!({"name": "rust"}));

		let back = target.from_json(json).unwrap();
		assert_eq!(back.downcast_ref::<Tag>().map(|t| t.name.as_str()), Some("rust"));
	}

	#[rstest]
	fn test_operations_reject_foreign_values() {
		let target = TargetType::of::<Tag>();
		let other = TargetType::of::<Other>().construct();

		assert!(!target.matches(&other));
		assert!(matches!(target.to_json(&other), Err(Error::Mapping(_))));
		assert!(matches!(target.validate(&other, &[]), Err(Error::Mapping(_))));
	}

	#[rstest]
	fn test_validate_runs_declared_constraints() {
		let target = TargetType::of::<Tag>();
		let violations = target.validate(&target.construct(), &[]).unwrap();

		assert_eq!(violations.len(), 1);
		assert_eq!(violations[0].property_path, "name");
	}

	#[rstest]
	fn test_equality_is_by_type() {
		assert_eq!(TargetType::of::<Tag>(), TargetType::of::<Tag>());
		assert_ne!(TargetType::of::<Tag>(), TargetType::of::<Other>());
		assert_eq!(TargetType::of::<Tag>().short_name(), "Tag");
	}
}
