//! Per-request attribute bag
//!
//! Hooks running before the controller publish values here under string
//! keys; controllers read them back by key and concrete type.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased attribute value
pub type AttributeValue = Arc<dyn Any + Send + Sync>;

/// String-keyed request attribute storage
///
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct Attributes {
	map: Arc<RwLock<IndexMap<String, AttributeValue>>>,
}

impl Attributes {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store `value` under `key`, replacing any previous value
	///
	/// # Examples
	///
	/// ```
	/// use parambind_http::Attributes;
	///
	/// let attributes = Attributes::new();
	/// attributes.set("page", 3u32);
	///
	/// assert_eq!(attributes.get::<u32>("page").as_deref(), Some(&3));
	/// assert!(attributes.get::<String>("page").is_none());
	/// ```
	pub fn set<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
		self.set_value(key, Arc::new(value));
	}

	/// Store an already type-erased value, returning the previous one
	pub fn set_value(
		&self,
		key: impl Into<String>,
		value: AttributeValue,
	) -> Option<AttributeValue> {
		self.map.write().insert(key.into(), value)
	}

	/// Get the value under `key` if it has type `T`
	pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
		self.get_value(key)?.downcast::<T>().ok()
	}

	pub fn get_value(&self, key: &str) -> Option<AttributeValue> {
		self.map.read().get(key).cloned()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.map.read().contains_key(key)
	}

	pub fn remove(&self, key: &str) -> Option<AttributeValue> {
		self.map.write().shift_remove(key)
	}

	/// Keys in insertion order
	pub fn keys(&self) -> Vec<String> {
		self.map.read().keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.map.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.read().is_empty()
	}
}

impl fmt::Debug for Attributes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Attributes")
			.field("keys", &self.keys())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Debug, PartialEq)]
	struct Dto {
		name: String,
	}

	#[rstest]
	fn test_set_replaces_previous_value() {
		let attributes = Attributes::new();
		attributes.set("dto", Dto { name: "first".into() });
		let previous = attributes.set_value("dto", Arc::new(Dto { name: "second".into() }));

		assert!(previous.is_some());
		assert_eq!(attributes.len(), 1);
		assert_eq!(attributes.get::<Dto>("dto").unwrap().name, "second");
	}

	#[rstest]
	fn test_get_with_wrong_type_keeps_value() {
		let attributes = Attributes::new();
		attributes.set("dto", Dto { name: "kept".into() });

		assert!(attributes.get::<String>("dto").is_none());
		assert!(attributes.contains("dto"));
	}

	#[rstest]
	fn test_clones_share_storage() {
		let attributes = Attributes::new();
		let shared = attributes.clone();
		shared.set("id", 7i64);

		assert_eq!(attributes.get::<i64>("id").as_deref(), Some(&7));
	}

	#[rstest]
	fn test_remove_keeps_insertion_order() {
		let attributes = Attributes::new();
		attributes.set("a", 1u8);
		attributes.set("b", 2u8);
		attributes.set("c", 3u8);

		assert!(attributes.remove("b").is_some());
		assert!(attributes.remove("b").is_none());
		assert_eq!(attributes.keys(), vec!["a".to_string(), "c".to_string()]);
	}
}
