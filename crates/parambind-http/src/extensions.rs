//! Type-safe extensions for Request
//!
//! Request-scoped state keyed by type rather than by name. Framework hooks
//! use it to carry their own per-request bookkeeping between lifecycle
//! stages without exposing it in the attribute bag.

use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type-safe extension storage
#[derive(Clone, Default)]
pub struct Extensions {
	map: Arc<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl Extensions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a value, replacing any value of the same type
	///
	/// # Examples
	///
	/// ```
	/// use parambind_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// extensions.insert(42u32);
	/// extensions.insert(43u32);
	///
	/// assert_eq!(extensions.get::<u32>(), Some(43));
	/// ```
	pub fn insert<T: Send + Sync + 'static>(&self, value: T) {
		self.map.lock().insert(TypeId::of::<T>(), Box::new(value));
	}

	/// Get a cloned value from extensions
	pub fn get<T>(&self) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.map
			.lock()
			.get(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>())
			.cloned()
	}

	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		self.map.lock().contains_key(&TypeId::of::<T>())
	}

	/// Remove a value from extensions and return it
	pub fn remove<T>(&self) -> Option<T>
	where
		T: Send + Sync + 'static,
	{
		let boxed = self.map.lock().remove(&TypeId::of::<T>())?;
		boxed.downcast::<T>().ok().map(|value| *value)
	}

	pub fn len(&self) -> usize {
		self.map.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.lock().is_empty()
	}
}

impl fmt::Debug for Extensions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Extensions")
			.field("len", &self.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Clone, Debug, PartialEq)]
	struct Marker(&'static str);

	#[rstest]
	fn test_get_nonexistent() {
		let extensions = Extensions::new();
		assert_eq!(extensions.get::<Marker>(), None);
		assert!(!extensions.contains::<Marker>());
	}

	#[rstest]
	fn test_remove() {
		let extensions = Extensions::new();
		extensions.insert(Marker("resolved"));

		assert_eq!(extensions.remove::<Marker>(), Some(Marker("resolved")));
		assert!(!extensions.contains::<Marker>());
		assert_eq!(extensions.remove::<Marker>(), None);
	}

	#[rstest]
	fn test_multiple_types() {
		let extensions = Extensions::new();
		extensions.insert(Marker("a"));
		extensions.insert(42u32);

		assert_eq!(extensions.get::<Marker>(), Some(Marker("a")));
		assert_eq!(extensions.get::<u32>(), Some(42));
		assert_eq!(extensions.len(), 2);
	}

	#[rstest]
	fn test_debug_shows_entry_count() {
		let extensions = Extensions::new();
		assert_eq!(format!("{:?}", extensions), "Extensions { len: 0 }");

		extensions.insert(Marker("a"));
		assert_eq!(format!("{:?}", extensions), "Extensions { len: 1 }");
		assert!(!extensions.is_empty());
	}

	#[rstest]
	fn test_request_debug_includes_extensions() {
		let request = crate::Request::builder().uri("/users").build().unwrap();
		request.extensions().insert(7u8);

		assert!(format!("{:?}", request).contains("Extensions { len: 1 }"));
	}
}
