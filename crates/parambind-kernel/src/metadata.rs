//! Per-action metadata
//!
//! Routes declare their metadata when they are registered. Hooks look it up
//! by [`ControllerAction`] and pick the entries they understand by type.

use crate::events::ControllerAction;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// One metadata entry attached to an action
pub type ActionMetadata = Arc<dyn Any + Send + Sync>;

/// Read access to the metadata declared on controller actions
pub trait MetadataReader: Send + Sync {
	/// All metadata entries declared on `action`, in declaration order
	fn method_metadata(&self, action: &ControllerAction) -> Vec<ActionMetadata>;

	/// The first entry of type `T`
	fn find<T: Any + Send + Sync>(&self, action: &ControllerAction) -> Option<Arc<T>>
	where
		Self: Sized,
	{
		self.method_metadata(action)
			.into_iter()
			.find_map(|entry| entry.downcast::<T>().ok())
	}
}

impl<R: MetadataReader + ?Sized> MetadataReader for Arc<R> {
	fn method_metadata(&self, action: &ControllerAction) -> Vec<ActionMetadata> {
		(**self).method_metadata(action)
	}
}

/// In-memory metadata store filled at route registration
///
/// # Examples
///
/// ```
/// use parambind_kernel::{ControllerAction, MetadataReader, MetadataRegistry};
///
/// let registry = MetadataRegistry::new();
/// let action = ControllerAction::new("UserController", "create");
/// registry.register(action.clone(), "rate-limited");
///
/// assert_eq!(registry.find::<&str>(&action).as_deref(), Some(&"rate-limited"));
/// assert!(registry.find::<u32>(&action).is_none());
/// ```
#[derive(Default)]
pub struct MetadataRegistry {
	entries: RwLock<HashMap<ControllerAction, Vec<ActionMetadata>>>,
}

impl MetadataRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register<T: Any + Send + Sync>(&self, action: ControllerAction, metadata: T) {
		self.register_value(action, Arc::new(metadata));
	}

	pub fn register_value(&self, action: ControllerAction, metadata: ActionMetadata) {
		tracing::trace!(action = %action, "registered action metadata");
		self.entries.write().entry(action).or_default().push(metadata);
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

impl MetadataReader for MetadataRegistry {
	fn method_metadata(&self, action: &ControllerAction) -> Vec<ActionMetadata> {
		self.entries.read().get(action).cloned().unwrap_or_default()
	}
}

impl std::fmt::Debug for MetadataRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MetadataRegistry")
			.field("actions", &self.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Debug, PartialEq)]
	struct Tag(&'static str);

	#[rstest]
	fn test_entries_keep_declaration_order() {
		let registry = MetadataRegistry::new();
		let action = ControllerAction::new("PostController", "update");
		registry.register(action.clone(), Tag("a"));
		registry.register(action.clone(), 7u8);
		registry.register(action.clone(), Tag("b"));

		let tags: Vec<_> = registry
			.method_metadata(&action)
			.into_iter()
			.filter_map(|entry| entry.downcast::<Tag>().ok())
			.map(|tag| tag.0)
			.collect();

		assert_eq!(tags, vec!["a", "b"]);
		assert_eq!(registry.find::<Tag>(&action).as_deref(), Some(&Tag("a")));
	}

	#[rstest]
	fn test_unknown_action_has_no_metadata() {
		let registry = MetadataRegistry::new();
		let action = ControllerAction::new("PostController", "delete");
		assert!(registry.method_metadata(&action).is_empty());
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_reader_through_arc() {
		let registry = Arc::new(MetadataRegistry::new());
		let action = ControllerAction::new("PostController", "show");
		registry.register(action.clone(), Tag("x"));

		let reader: Arc<dyn MetadataReader> = registry;
		assert_eq!(reader.method_metadata(&action).len(), 1);
	}
}
