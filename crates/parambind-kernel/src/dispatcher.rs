//! Priority-ordered event dispatch
//!
//! Listeners are grouped by [`KernelEventKind`] and run from the highest
//! priority to the lowest. Listeners with equal priority run in the order
//! they were added. The first listener that fails aborts the dispatch and
//! its error is returned to the kernel.

use crate::events::{KernelEvent, KernelEventKind};
use async_trait::async_trait;
use parambind_core::exception::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A callable registered for one kind of kernel event
#[async_trait]
pub trait KernelListener: Send + Sync {
	async fn on_event(&self, event: &mut KernelEvent) -> Result<()>;
}

/// A listener together with where it hooks into the lifecycle
pub struct Subscription {
	pub kind: KernelEventKind,
	pub priority: i32,
	pub listener: Arc<dyn KernelListener>,
}

impl Subscription {
	pub fn new(kind: KernelEventKind, priority: i32, listener: Arc<dyn KernelListener>) -> Self {
		Self {
			kind,
			priority,
			listener,
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("kind", &self.kind)
			.field("priority", &self.priority)
			.finish_non_exhaustive()
	}
}

/// A component that registers several listeners at once
pub trait EventSubscriber: Send + Sync {
	fn subscriptions(self: Arc<Self>) -> Vec<Subscription>;
}

struct FnListener<F> {
	f: F,
}

#[async_trait]
impl<F> KernelListener for FnListener<F>
where
	F: Fn(&mut KernelEvent) -> Result<()> + Send + Sync,
{
	async fn on_event(&self, event: &mut KernelEvent) -> Result<()> {
		(self.f)(event)
	}
}

/// Wrap a synchronous closure as a listener
///
/// # Examples
///
/// ```
/// use parambind_kernel::{EventDispatcher, KernelEventKind, listener_fn};
///
/// let dispatcher = EventDispatcher::new();
/// dispatcher.add_listener(
///     KernelEventKind::Request,
///     0,
///     listener_fn(|_event| Ok(())),
/// );
/// assert_eq!(dispatcher.listener_count(KernelEventKind::Request), 1);
/// ```
pub fn listener_fn<F>(f: F) -> Arc<dyn KernelListener>
where
	F: Fn(&mut KernelEvent) -> Result<()> + Send + Sync + 'static,
{
	Arc::new(FnListener { f })
}

#[derive(Clone)]
struct ListenerEntry {
	priority: i32,
	listener: Arc<dyn KernelListener>,
}

/// Routes kernel events to their registered listeners
#[derive(Clone, Default)]
pub struct EventDispatcher {
	listeners: Arc<RwLock<HashMap<KernelEventKind, Vec<ListenerEntry>>>>,
}

impl EventDispatcher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_listener(
		&self,
		kind: KernelEventKind,
		priority: i32,
		listener: Arc<dyn KernelListener>,
	) {
		let mut listeners = self.listeners.write();
		let entries = listeners.entry(kind).or_default();
		entries.push(ListenerEntry { priority, listener });
		// Stable sort keeps insertion order for equal priorities
		entries.sort_by(|a, b| b.priority.cmp(&a.priority));
		tracing::debug!(event = %kind, priority, "registered kernel listener");
	}

	pub fn add_subscription(&self, subscription: Subscription) {
		self.add_listener(
			subscription.kind,
			subscription.priority,
			subscription.listener,
		);
	}

	/// Register every listener a subscriber exposes
	pub fn add_subscriber<S: EventSubscriber + 'static>(&self, subscriber: Arc<S>) {
		for subscription in subscriber.subscriptions() {
			self.add_subscription(subscription);
		}
	}

	pub fn listener_count(&self, kind: KernelEventKind) -> usize {
		self.listeners.read().get(&kind).map_or(0, Vec::len)
	}

	pub fn has_listeners(&self, kind: KernelEventKind) -> bool {
		self.listener_count(kind) > 0
	}

	/// Priorities of the listeners for `kind`, in dispatch order
	pub fn priorities(&self, kind: KernelEventKind) -> Vec<i32> {
		self.listeners
			.read()
			.get(&kind)
			.map(|entries| entries.iter().map(|e| e.priority).collect())
			.unwrap_or_default()
	}

	/// Run every listener for the event's kind
	///
	/// # Errors
	///
	/// Returns the first listener error; later listeners do not run.
	pub async fn dispatch(&self, event: &mut KernelEvent) -> Result<()> {
		let kind = event.kind();
		// Snapshot so listeners may register further listeners
		let entries = self
			.listeners
			.read()
			.get(&kind)
			.cloned()
			.unwrap_or_default();

		tracing::trace!(event = %kind, listeners = entries.len(), "dispatching kernel event");

		for entry in entries {
			if let Err(err) = entry.listener.on_event(event).await {
				tracing::debug!(
					event = %kind,
					priority = entry.priority,
					error = %err,
					"listener failed"
				);
				return Err(err);
			}
		}

		Ok(())
	}
}

impl fmt::Debug for EventDispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let listeners = self.listeners.read();
		let counts: HashMap<_, _> = listeners.iter().map(|(k, v)| (*k, v.len())).collect();
		f.debug_struct("EventDispatcher")
			.field("listeners", &counts)
			.finish()
	}
}
