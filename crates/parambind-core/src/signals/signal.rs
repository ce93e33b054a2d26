//! Core Signal implementation

use super::{SignalError, SignalName};
use parking_lot::RwLock;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed receiver callback
pub type ReceiverFn<T> = Arc<
	dyn Fn(Arc<T>) -> Pin<Box<dyn Future<Output = Result<(), SignalError>> + Send>>
		+ Send
		+ Sync,
>;

struct ReceiverInfo<T: Send + Sync + 'static> {
	receiver: ReceiverFn<T>,
	dispatch_uid: Option<String>,
	priority: i32, // Higher values execute first
}

impl<T: Send + Sync + 'static> Clone for ReceiverInfo<T> {
	fn clone(&self) -> Self {
		Self {
			receiver: Arc::clone(&self.receiver),
			dispatch_uid: self.dispatch_uid.clone(),
			priority: self.priority,
		}
	}
}

/// A signal that dispatches a payload to connected receivers
///
/// Cloning a signal yields a handle to the same receiver list.
pub struct Signal<T: Send + Sync + 'static> {
	receivers: Arc<RwLock<Vec<ReceiverInfo<T>>>>,
	name: SignalName,
}

impl<T: Send + Sync + 'static> Signal<T> {
	pub fn new(name: SignalName) -> Self {
		Self {
			receivers: Arc::new(RwLock::new(Vec::new())),
			name,
		}
	}

	pub fn name(&self) -> &SignalName {
		&self.name
	}

	/// Connect a receiver with full options
	///
	/// # Arguments
	/// * `receiver` - The receiver function to connect
	/// * `dispatch_uid` - Optional unique identifier; an existing receiver with
	///   the same identifier is replaced
	/// * `priority` - Execution priority (higher values execute first, default: 0)
	pub fn connect_with_options<F, Fut>(
		&self,
		receiver: F,
		dispatch_uid: Option<String>,
		priority: i32,
	) where
		F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<(), SignalError>> + Send + 'static,
	{
		let boxed: ReceiverFn<T> = Arc::new(move |instance| Box::pin(receiver(instance)));
		let mut receivers = self.receivers.write();

		if let Some(ref uid) = dispatch_uid {
			receivers.retain(|r| r.dispatch_uid.as_ref() != Some(uid));
		}

		receivers.push(ReceiverInfo {
			receiver: boxed,
			dispatch_uid,
			priority,
		});

		// Stable sort keeps connection order among equal priorities
		receivers.sort_by(|a, b| b.priority.cmp(&a.priority));
	}

	/// Connect a receiver function to this signal (simple version)
	pub fn connect<F, Fut>(&self, receiver: F)
	where
		F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<(), SignalError>> + Send + 'static,
	{
		self.connect_with_options(receiver, None, 0);
	}

	/// Connect a receiver with priority
	pub fn connect_with_priority<F, Fut>(&self, receiver: F, priority: i32)
	where
		F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<(), SignalError>> + Send + 'static,
	{
		self.connect_with_options(receiver, None, priority);
	}

	/// Disconnect the receiver registered under `dispatch_uid`
	pub fn disconnect(&self, dispatch_uid: &str) -> bool {
		let mut receivers = self.receivers.write();
		let original_len = receivers.len();
		receivers.retain(|r| r.dispatch_uid.as_deref() != Some(dispatch_uid));
		receivers.len() < original_len
	}

	pub fn receiver_count(&self) -> usize {
		self.receivers.read().len()
	}

	/// Send `instance` to every receiver and return it afterwards
	///
	/// Receivers that mutate the payload do so through interior mutability;
	/// the caller gets the shared payload back to read the outcome.
	pub async fn send_and_return(&self, instance: T) -> Result<Arc<T>, SignalError> {
		let instance = Arc::new(instance);
		// Snapshot so receivers may connect or disconnect while we dispatch
		let receivers = self.receivers.read().clone();

		tracing::trace!(
			signal = %self.name,
			receivers = receivers.len(),
			"sending signal"
		);

		for receiver_info in receivers {
			// Stop on first error
			(receiver_info.receiver)(Arc::clone(&instance)).await?;
		}

		Ok(instance)
	}

	/// Send signal to all connected receivers
	pub async fn send(&self, instance: T) -> Result<(), SignalError> {
		self.send_and_return(instance).await.map(|_| ())
	}
}

impl<T: Send + Sync + 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			receivers: Arc::clone(&self.receivers),
			name: self.name.clone(),
		}
	}
}

impl<T: Send + Sync + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("name", &self.name)
			.field("receiver_count", &self.receiver_count())
			.finish()
	}
}
