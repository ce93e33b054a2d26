//! The configuration notification
//!
//! Sent on the `binding_configured` signal once binding metadata has been
//! found for an action. Receivers may change the configuration before the
//! hook checks it and creates the placeholder object.

use crate::config::BindingConfig;
use parambind_core::signals::{Signal, SignalName};
use parambind_http::RequestContext;
use parambind_kernel::ControllerAction;
use parking_lot::RwLock;

/// Per-request binding configuration offered to listeners
#[derive(Debug)]
pub struct ConfigurationEvent {
	config: RwLock<BindingConfig>,
	action: ControllerAction,
	context: RequestContext,
}

impl ConfigurationEvent {
	pub fn new(config: BindingConfig, action: ControllerAction, context: RequestContext) -> Self {
		Self {
			config: RwLock::new(config),
			action,
			context,
		}
	}

	/// A copy of the configuration as it currently stands
	pub fn config(&self) -> BindingConfig {
		self.config.read().clone()
	}

	/// Change the configuration in place
	///
	/// # Examples
	///
	/// ```
	/// use parambind_binding::{BindingConfig, ConfigurationEvent};
	/// use parambind_http::Request;
	/// use parambind_kernel::ControllerAction;
	///
	/// let request = Request::builder().uri("/users").build().unwrap();
	/// let event = ConfigurationEvent::new(
	///     BindingConfig::new().with_attribute_name("dto"),
	///     ControllerAction::new("UserController", "create"),
	///     request.context(),
	/// );
	///
	/// event.update(|config| config.validate = true);
	/// assert!(event.config().validate);
	/// ```
	pub fn update<R>(&self, f: impl FnOnce(&mut BindingConfig) -> R) -> R {
		f(&mut self.config.write())
	}

	pub fn action(&self) -> &ControllerAction {
		&self.action
	}

	pub fn context(&self) -> &RequestContext {
		&self.context
	}
}

/// A fresh `binding_configured` signal
pub fn binding_configured() -> Signal<ConfigurationEvent> {
	Signal::new(SignalName::BINDING_CONFIGURED)
}
