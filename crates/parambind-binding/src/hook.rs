//! The controller parameter binding hook
//!
//! Two listeners on the controller event cooperate to bind request data:
//!
//! 1. [`prepare_binding`](ControllerParamBindingHook::prepare_binding) runs
//!    early. It reads the action's [`BindingConfig`], lets
//!    `binding_configured` receivers adjust a per-request copy, checks that
//!    the required options are set and puts an empty target object into the
//!    attribute bag.
//! 2. [`apply_binding`](ControllerParamBindingHook::apply_binding) runs late,
//!    after other request-preparation listeners. It maps the request onto the
//!    target, validates it when asked to and stores the result.
//!
//! The resolved configuration travels between the two steps in the
//! request's extensions, so one hook serves any number of concurrent
//! requests.

use crate::config::BindingConfig;
use crate::event::{ConfigurationEvent, binding_configured};
use crate::mapper::{DefaultRequestMapper, RequestMapper};
use crate::settings::BindingSettings;
use crate::validator::{ConstraintValidator, ObjectValidator};
use async_trait::async_trait;
use parambind_core::exception::{Error, Result};
use parambind_core::signals::Signal;
use parambind_kernel::{
	ControllerAction, EventSubscriber, KernelEvent, KernelEventKind, KernelListener,
	MetadataReader, Subscription,
};
use std::fmt;
use std::sync::Arc;

/// Binding state of the current request, kept in its extensions
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedBinding {
	/// The action declares no binding
	Absent,
	/// The configuration after notification and checks
	Resolved(BindingConfig),
}

impl ResolvedBinding {
	pub fn config(&self) -> Option<&BindingConfig> {
		match self {
			Self::Absent => None,
			Self::Resolved(config) => Some(config),
		}
	}
}

/// Binds request data onto a typed object before the controller runs
///
/// # Examples
///
/// ```
/// use parambind_binding::{BindingConfig, BindingSettings, ControllerParamBindingHook};
/// use parambind_kernel::{ControllerRef, EventDispatcher, Kernel, KernelEventKind};
/// use std::sync::Arc;
///
/// let dispatcher = EventDispatcher::new();
/// let kernel = Kernel::new(dispatcher.clone());
///
/// let hook = Arc::new(ControllerParamBindingHook::with_defaults(
///     kernel.metadata(),
///     BindingSettings::default(),
/// ));
/// dispatcher.add_subscriber(hook);
///
/// assert_eq!(
///     dispatcher.priorities(KernelEventKind::Controller),
///     vec![9999, -9999]
/// );
/// ```
pub struct ControllerParamBindingHook {
	reader: Arc<dyn MetadataReader>,
	mapper: Arc<dyn RequestMapper>,
	validator: Arc<dyn ObjectValidator>,
	configured: Signal<ConfigurationEvent>,
	settings: BindingSettings,
}

impl ControllerParamBindingHook {
	pub fn new(
		reader: Arc<dyn MetadataReader>,
		mapper: Arc<dyn RequestMapper>,
		validator: Arc<dyn ObjectValidator>,
		configured: Signal<ConfigurationEvent>,
	) -> Self {
		Self {
			reader,
			mapper,
			validator,
			configured,
			settings: BindingSettings::default(),
		}
	}

	/// A hook with the default mapper and the constraint validator
	pub fn with_defaults(reader: Arc<dyn MetadataReader>, settings: BindingSettings) -> Self {
		let mapper = Arc::new(DefaultRequestMapper::from_settings(&settings));
		Self::new(
			reader,
			mapper,
			Arc::new(ConstraintValidator::new()),
			binding_configured(),
		)
		.with_settings(settings)
	}

	pub fn with_settings(mut self, settings: BindingSettings) -> Self {
		self.settings = settings;
		self
	}

	/// The signal receivers use to adjust binding configurations
	pub fn configured(&self) -> &Signal<ConfigurationEvent> {
		&self.configured
	}

	pub fn settings(&self) -> &BindingSettings {
		&self.settings
	}

	/// Resolve the binding of the controller action and set up the target
	///
	/// # Errors
	///
	/// - [`Error::InvalidEventType`] when `event` is not a controller event
	/// - [`Error::Signal`] when a `binding_configured` receiver fails
	/// - [`Error::MissingBindingFields`] when the configuration lacks an
	///   attribute name or a target type after notification
	pub async fn prepare_binding(&self, event: &mut KernelEvent) -> Result<()> {
		let event = event.as_controller_mut()?;
		let Some(action) = event.controller().as_action().cloned() else {
			tracing::debug!("closure controller, no binding");
			return Ok(());
		};
		let request = event.request();

		let Some(declared) = self.find_config(&action) else {
			tracing::trace!(action = %action, "no binding declared");
			request.extensions().insert(ResolvedBinding::Absent);
			return Ok(());
		};

		let notification = ConfigurationEvent::new(declared, action.clone(), request.context());
		let config = self.configured.send_and_return(notification).await?.config();

		let missing = config.missing_fields();
		if !missing.is_empty() {
			return Err(Error::MissingBindingFields {
				controller: action.controller().to_string(),
				action: action.action().to_string(),
				missing,
			});
		}

		if !config.reuse_existing
			&& let (Some(name), Some(target)) = (&config.attribute_name, &config.target_type)
		{
			request.attributes().set_value(name.clone(), target.construct());
		}

		tracing::debug!(
			action = %action,
			attribute = config.attribute_name.as_deref().unwrap_or_default(),
			reuse_existing = config.reuse_existing,
			"binding resolved"
		);
		request.extensions().insert(ResolvedBinding::Resolved(config));
		Ok(())
	}

	/// Map the request onto the target and store the result
	///
	/// Does nothing when no binding was resolved for the request.
	///
	/// # Errors
	///
	/// - [`Error::InvalidEventType`] when `event` is not a controller event
	/// - [`Error::Mapping`] when the request data does not fit the target
	/// - [`Error::ValidationFailed`] with every violation when validation is
	///   enabled and fails; the attribute bag is left untouched
	pub async fn apply_binding(&self, event: &mut KernelEvent) -> Result<()> {
		let request = event.as_controller_mut()?.request();

		let Some(ResolvedBinding::Resolved(config)) = request.extensions().get::<ResolvedBinding>()
		else {
			return Ok(());
		};
		let (Some(name), Some(target)) = (config.attribute_name.clone(), config.target_type) else {
			return Err(Error::Internal(
				"resolved binding lost its attribute name or target type".to_string(),
			));
		};

		let value = self.mapper.map(request, &config).await?;
		if !target.matches(&value) {
			return Err(Error::Mapping(format!(
				"mapper produced a value that is not a {}",
				target.type_name()
			)));
		}

		if config.validate {
			let violations = self
				.validator
				.validate(&value, &target, &config.validation_groups)?;
			if !violations.is_empty() {
				tracing::warn!(
					attribute = %name,
					target = target.short_name(),
					violations = violations.len(),
					"bound object failed validation"
				);
				return Err(Error::ValidationFailed(violations));
			}
		}

		request.attributes().set_value(name.clone(), value);
		tracing::debug!(attribute = %name, target = target.short_name(), "bound request data");
		Ok(())
	}

	fn find_config(&self, action: &ControllerAction) -> Option<BindingConfig> {
		self.reader
			.method_metadata(action)
			.into_iter()
			.find_map(|entry| entry.downcast::<BindingConfig>().ok())
			.map(|config| (*config).clone())
	}
}

impl fmt::Debug for ControllerParamBindingHook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ControllerParamBindingHook")
			.field("settings", &self.settings)
			.field("receivers", &self.configured.receiver_count())
			.finish_non_exhaustive()
	}
}

impl EventSubscriber for ControllerParamBindingHook {
	fn subscriptions(self: Arc<Self>) -> Vec<Subscription> {
		vec![
			Subscription::new(
				KernelEventKind::Controller,
				self.settings.prepare_priority,
				Arc::new(PrepareBindingListener(self.clone())),
			),
			Subscription::new(
				KernelEventKind::Controller,
				self.settings.apply_priority,
				Arc::new(ApplyBindingListener(self)),
			),
		]
	}
}

/// Listener running [`ControllerParamBindingHook::prepare_binding`]
pub struct PrepareBindingListener(pub Arc<ControllerParamBindingHook>);

#[async_trait]
impl KernelListener for PrepareBindingListener {
	async fn on_event(&self, event: &mut KernelEvent) -> Result<()> {
		self.0.prepare_binding(event).await
	}
}

/// Listener running [`ControllerParamBindingHook::apply_binding`]
pub struct ApplyBindingListener(pub Arc<ControllerParamBindingHook>);

#[async_trait]
impl KernelListener for ApplyBindingListener {
	async fn on_event(&self, event: &mut KernelEvent) -> Result<()> {
		self.0.apply_binding(event).await
	}
}
