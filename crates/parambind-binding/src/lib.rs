//! # parambind binding
//!
//! Binds request data onto typed objects before a controller runs.
//!
//! Attach a [`BindingConfig`] to a route, subscribe a
//! [`ControllerParamBindingHook`] to the kernel dispatcher, and the
//! controller finds the populated (and optionally validated) object in the
//! request's attribute bag under the configured name.
//!
//! ## Pieces
//!
//! - [`BindingConfig`]: per-action options (attribute name, target type,
//!   reuse, validation groups, sources)
//! - [`TargetType`]: erased description of the target type
//! - [`RequestMapper`] / [`DefaultRequestMapper`]: path, query, JSON and form
//!   data onto the target
//! - [`ObjectValidator`] / [`ConstraintValidator`]: runs declared constraints
//! - [`ConfigurationEvent`]: sent on the `binding_configured` signal so
//!   receivers can adjust a configuration per request
//! - [`BindingSettings`]: priorities and mapper limits

pub mod config;
pub mod event;
pub mod hook;
pub mod mapper;
pub mod settings;
pub mod target;
pub mod validator;

pub use config::{BindingConfig, DataSource};
pub use event::{ConfigurationEvent, binding_configured};
pub use hook::{
	ApplyBindingListener, ControllerParamBindingHook, PrepareBindingListener, ResolvedBinding,
};
pub use mapper::{DefaultRequestMapper, RequestMapper};
pub use settings::{BindingSettings, ENV_PREFIX, SettingsError};
pub use target::{Bindable, BoundValue, TargetType};
pub use validator::{ConstraintValidator, ObjectValidator};
