//! # parambind
//!
//! Request-to-object parameter binding for controller pipelines.
//!
//! Declare on a route which type its request data should be bound to. A
//! hook on the kernel's controller event then builds that object from the
//! path, query string and body, optionally validates it, and hands it to
//! the controller through the request's attribute bag.
//!
//! ## Feature Flags
//!
//! - `binding` (default) - the binding hook, its mapper and settings
//! - `kernel` - event dispatcher, route table and controller invocation
//!
//! Validators, the error type and the HTTP request/response types are
//! always available.
//!
//! ## Quick Example
//!
//! ```rust
//! use parambind::prelude::*;
//! use hyper::{Method, StatusCode};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct CreateUserDto {
//!     username: String,
//!     email: String,
//! }
//!
//! impl Validate for CreateUserDto {
//!     fn constraints(&self, c: &mut Constraints) {
//!         c.check("username", self.username.as_str(), &MinLengthValidator::new(3), &["create"])
//!             .check("email", self.email.as_str(), &EmailValidator::new(), &["create"]);
//!     }
//! }
//!
//! struct CreateUser;
//!
//! #[async_trait]
//! impl Handler for CreateUser {
//!     async fn handle(&self, request: Request) -> Result<Response> {
//!         let dto = request
//!             .attributes()
//!             .get::<CreateUserDto>("dto")
//!             .ok_or_else(|| Error::Internal("dto not bound".to_string()))?;
//!         Ok(Response::created().with_body(dto.username.clone()))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let dispatcher = EventDispatcher::new();
//! let mut kernel = Kernel::new(dispatcher.clone());
//! let _ = kernel
//!     .route(
//!         Method::POST,
//!         "/users",
//!         ControllerRef::action("UserController", "create"),
//!         Arc::new(CreateUser),
//!     )
//!     .with_metadata(BindingConfig::bind::<CreateUserDto>("dto").with_validation(["create"]));
//!
//! dispatcher.add_subscriber(Arc::new(ControllerParamBindingHook::with_defaults(
//!     kernel.metadata(),
//!     BindingSettings::default(),
//! )));
//!
//! let request = Request::builder()
//!     .method(Method::POST)
//!     .uri("/users")
//!     .header("content-type", "application/json")
//!     .body(r#"{"username":"alice","email":"alice@example.com"}"#)
//!     .build()
//!     .unwrap();
//!
//! let response = kernel.handle_request(request).await;
//! assert_eq!(response.status, StatusCode::CREATED);
//! assert_eq!(response.body, "alice");
//! # });
//! ```

pub mod validators {
	//! Constraint rules and violation reporting
	pub use parambind_validators::*;
}

pub mod http {
	//! Request, response, attribute bag and handler traits
	pub use parambind_http::*;
}

pub mod signals {
	pub use parambind_core::signals::*;
}

#[cfg(feature = "kernel")]
pub mod kernel {
	//! Kernel events, dispatcher, metadata registry and routing
	pub use parambind_kernel::*;
}

#[cfg(feature = "binding")]
pub mod binding {
	//! The controller parameter binding hook
	pub use parambind_binding::*;
}

pub use parambind_core::exception::{Error, Result};
pub use parambind_http::{Handler, Request, RequestContext, Response};

#[cfg(feature = "kernel")]
pub use parambind_kernel::{
	ControllerAction, ControllerRef, EventDispatcher, Kernel, KernelEvent, MetadataRegistry,
	convert_exception_to_response,
};

#[cfg(feature = "binding")]
pub use parambind_binding::{
	BindingConfig, BindingSettings, ConfigurationEvent, ControllerParamBindingHook, DataSource,
	TargetType,
};

/// Commonly used types
pub mod prelude {
	pub use crate::{Error, Handler, Request, Response, Result};
	pub use parambind_validators::prelude::*;

	// External
	pub use async_trait::async_trait;
	pub use serde::{Deserialize, Serialize};

	#[cfg(feature = "kernel")]
	pub use crate::{
		ControllerAction, ControllerRef, EventDispatcher, Kernel, KernelEvent, MetadataRegistry,
	};
	#[cfg(feature = "kernel")]
	pub use parambind_kernel::{EventSubscriber, KernelEventKind, MetadataReader, listener_fn};

	#[cfg(feature = "binding")]
	pub use crate::{
		BindingConfig, BindingSettings, ConfigurationEvent, ControllerParamBindingHook, DataSource,
		TargetType,
	};
}
