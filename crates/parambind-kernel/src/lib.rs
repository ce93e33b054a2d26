//! # parambind kernel
//!
//! The host side of the controller pipeline: lifecycle events, a
//! priority-ordered listener dispatcher, the per-action metadata registry
//! and a small kernel that routes requests to controllers.
//!
//! ## Architecture
//!
//! ```text
//! Request → [kernel.request] → route match
//!         → [kernel.controller] → controller → [kernel.response]
//!                 ↑
//!   listeners ordered by priority (high first)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use parambind_kernel::{ControllerRef, EventDispatcher, Kernel};
//! use parambind_http::{Handler, Request, Response};
//! use parambind_core::exception::Result;
//! use async_trait::async_trait;
//! use hyper::{Method, StatusCode};
//! use std::sync::Arc;
//!
//! struct ShowUser;
//!
//! #[async_trait]
//! impl Handler for ShowUser {
//!     async fn handle(&self, request: Request) -> Result<Response> {
//!         let id = request.path_params.get("id").cloned().unwrap_or_default();
//!         Ok(Response::ok().with_body(id))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let mut kernel = Kernel::new(EventDispatcher::new());
//! kernel.route(
//!     Method::GET,
//!     "/users/{id}",
//!     ControllerRef::action("UserController", "show"),
//!     Arc::new(ShowUser),
//! );
//!
//! let request = Request::builder().uri("/users/42").build().unwrap();
//! let response = kernel.handle_request(request).await;
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.body, "42");
//! # });
//! ```

pub mod dispatcher;
pub mod events;
pub mod exception;
pub mod kernel;
pub mod metadata;
pub mod routing;

pub use dispatcher::{EventDispatcher, EventSubscriber, KernelListener, Subscription, listener_fn};
pub use events::{
	ControllerAction, ControllerEvent, ControllerRef, KernelEvent, KernelEventKind, RequestEvent,
	ResponseEvent,
};
pub use exception::convert_exception_to_response;
pub use kernel::{Kernel, RouteRegistration};
pub use metadata::{ActionMetadata, MetadataReader, MetadataRegistry};
pub use routing::{Route, RoutePattern};
