//! The request kernel
//!
//! Matches the route, raises the lifecycle events and runs the controller.

use crate::dispatcher::EventDispatcher;
use crate::events::{
	ControllerEvent, ControllerRef, KernelEvent, RequestEvent, ResponseEvent,
};
use crate::exception::convert_exception_to_response;
use crate::metadata::MetadataRegistry;
use crate::routing::{Route, RoutePattern};
use async_trait::async_trait;
use hyper::Method;
use parambind_core::exception::{Error, Result};
use parambind_http::{Handler, Request, Response};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Routes requests to controllers and raises kernel events around them
pub struct Kernel {
	dispatcher: EventDispatcher,
	metadata: Arc<MetadataRegistry>,
	routes: Vec<Route>,
}

impl Kernel {
	pub fn new(dispatcher: EventDispatcher) -> Self {
		Self::with_registry(dispatcher, Arc::new(MetadataRegistry::new()))
	}

	/// Build a kernel that records route metadata into `metadata`
	pub fn with_registry(dispatcher: EventDispatcher, metadata: Arc<MetadataRegistry>) -> Self {
		Self {
			dispatcher,
			metadata,
			routes: Vec::new(),
		}
	}

	pub fn dispatcher(&self) -> &EventDispatcher {
		&self.dispatcher
	}

	/// The registry route metadata is written to
	pub fn metadata(&self) -> Arc<MetadataRegistry> {
		self.metadata.clone()
	}

	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	/// Register a controller for `method` and `pattern`
	///
	/// Use the returned [`RouteRegistration`] to attach metadata to the
	/// controller action.
	pub fn route(
		&mut self,
		method: Method,
		pattern: &str,
		controller: ControllerRef,
		handler: Arc<dyn Handler>,
	) -> RouteRegistration {
		tracing::debug!(method = %method, pattern, controller = ?controller, "registered route");
		self.routes.push(Route {
			method,
			pattern: RoutePattern::parse(pattern),
			controller: controller.clone(),
			handler,
		});
		RouteRegistration {
			metadata: self.metadata.clone(),
			controller,
		}
	}

	fn resolve(&self, request: &Request) -> Result<(&Route, HashMap<String, String>)> {
		let path = request.path();
		let mut path_matched = false;

		for route in &self.routes {
			if let Some(params) = route.pattern.matches(path) {
				if route.method == request.method {
					return Ok((route, params));
				}
				path_matched = true;
			}
		}

		if path_matched {
			Err(Error::MethodNotAllowed(format!("{} {}", request.method, path)))
		} else {
			Err(Error::NotFound(path.to_string()))
		}
	}

	/// Run one request through the pipeline
	///
	/// # Errors
	///
	/// Returns the first error raised by routing, a listener or the
	/// controller.
	pub async fn try_handle(&self, request: Request) -> Result<Response> {
		let mut event = KernelEvent::Request(RequestEvent::new(request));
		self.dispatcher.dispatch(&mut event).await?;
		let (mut request, early) = event.into_request_event()?.into_parts();
		if let Some(response) = early {
			tracing::debug!(path = request.path(), "request answered by listener");
			return Ok(response);
		}

		let (route, params) = self.resolve(&request)?;
		for (key, value) in params {
			request.set_path_param(key, value);
		}

		let mut event =
			KernelEvent::Controller(ControllerEvent::new(route.controller.clone(), request));
		self.dispatcher.dispatch(&mut event).await?;
		let request = event.into_controller()?.into_request();

		let context = request.context();
		let response = route.handler.handle(request).await?;

		let mut event = KernelEvent::Response(ResponseEvent::new(context, response));
		self.dispatcher.dispatch(&mut event).await?;
		Ok(event.into_response_event()?.into_response())
	}

	/// Like [`try_handle`](Self::try_handle), converting errors into responses
	pub async fn handle_request(&self, request: Request) -> Response {
		let method = request.method.clone();
		let path = request.path().to_string();

		let response = match self.try_handle(request).await {
			Ok(response) => response,
			Err(err) => convert_exception_to_response(&err),
		};

		tracing::info!(
			method = %method,
			path = %path,
			status = response.status.as_u16(),
			"handled request"
		);
		response
	}
}

#[async_trait]
impl Handler for Kernel {
	async fn handle(&self, request: Request) -> Result<Response> {
		Ok(self.handle_request(request).await)
	}
}

impl std::fmt::Debug for Kernel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Kernel")
			.field("dispatcher", &self.dispatcher)
			.field("routes", &self.routes)
			.finish()
	}
}

/// Attaches metadata to a freshly registered route
pub struct RouteRegistration {
	metadata: Arc<MetadataRegistry>,
	controller: ControllerRef,
}

impl RouteRegistration {
	/// Declare `metadata` on the route's controller action
	///
	/// Closure controllers cannot carry metadata; the value is dropped.
	pub fn with_metadata<T: Any + Send + Sync>(self, metadata: T) -> Self {
		match self.controller.as_action() {
			Some(action) => self.metadata.register(action.clone(), metadata),
			None => tracing::warn!("metadata ignored for closure controller"),
		}
		self
	}
}
