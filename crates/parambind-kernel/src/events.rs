//! Kernel lifecycle events
//!
//! One canonical event type flows through the dispatcher. Listeners match
//! on the variant they care about; a listener registered for the wrong kind
//! gets an [`Error::InvalidEventType`] from the typed accessors below.

use parambind_core::exception::{Error, Result};
use parambind_http::{Request, RequestContext, Response};
use std::borrow::Cow;
use std::fmt;

/// A named action on a controller, such as `UserController::create`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerAction {
	controller: Cow<'static, str>,
	action: Cow<'static, str>,
}

impl ControllerAction {
	pub fn new(
		controller: impl Into<Cow<'static, str>>,
		action: impl Into<Cow<'static, str>>,
	) -> Self {
		Self {
			controller: controller.into(),
			action: action.into(),
		}
	}

	pub fn controller(&self) -> &str {
		&self.controller
	}

	pub fn action(&self) -> &str {
		&self.action
	}
}

impl fmt::Display for ControllerAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}", self.controller, self.action)
	}
}

/// The controller chosen for a request
///
/// Only named actions carry metadata. A closure controller has nothing to
/// read binding options from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerRef {
	Action(ControllerAction),
	Closure,
}

impl ControllerRef {
	pub fn action(
		controller: impl Into<Cow<'static, str>>,
		action: impl Into<Cow<'static, str>>,
	) -> Self {
		Self::Action(ControllerAction::new(controller, action))
	}

	pub fn as_action(&self) -> Option<&ControllerAction> {
		match self {
			Self::Action(action) => Some(action),
			Self::Closure => None,
		}
	}
}

/// Which lifecycle stage an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelEventKind {
	Request,
	Controller,
	Response,
}

impl KernelEventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Request => "kernel.request",
			Self::Controller => "kernel.controller",
			Self::Response => "kernel.response",
		}
	}

	/// Name of the payload type, as used in error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Request => "RequestEvent",
			Self::Controller => "ControllerEvent",
			Self::Response => "ResponseEvent",
		}
	}
}

impl fmt::Display for KernelEventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Raised before routing; a listener may answer early with a response
#[derive(Debug)]
pub struct RequestEvent {
	request: Request,
	response: Option<Response>,
}

impl RequestEvent {
	pub fn new(request: Request) -> Self {
		Self {
			request,
			response: None,
		}
	}

	pub fn request(&self) -> &Request {
		&self.request
	}

	pub fn request_mut(&mut self) -> &mut Request {
		&mut self.request
	}

	/// Short-circuit the pipeline with `response`
	pub fn set_response(&mut self, response: Response) {
		self.response = Some(response);
	}

	pub fn has_response(&self) -> bool {
		self.response.is_some()
	}

	pub fn into_parts(self) -> (Request, Option<Response>) {
		(self.request, self.response)
	}
}

/// Raised once the controller for a request is known, before it runs
#[derive(Debug)]
pub struct ControllerEvent {
	controller: ControllerRef,
	request: Request,
}

impl ControllerEvent {
	pub fn new(controller: ControllerRef, request: Request) -> Self {
		Self {
			controller,
			request,
		}
	}

	pub fn controller(&self) -> &ControllerRef {
		&self.controller
	}

	pub fn request(&self) -> &Request {
		&self.request
	}

	pub fn request_mut(&mut self) -> &mut Request {
		&mut self.request
	}

	pub fn into_request(self) -> Request {
		self.request
	}
}

/// Raised after the controller produced a response
#[derive(Debug)]
pub struct ResponseEvent {
	context: RequestContext,
	response: Response,
}

impl ResponseEvent {
	pub fn new(context: RequestContext, response: Response) -> Self {
		Self { context, response }
	}

	pub fn context(&self) -> &RequestContext {
		&self.context
	}

	pub fn response(&self) -> &Response {
		&self.response
	}

	pub fn response_mut(&mut self) -> &mut Response {
		&mut self.response
	}

	pub fn into_response(self) -> Response {
		self.response
	}
}

/// Every event the kernel dispatches
#[derive(Debug)]
pub enum KernelEvent {
	Request(RequestEvent),
	Controller(ControllerEvent),
	Response(ResponseEvent),
}

impl KernelEvent {
	pub fn kind(&self) -> KernelEventKind {
		match self {
			Self::Request(_) => KernelEventKind::Request,
			Self::Controller(_) => KernelEventKind::Controller,
			Self::Response(_) => KernelEventKind::Response,
		}
	}

	pub fn type_name(&self) -> &'static str {
		self.kind().type_name()
	}

	/// Borrow the controller event, or fail with [`Error::InvalidEventType`]
	///
	/// # Examples
	///
	/// ```
	/// use parambind_kernel::{ControllerRef, KernelEvent, ControllerEvent, RequestEvent};
	/// use parambind_http::Request;
	///
	/// let request = Request::builder().uri("/users").build().unwrap();
	/// let mut event = KernelEvent::Request(RequestEvent::new(request));
	///
	/// let err = event.as_controller_mut().unwrap_err();
	/// assert_eq!(
	///     err.to_string(),
	///     "Expected instance of type ControllerEvent, RequestEvent given"
	/// );
	/// ```
	pub fn as_controller_mut(&mut self) -> Result<&mut ControllerEvent> {
		match self {
			Self::Controller(event) => Ok(event),
			other => Err(invalid_type(KernelEventKind::Controller, other.kind())),
		}
	}

	pub fn as_controller(&self) -> Result<&ControllerEvent> {
		match self {
			Self::Controller(event) => Ok(event),
			other => Err(invalid_type(KernelEventKind::Controller, other.kind())),
		}
	}

	pub fn into_controller(self) -> Result<ControllerEvent> {
		match self {
			Self::Controller(event) => Ok(event),
			other => Err(invalid_type(KernelEventKind::Controller, other.kind())),
		}
	}

	pub fn into_request_event(self) -> Result<RequestEvent> {
		match self {
			Self::Request(event) => Ok(event),
			other => Err(invalid_type(KernelEventKind::Request, other.kind())),
		}
	}

	pub fn into_response_event(self) -> Result<ResponseEvent> {
		match self {
			Self::Response(event) => Ok(event),
			other => Err(invalid_type(KernelEventKind::Response, other.kind())),
		}
	}
}

fn invalid_type(expected: KernelEventKind, given: KernelEventKind) -> Error {
	Error::InvalidEventType {
		expected: expected.type_name(),
		given: given.type_name().to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn request() -> Request {
		Request::builder().uri("/users/1").build().unwrap()
	}

	#[rstest]
	fn test_controller_accessor_accepts_controller_event() {
		let mut event = KernelEvent::Controller(ControllerEvent::new(
			ControllerRef::action("UserController", "show"),
			request(),
		));

		let controller = event.as_controller_mut().unwrap();
		assert_eq!(
			controller.controller().as_action().map(ToString::to_string),
			Some("UserController::show".to_string())
		);
	}

	#[rstest]
	#[case(KernelEvent::Request(RequestEvent::new(request())), "RequestEvent")]
	#[case(
		KernelEvent::Response(ResponseEvent::new(request().context(), Response::ok())),
		"ResponseEvent"
	)]
	fn test_controller_accessor_rejects_other_events(
		#[case] event: KernelEvent,
		#[case] given: &str,
	) {
		match event.into_controller() {
			Err(Error::InvalidEventType { expected, given: actual }) => {
				assert_eq!(expected, "ControllerEvent");
				assert_eq!(actual, given);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[rstest]
	fn test_closure_controller_has_no_action() {
		assert!(ControllerRef::Closure.as_action().is_none());
	}

	#[rstest]
	fn test_request_event_short_circuit() {
		let mut event = RequestEvent::new(request());
		assert!(!event.has_response());
		event.set_response(Response::not_found());

		let (_, response) = event.into_parts();
		assert_eq!(response.map(|r| r.status.as_u16()), Some(404));
	}
}
