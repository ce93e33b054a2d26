//! Turning errors into responses

use hyper::StatusCode;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use parambind_core::exception::Error;
use parambind_http::Response;
use serde_json::json;

/// Convert an error raised anywhere in the pipeline into a JSON response
///
/// Validation failures carry their violations in the body.
///
/// # Examples
///
/// ```
/// use parambind_core::exception::Error;
/// use parambind_kernel::convert_exception_to_response;
/// use parambind_validators::{ConstraintViolation, ViolationList};
///
/// let violations: ViolationList =
///     vec![ConstraintViolation::new(
///         "email",
///         "Enter a valid email address",
///         "invalid_email",
///     )]
///     .into();
/// let response = convert_exception_to_response(&Error::ValidationFailed(violations));
///
/// assert_eq!(response.status.as_u16(), 400);
/// let body: serde_json::Value = response.json().unwrap();
/// assert_eq!(body["message"], "Validation Failed");
/// assert_eq!(body["violations"][0]["property_path"], "email");
/// ```
pub fn convert_exception_to_response(error: &Error) -> Response {
	let status =
		StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

	if status.is_server_error() {
		tracing::error!(status = status.as_u16(), error = %error, "request failed");
	} else {
		tracing::debug!(status = status.as_u16(), error = %error, "request rejected");
	}

	let body = match error.violations() {
		Some(violations) => json!({
			"message": error.to_string(),
			"violations": violations,
		}),
		None => json!({ "message": error.to_string() }),
	};

	let response = Response::new(status);
	match response.clone().with_json(&body) {
		Ok(response) => response,
		Err(_) => response
			.with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
			.with_body(error.to_string()),
	}
}
