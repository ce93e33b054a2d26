//! Error types shared by the parambind crates

use crate::signals::SignalError;
use parambind_validators::ViolationList;
use thiserror::Error;

/// Errors raised while dispatching events and binding request data
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
	/// A hook received an event of the wrong kind
	#[error("Expected instance of type {expected}, {given} given")]
	InvalidEventType {
		expected: &'static str,
		given: String,
	},

	/// Binding metadata lacks a required option after notification listeners ran
	#[error(
		"No configured binding options {} for '{action}' action in '{controller}'",
		quoted(.missing)
	)]
	MissingBindingFields {
		controller: String,
		action: String,
		missing: Vec<&'static str>,
	},

	/// The mapped object failed validation
	#[error("Validation Failed")]
	ValidationFailed(ViolationList),

	/// Request data could not be mapped onto the target type
	#[error("Mapping error: {0}")]
	Mapping(String),

	/// A signal receiver failed
	#[error("Signal error: {0}")]
	Signal(String),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Method not allowed: {0}")]
	MethodNotAllowed(String),

	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code this error is reported with
	///
	/// # Examples
	///
	/// ```
	/// use parambind_core::exception::Error;
	/// use parambind_validators::ViolationList;
	///
	/// assert_eq!(Error::ValidationFailed(ViolationList::new()).status_code(), 400);
	/// assert_eq!(Error::NotFound("/missing".into()).status_code(), 404);
	/// assert_eq!(Error::Internal("boom".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Self::ValidationFailed(_) | Self::Mapping(_) => 400,
			Self::NotFound(_) => 404,
			Self::MethodNotAllowed(_) => 405,
			Self::InvalidEventType { .. }
			| Self::MissingBindingFields { .. }
			| Self::Signal(_)
			| Self::Configuration(_)
			| Self::Internal(_) => 500,
		}
	}

	/// Violations carried by a validation failure
	pub fn violations(&self) -> Option<&ViolationList> {
		match self {
			Self::ValidationFailed(violations) => Some(violations),
			_ => None,
		}
	}
}

impl From<SignalError> for Error {
	fn from(err: SignalError) -> Self {
		Self::Signal(err.message)
	}
}

fn quoted(fields: &[&'static str]) -> String {
	fields
		.iter()
		.map(|f| format!("'{}'", f))
		.collect::<Vec<_>>()
		.join(" or ")
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;
	use parambind_validators::ConstraintViolation;
	use rstest::rstest;

	#[rstest]
	fn test_missing_fields_message() {
		let err = Error::MissingBindingFields {
			controller: "UserController".to_string(),
			action: "create".to_string(),
			missing: vec!["attribute_name", "target_type"],
		};
		assert_eq!(
			err.to_string(),
			"No configured binding options 'attribute_name' or 'target_type' for 'create' action in 'UserController'"
		);
	}

	#[rstest]
	fn test_invalid_event_message() {
		let err = Error::InvalidEventType {
			expected: "ControllerEvent",
			given: "ResponseEvent".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Expected instance of type ControllerEvent, ResponseEvent given"
		);
	}

	#[rstest]
	fn test_violations_accessor() {
		let list: ViolationList =
			vec![ConstraintViolation::new("name", "Value must not be blank", "not_blank")].into();
		let err = Error::ValidationFailed(list.clone());
		assert_eq!(err.violations(), Some(&list));
		assert!(Error::Mapping("bad".into()).violations().is_none());
	}

	#[rstest]
	fn test_signal_error_conversion() {
		let err: Error = SignalError::new("receiver failed").into();
		assert!(matches!(err, Error::Signal(ref m) if m == "receiver failed"));
		assert_eq!(err.status_code(), 500);
	}
}
