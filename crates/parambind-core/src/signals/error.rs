use std::fmt;

/// Error returned by a signal receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalError {
	pub message: String,
}

impl SignalError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

impl fmt::Display for SignalError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Signal error: {}", self.message)
	}
}

impl std::error::Error for SignalError {}
