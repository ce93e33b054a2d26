use std::borrow::Cow;
use std::fmt;

/// Signal name wrapper
///
/// # Examples
///
/// ```
/// use parambind_core::signals::SignalName;
///
/// assert_eq!(SignalName::BINDING_CONFIGURED.as_str(), "binding_configured");
/// assert_eq!(SignalName::custom("audit").as_str(), "audit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalName(Cow<'static, str>);

impl SignalName {
	/// Sent after binding metadata is resolved and before the target object is created
	pub const BINDING_CONFIGURED: Self = Self(Cow::Borrowed("binding_configured"));

	pub const fn custom(name: &'static str) -> Self {
		Self(Cow::Borrowed(name))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SignalName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
