//! Binding settings
//!
//! Settings come from defaults, then an optional TOML file, then
//! environment variables prefixed with `PARAMBIND_`:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `PARAMBIND_PREPARE_PRIORITY` | `prepare_priority` | `9999` |
//! | `PARAMBIND_APPLY_PRIORITY` | `apply_priority` | `-9999` |
//! | `PARAMBIND_MAX_BODY_BYTES` | `max_body_bytes` | `1048576` |
//! | `PARAMBIND_DEFAULT_SOURCES` | `default_sources` | empty (by method) |
//!
//! `PARAMBIND_DEFAULT_SOURCES` is a comma separated list such as
//! `path,query,body`.

use crate::config::DataSource;
use parambind_core::exception::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Prefix of the environment variables read by [`BindingSettings::with_env_overrides`]
pub const ENV_PREFIX: &str = "PARAMBIND_";

/// Errors raised while loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for {key}: {value}")]
	InvalidValue { key: String, value: String },
}

impl From<SettingsError> for Error {
	fn from(err: SettingsError) -> Self {
		Error::Configuration(err.to_string())
	}
}

/// Tunables for the binding hook and the default mapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingSettings {
	/// Listener priority of the preparation step
	pub prepare_priority: i32,
	/// Listener priority of the mapping step
	pub apply_priority: i32,
	/// Largest request body the mapper reads
	pub max_body_bytes: usize,
	/// Sources used when a binding does not name any
	pub default_sources: Vec<DataSource>,
}

impl Default for BindingSettings {
	fn default() -> Self {
		Self {
			prepare_priority: 9999,
			apply_priority: -9999,
			max_body_bytes: 1024 * 1024,
			default_sources: Vec::new(),
		}
	}
}

impl BindingSettings {
	/// Parse settings from TOML text; missing keys keep their defaults
	///
	/// # Examples
	///
	/// ```
	/// use parambind_binding::{BindingSettings, DataSource};
	///
	/// let settings = BindingSettings::from_toml_str(r#"
	///     apply_priority = -10
	///     default_sources = ["query", "body"]
	/// "#).unwrap();
	///
	/// assert_eq!(settings.prepare_priority, 9999);
	/// assert_eq!(settings.apply_priority, -10);
	/// assert_eq!(settings.default_sources, vec![DataSource::Query, DataSource::Body]);
	/// ```
	pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(text)?)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let text = std::fs::read_to_string(path)?;
		Self::from_toml_str(&text)
	}

	/// Defaults, then `path` when given, then the environment
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.with_env_overrides()
	}

	/// Apply `PARAMBIND_*` variables from the process environment
	pub fn with_env_overrides(self) -> Result<Self, SettingsError> {
		self.with_overrides(std::env::vars())
	}

	/// Apply `PARAMBIND_*` entries from `vars`; other entries are ignored
	pub fn with_overrides<I, K, V>(mut self, vars: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		for (key, value) in vars {
			let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let value = value.as_ref();
			match name {
				"PREPARE_PRIORITY" => self.prepare_priority = parse(key.as_ref(), value)?,
				"APPLY_PRIORITY" => self.apply_priority = parse(key.as_ref(), value)?,
				"MAX_BODY_BYTES" => self.max_body_bytes = parse(key.as_ref(), value)?,
				"DEFAULT_SOURCES" => {
					self.default_sources = value
						.split(',')
						.filter(|s| !s.trim().is_empty())
						.map(|s| s.parse::<DataSource>())
						.collect::<Result<_, _>>()
						.map_err(|_| invalid(key.as_ref(), value))?;
				}
				_ => tracing::debug!(key = key.as_ref(), "ignoring unknown setting"),
			}
		}
		Ok(self)
	}
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
	value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> SettingsError {
	SettingsError::InvalidValue {
		key: key.to_string(),
		value: value.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	fn test_defaults() {
		let settings = BindingSettings::default();
		assert_eq!(settings.prepare_priority, 9999);
		assert_eq!(settings.apply_priority, -9999);
		assert_eq!(settings.max_body_bytes, 1_048_576);
		assert!(settings.default_sources.is_empty());
	}

	#[rstest]
	fn test_overrides_apply_prefixed_keys_only() {
		let settings = BindingSettings::default()
			.with_overrides([
				("PARAMBIND_PREPARE_PRIORITY", "100"),
				("PARAMBIND_MAX_BODY_BYTES", " 2048 "),
				("PARAMBIND_DEFAULT_SOURCES", "path, body"),
				("APPLY_PRIORITY", "1"),
			])
			.unwrap();

		assert_eq!(settings.prepare_priority, 100);
		assert_eq!(settings.apply_priority, -9999);
		assert_eq!(settings.max_body_bytes, 2048);
		assert_eq!(settings.default_sources, vec![DataSource::Path, DataSource::Body]);
	}

	#[rstest]
	#[case("PARAMBIND_APPLY_PRIORITY", "low")]
	#[case("PARAMBIND_MAX_BODY_BYTES", "-1")]
	#[case("PARAMBIND_DEFAULT_SOURCES", "path,cookie")]
	fn test_invalid_override(#[case] key: &str, #[case] value: &str) {
		let err = BindingSettings::default()
			.with_overrides([(key, value)])
			.unwrap_err();
		assert_eq!(err.to_string(), format!("Invalid value for {}: {}", key, value));
	}

	#[rstest]
	fn test_invalid_toml() {
		let err = BindingSettings::from_toml_str("prepare_priority = \"high\"").unwrap_err();
		assert!(matches!(err, SettingsError::Toml(_)));
		assert!(matches!(Error::from(err), Error::Configuration(_)));
	}

	#[rstest]
	fn test_load_from_file() {
		let path = std::env::temp_dir()
			.join(format!("parambind-settings-{}.toml", std::process::id()));
		std::fs::write(&path, "max_body_bytes = 512\n").unwrap();

		let settings = BindingSettings::from_file(&path).unwrap();
		std::fs::remove_file(&path).unwrap();

		assert_eq!(settings.max_body_bytes, 512);
	}

	#[rstest]
	#[serial(parambind_env)]
	fn test_env_overrides() {
		// SAFETY: serialized with every other test touching these variables
		unsafe {
			std::env::set_var("PARAMBIND_APPLY_PRIORITY", "-5");
		}
		let settings = BindingSettings::load(None);
		unsafe {
			std::env::remove_var("PARAMBIND_APPLY_PRIORITY");
		}

		assert_eq!(settings.unwrap().apply_priority, -5);
	}
}
