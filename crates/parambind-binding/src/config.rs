//! Binding metadata declared on controller actions

use crate::target::{Bindable, TargetType};
use hyper::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A part of the request that feeds the mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
	/// Parameters captured by the route pattern
	Path,
	/// Decoded query string parameters
	Query,
	/// JSON or form encoded body
	Body,
}

impl DataSource {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Path => "path",
			Self::Query => "query",
			Self::Body => "body",
		}
	}
}

impl fmt::Display for DataSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DataSource {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"path" => Ok(Self::Path),
			"query" => Ok(Self::Query),
			"body" => Ok(Self::Body),
			other => Err(format!("unknown data source: {}", other)),
		}
	}
}

/// How to bind request data for one controller action
///
/// `attribute_name` and `target_type` are optional here because listeners
/// of the configuration notification may still fill them in. Both must be
/// set once the notification has been delivered.
///
/// # Examples
///
/// ```
/// use parambind_binding::{BindingConfig, DataSource};
/// use parambind_validators::Validate;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct CreateUserDto {
///     username: String,
/// }
///
/// impl Validate for CreateUserDto {}
///
/// let config = BindingConfig::new()
///     .with_attribute_name("dto")
///     .with_target::<CreateUserDto>()
///     .with_validation(["create"])
///     .with_sources([DataSource::Body]);
///
/// assert!(config.validate);
/// assert_eq!(config.validation_groups, vec!["create".to_string()]);
/// assert!(config.missing_fields().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingConfig {
	/// Attribute bag key the bound object is stored under
	pub attribute_name: Option<String>,
	pub target_type: Option<TargetType>,
	/// Populate the object already stored under `attribute_name`
	pub reuse_existing: bool,
	pub validate: bool,
	pub validation_groups: Vec<String>,
	/// Request parts to read, later ones winning; empty means by method
	pub sources: Vec<DataSource>,
}

impl BindingConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Shorthand for binding `T` under `attribute_name`
	pub fn bind<T: Bindable>(attribute_name: impl Into<String>) -> Self {
		Self::new()
			.with_attribute_name(attribute_name)
			.with_target::<T>()
	}

	pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
		self.attribute_name = Some(name.into());
		self
	}

	pub fn with_target<T: Bindable>(self) -> Self {
		self.with_target_type(TargetType::of::<T>())
	}

	pub fn with_target_type(mut self, target: TargetType) -> Self {
		self.target_type = Some(target);
		self
	}

	pub fn with_reuse_existing(mut self, reuse: bool) -> Self {
		self.reuse_existing = reuse;
		self
	}

	/// Enable validation for `groups`
	pub fn with_validation<I, S>(mut self, groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.validate = true;
		self.validation_groups = groups.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_sources(mut self, sources: impl IntoIterator<Item = DataSource>) -> Self {
		self.sources = sources.into_iter().collect();
		self
	}

	/// Names of the required options that are not set
	pub fn missing_fields(&self) -> Vec<&'static str> {
		let mut missing = Vec::new();
		if self.attribute_name.as_deref().is_none_or(str::is_empty) {
			missing.push("attribute_name");
		}
		if self.target_type.is_none() {
			missing.push("target_type");
		}
		missing
	}

	/// Sources to read for a request with `method`
	///
	/// Explicit `sources` win, then `defaults`. With neither, safe methods
	/// read path and query while every other method also reads the body.
	pub fn effective_sources(&self, method: &Method, defaults: &[DataSource]) -> Vec<DataSource> {
		if !self.sources.is_empty() {
			return self.sources.clone();
		}
		if !defaults.is_empty() {
			return defaults.to_vec();
		}
		match *method {
			Method::GET | Method::HEAD | Method::DELETE | Method::OPTIONS => {
				vec![DataSource::Path, DataSource::Query]
			}
			_ => vec![DataSource::Path, DataSource::Query, DataSource::Body],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parambind_validators::Validate;
	use rstest::rstest;

	#[derive(Default, Serialize, Deserialize)]
	struct Dto {
		name: String,
	}

	impl Validate for Dto {}

	#[rstest]
	fn test_defaults() {
		let config = BindingConfig::new();
		assert!(!config.reuse_existing);
		assert!(!config.validate);
		assert!(config.validation_groups.is_empty());
		assert_eq!(config.missing_fields(), vec!["attribute_name", "target_type"]);
	}

	#[rstest]
	#[case(BindingConfig::bind::<Dto>("dto"), vec![])]
	#[case(BindingConfig::new().with_target::<Dto>(), vec!["attribute_name"])]
	#[case(BindingConfig::bind::<Dto>(""), vec!["attribute_name"])]
	#[case(BindingConfig::new().with_attribute_name("dto"), vec!["target_type"])]
	fn test_missing_fields(#[case] config: BindingConfig, #[case] expected: Vec<&'static str>) {
		assert_eq!(config.missing_fields(), expected);
	}

	#[rstest]
	#[case(Method::GET, vec![DataSource::Path, DataSource::Query])]
	#[case(Method::DELETE, vec![DataSource::Path, DataSource::Query])]
	#[case(Method::POST, vec![DataSource::Path, DataSource::Query, DataSource::Body])]
	#[case(Method::PATCH, vec![DataSource::Path, DataSource::Query, DataSource::Body])]
	fn test_sources_by_method(#[case] method: Method, #[case] expected: Vec<DataSource>) {
		assert_eq!(BindingConfig::new().effective_sources(&method, &[]), expected);
	}

	#[rstest]
	fn test_explicit_sources_win_over_defaults() {
		let config = BindingConfig::new().with_sources([DataSource::Body]);
		assert_eq!(
			config.effective_sources(&Method::GET, &[DataSource::Query]),
			vec![DataSource::Body]
		);
		assert_eq!(
			BindingConfig::new().effective_sources(&Method::POST, &[DataSource::Query]),
			vec![DataSource::Query]
		);
	}

	#[rstest]
	#[case("path", Ok(DataSource::Path))]
	#[case(" Body ", Ok(DataSource::Body))]
	#[case("cookie", Err("unknown data source: cookie".to_string()))]
	fn test_parse_source(#[case] raw: &str, #[case] expected: Result<DataSource, String>) {
		assert_eq!(raw.parse::<DataSource>(), expected);
	}
}
