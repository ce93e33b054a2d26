//! Populating target objects from request data
//!
//! [`DefaultRequestMapper`] starts from the object already in the attribute
//! bag (or a fresh default), turns it into a JSON object and lays the
//! configured request sources over it in order:
//!
//! ```text
//! base object → path params → query params → body → deserialize
//! ```
//!
//! Path, query and form values arrive as strings. When the base object has
//! a number or a boolean under the same key, the string is converted so the
//! final deserialization sees the right JSON type. A key repeated in the
//! query string or a form body fills an array field.
//!
//! The base object says nothing about fields that default to `null` (such
//! as `Option<u32>`) or to an empty array. For those the mapper infers a
//! boolean, an integer or a float from the string and keeps the first
//! candidate the target type accepts, falling back to the plain string.

use crate::config::{BindingConfig, DataSource};
use crate::settings::BindingSettings;
use crate::target::{BoundValue, TargetType};
use async_trait::async_trait;
use indexmap::IndexMap;
use parambind_core::exception::{Error, Result};
use parambind_http::Request;
use serde_json::{Map, Number, Value};

/// Builds the bound object for a request
#[async_trait]
pub trait RequestMapper: Send + Sync {
	/// Map `request` onto `config.target_type`
	///
	/// # Errors
	///
	/// Returns [`Error::Mapping`] when the request data does not fit the
	/// target type.
	async fn map(&self, request: &Request, config: &BindingConfig) -> Result<BoundValue>;
}

/// Values read from one request source
enum SourceFields {
	/// Path, query or form pairs; keys may repeat
	Text(Vec<(String, String)>),
	/// A JSON object body
	Json(Map<String, Value>),
}

/// String values whose JSON type the base object does not reveal
struct Untyped {
	raws: Vec<String>,
	/// The base field is an (empty) array
	list: bool,
}

impl Untyped {
	/// Candidate JSON values, most specific first
	fn candidates(&self) -> Vec<Value> {
		let mut candidates = Vec::new();
		if !self.list
			&& let Some(last) = self.raws.last()
		{
			candidates.push(infer(last));
			candidates.push(Value::String(last.clone()));
		}
		candidates.push(Value::Array(self.raws.iter().map(|raw| infer(raw)).collect()));
		candidates.push(self.texts());
		candidates.dedup();
		candidates
	}

	fn texts(&self) -> Value {
		Value::Array(self.raws.iter().cloned().map(Value::String).collect())
	}

	/// Used when no candidate fits, so deserialization reports the error
	fn fallback(&self) -> Value {
		match self.raws.last() {
			Some(last) if !self.list => Value::String(last.clone()),
			_ => self.texts(),
		}
	}
}

/// Path, query, JSON and form mapper
#[derive(Debug, Clone)]
pub struct DefaultRequestMapper {
	max_body_bytes: usize,
	default_sources: Vec<DataSource>,
}

impl Default for DefaultRequestMapper {
	fn default() -> Self {
		Self::from_settings(&BindingSettings::default())
	}
}

impl DefaultRequestMapper {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_settings(settings: &BindingSettings) -> Self {
		Self {
			max_body_bytes: settings.max_body_bytes,
			default_sources: settings.default_sources.clone(),
		}
	}

	pub fn with_max_body_bytes(mut self, max: usize) -> Self {
		self.max_body_bytes = max;
		self
	}

	fn base_object(
		&self,
		request: &Request,
		config: &BindingConfig,
		target: &TargetType,
	) -> BoundValue {
		config
			.attribute_name
			.as_deref()
			.and_then(|name| request.attributes().get_value(name))
			.filter(|value| target.matches(value))
			.unwrap_or_else(|| target.construct())
	}

	fn source_fields(&self, request: &Request, source: DataSource) -> Result<Option<SourceFields>> {
		match source {
			DataSource::Path => Ok(Some(SourceFields::Text(
				request
					.path_params
					.iter()
					.map(|(k, v)| (k.clone(), v.clone()))
					.collect(),
			))),
			DataSource::Query => Ok(Some(SourceFields::Text(request.query_pairs()))),
			DataSource::Body => self.body_fields(request),
		}
	}

	fn body_fields(&self, request: &Request) -> Result<Option<SourceFields>> {
		let body = request.body();
		if body.is_empty() {
			return Ok(None);
		}
		if body.len() > self.max_body_bytes {
			return Err(Error::Mapping(format!(
				"request body of {} bytes exceeds the limit of {} bytes",
				body.len(),
				self.max_body_bytes
			)));
		}

		if request.is_json() {
			return match serde_json::from_slice::<Value>(body) {
				Ok(Value::Object(fields)) => Ok(Some(SourceFields::Json(fields))),
				Ok(_) => Err(Error::Mapping("JSON body must be an object".to_string())),
				Err(e) => Err(Error::Mapping(format!("invalid JSON body: {}", e))),
			};
		}

		if request.is_form() {
			let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
				.map_err(|e| Error::Mapping(format!("invalid form body: {}", e)))?;
			return Ok(Some(SourceFields::Text(pairs)));
		}

		Err(Error::Mapping(format!(
			"unsupported content type: {}",
			request.content_type().unwrap_or("none")
		)))
	}
}

#[async_trait]
impl RequestMapper for DefaultRequestMapper {
	async fn map(&self, request: &Request, config: &BindingConfig) -> Result<BoundValue> {
		let target = config
			.target_type
			.ok_or_else(|| Error::Configuration("binding has no target type".to_string()))?;

		let base = match target.to_json(&self.base_object(request, config, &target))? {
			Value::Object(fields) => fields,
			_ => {
				return Err(Error::Mapping(format!(
					"{} does not serialize to a JSON object",
					target.short_name()
				)));
			}
		};
		let mut fields = base.clone();
		let mut untyped = IndexMap::new();

		for source in config.effective_sources(&request.method, &self.default_sources) {
			match self.source_fields(request, source)? {
				Some(SourceFields::Text(pairs)) => {
					overlay_text(&mut fields, &mut untyped, &base, pairs);
				}
				Some(SourceFields::Json(values)) => {
					for key in values.keys() {
						untyped.shift_remove(key);
					}
					fields.extend(values);
				}
				None => {}
			}
			tracing::trace!(
				source = %source,
				target = target.short_name(),
				"merged request source"
			);
		}

		resolve_untyped(&target, &mut fields, &base, untyped);
		target.from_json(Value::Object(fields))
	}
}

/// Lay string pairs over `fields`, typed by the `base` field under each key
fn overlay_text(
	fields: &mut Map<String, Value>,
	untyped: &mut IndexMap<String, Untyped>,
	base: &Map<String, Value>,
	pairs: Vec<(String, String)>,
) {
	let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
	for (key, raw) in pairs {
		grouped.entry(key).or_default().push(raw);
	}

	for (key, raws) in grouped {
		let value = match base.get(&key) {
			Some(Value::Array(items)) if !items.is_empty() => Value::Array(
				raws.into_iter()
					.map(|raw| coerce(items.first(), raw))
					.collect(),
			),
			Some(Value::Array(_)) => {
				untyped.insert(key, Untyped { raws, list: true });
				continue;
			}
			None | Some(Value::Null) => {
				untyped.insert(key, Untyped { raws, list: false });
				continue;
			}
			existing => match raws.into_iter().last() {
				Some(raw) => coerce(existing, raw),
				None => continue,
			},
		};
		untyped.shift_remove(&key);
		fields.insert(key, value);
	}
}

/// Pick a JSON value for every untyped key
///
/// Each key is tried on its own, with the other untyped keys left at their
/// base value, so one key's choice never depends on another's.
fn resolve_untyped(
	target: &TargetType,
	fields: &mut Map<String, Value>,
	base: &Map<String, Value>,
	untyped: IndexMap<String, Untyped>,
) {
	if untyped.is_empty() {
		return;
	}

	let mut isolated = fields.clone();
	for key in untyped.keys() {
		match base.get(key) {
			Some(value) => isolated.insert(key.clone(), value.clone()),
			None => isolated.remove(key),
		};
	}

	for (key, values) in untyped {
		let chosen = values.candidates().into_iter().find(|candidate| {
			let mut trial = isolated.clone();
			trial.insert(key.clone(), candidate.clone());
			target.from_json(Value::Object(trial)).is_ok()
		});
		fields.insert(key, chosen.unwrap_or_else(|| values.fallback()));
	}
}

/// Convert `raw` to the JSON type of `existing`, keeping it a string when it does not parse
fn coerce(existing: Option<&Value>, raw: String) -> Value {
	let converted = match existing {
		Some(Value::Number(n)) if n.is_f64() => parse_float(&raw),
		Some(Value::Number(_)) => parse_integer(&raw),
		Some(Value::Bool(_)) => match raw.trim().to_lowercase().as_str() {
			"true" | "1" | "on" | "yes" => Some(Value::Bool(true)),
			"false" | "0" | "off" | "no" | "" => Some(Value::Bool(false)),
			_ => None,
		},
		_ => None,
	};
	converted.unwrap_or(Value::String(raw))
}

/// Guess the JSON type of a string with no type to go by
fn infer(raw: &str) -> Value {
	let trimmed = raw.trim();
	if trimmed.eq_ignore_ascii_case("true") {
		return Value::Bool(true);
	}
	if trimmed.eq_ignore_ascii_case("false") {
		return Value::Bool(false);
	}
	parse_integer(raw)
		.or_else(|| parse_float(raw))
		.unwrap_or_else(|| Value::String(raw.to_string()))
}

fn parse_integer(raw: &str) -> Option<Value> {
	let trimmed = raw.trim();
	trimmed
		.parse::<i64>()
		.map(Value::from)
		.or_else(|_| trimmed.parse::<u64>().map(Value::from))
		.ok()
}

fn parse_float(raw: &str) -> Option<Value> {
	raw.trim()
		.parse::<f64>()
		.ok()
		.and_then(Number::from_f64)
		.map(Value::Number)
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::Method;
	use parambind_validators::Validate;
	use rstest::{fixture, rstest};
	use serde::{Deserialize, Serialize};
	use serde_json::json;
	use std::sync::Arc;

	#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
	struct Filter {
		id: u64,
		name: String,
		score: f64,
		active: bool,
		note: Option<String>,
	}

	impl Validate for Filter {}

	#[fixture]
	fn mapper() -> DefaultRequestMapper {
		DefaultRequestMapper::new()
	}

	fn mapped(value: BoundValue) -> Filter {
		value.downcast_ref::<Filter>().cloned().unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_query_and_path_are_coerced(mapper: DefaultRequestMapper) {
		let mut request = Request::builder()
			.uri("/filters/7?name=Jane%20Doe&score=4.5&active=on")
			.build()
			.unwrap();
		request.set_path_param("id", "7");

		let config = BindingConfig::bind::<Filter>("filter");
		let filter = mapped(mapper.map(&request, &config).await.unwrap());

		assert_eq!(
			filter,
			Filter {
				id: 7,
				name: "Jane Doe".to_string(),
				score: 4.5,
				active: true,
				note: None,
			}
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_json_body_overrides_query(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/filters?name=query")
			.header("content-type", "application/json")
			.body(r#"{"name":"body","note":"hi"}"#)
			.build()
			.unwrap();

		let config = BindingConfig::bind::<Filter>("filter");
		let filter = mapped(mapper.map(&request, &config).await.unwrap());

		assert_eq!(filter.name, "body");
		assert_eq!(filter.note.as_deref(), Some("hi"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_form_body(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/filters")
			.header("content-type", "application/x-www-form-urlencoded")
			.body("name=a+b&id=3&active=false")
			.build()
			.unwrap();

		let config = BindingConfig::bind::<Filter>("filter");
		let filter = mapped(mapper.map(&request, &config).await.unwrap());

		assert_eq!(filter.name, "a b");
		assert_eq!(filter.id, 3);
		assert!(!filter.active);
	}

	#[rstest]
	#[tokio::test]
	async fn test_existing_attribute_is_the_base(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.uri("/filters?score=1.5")
			.build()
			.unwrap();
		request.attributes().set(
			"filter",
			Filter {
				id: 99,
				name: "kept".to_string(),
				..Filter::default()
			},
		);

		let config = BindingConfig::bind::<Filter>("filter").with_reuse_existing(true);
		let filter = mapped(mapper.map(&request, &config).await.unwrap());

		assert_eq!(filter.id, 99);
		assert_eq!(filter.name, "kept");
		assert_eq!(filter.score, 1.5);
	}

	#[rstest]
	#[tokio::test]
	async fn test_attribute_of_other_type_is_ignored(mapper: DefaultRequestMapper) {
		let request = Request::builder().uri("/filters").build().unwrap();
		request.attributes().set("filter", "not a filter".to_string());

		let config = BindingConfig::bind::<Filter>("filter").with_reuse_existing(true);
		let filter = mapped(mapper.map(&request, &config).await.unwrap());

		assert_eq!(filter, Filter::default());
	}

	#[rstest]
	#[case("application/json", "[1,2]", "JSON body must be an object")]
	#[case("application/json", "{oops", "invalid JSON body")]
	#[case("text/plain", "hello", "unsupported content type: text/plain")]
	#[tokio::test]
	async fn test_bad_bodies(
		mapper: DefaultRequestMapper,
		#[case] content_type: &str,
		#[case] body: &'static str,
		#[case] expected: &str,
	) {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/filters")
			.header("content-type", content_type)
			.body(body)
			.build()
			.unwrap();

		let config = BindingConfig::bind::<Filter>("filter");
		match mapper.map(&request, &config).await {
			Err(Error::Mapping(message)) => assert!(message.starts_with(expected), "{}", message),
			other => panic!("unexpected result: {:?}", other.map(|_| ())),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_body_limit() {
		let mapper = DefaultRequestMapper::new().with_max_body_bytes(4);
		let request = Request::builder()
			.method(Method::POST)
			.uri("/filters")
			.header("content-type", "application/json")
			.body(r#"{"name":"too long"}"#)
			.build()
			.unwrap();

		let config = BindingConfig::bind::<Filter>("filter");
		assert!(matches!(
			mapper.map(&request, &config).await,
			Err(Error::Mapping(_))
		));
	}

	#[rstest]
	#[tokio::test]
	async fn test_body_ignored_for_get_by_default(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.uri("/filters")
			.header("content-type", "text/plain")
			.body("ignored")
			.build()
			.unwrap();

		let config = BindingConfig::bind::<Filter>("filter");
		assert!(mapper.map(&request, &config).await.is_ok());
	}

	#[rstest]
	#[tokio::test]
	async fn test_unparsable_number_fails_deserialization(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.uri("/filters?id=seven")
			.build()
			.unwrap();

		let config = BindingConfig::bind::<Filter>("filter");
		assert!(matches!(
			mapper.map(&request, &config).await,
			Err(Error::Mapping(_))
		));
	}

	#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
	struct ListQuery {
		page: Option<u32>,
		active: Option<bool>,
		ratio: Option<f64>,
		label: Option<String>,
		tag: Vec<String>,
		ids: Vec<u32>,
	}

	impl Validate for ListQuery {}

	async fn list_query(mapper: &DefaultRequestMapper, request: &Request) -> Result<ListQuery> {
		let config = BindingConfig::bind::<ListQuery>("query");
		let value = mapper.map(request, &config).await?;
		Ok(value.downcast_ref::<ListQuery>().cloned().unwrap())
	}

	#[rstest]
	#[tokio::test]
	async fn test_optional_fields_from_query(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.uri("/items?page=2&active=true&ratio=0.5&label=12")
			.build()
			.unwrap();

		let query = list_query(&mapper, &request).await.unwrap();

		assert_eq!(query.page, Some(2));
		assert_eq!(query.active, Some(true));
		assert_eq!(query.ratio, Some(0.5));
		assert_eq!(query.label.as_deref(), Some("12"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_repeated_query_keys_fill_arrays(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.uri("/items?tag=a&ids=3&tag=b&ids=5&page=1&page=9")
			.build()
			.unwrap();

		let query = list_query(&mapper, &request).await.unwrap();

		assert_eq!(query.tag, vec!["a".to_string(), "b".to_string()]);
		assert_eq!(query.ids, vec![3, 5]);
		assert_eq!(query.page, Some(9));
	}

	#[rstest]
	#[tokio::test]
	async fn test_single_value_fills_array(mapper: DefaultRequestMapper) {
		let request = Request::builder().uri("/items?tag=7").build().unwrap();

		let query = list_query(&mapper, &request).await.unwrap();

		assert_eq!(query.tag, vec!["7".to_string()]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_repeated_form_keys_fill_arrays(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/items")
			.header("content-type", "application/x-www-form-urlencoded")
			.body("tag=x&tag=y+z&active=false")
			.build()
			.unwrap();

		let query = list_query(&mapper, &request).await.unwrap();

		assert_eq!(query.tag, vec!["x".to_string(), "y z".to_string()]);
		assert_eq!(query.active, Some(false));
	}

	#[rstest]
	#[tokio::test]
	async fn test_json_body_replaces_untyped_query_value(mapper: DefaultRequestMapper) {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/items?page=abc")
			.header("content-type", "application/json")
			.body(r#"{"page":3}"#)
			.build()
			.unwrap();

		let query = list_query(&mapper, &request).await.unwrap();

		assert_eq!(query.page, Some(3));
	}

	#[rstest]
	#[tokio::test]
	async fn test_unparsable_optional_number_fails(mapper: DefaultRequestMapper) {
		let request = Request::builder().uri("/items?page=two").build().unwrap();

		assert!(matches!(
			list_query(&mapper, &request).await,
			Err(Error::Mapping(_))
		));
	}

	#[rstest]
	#[case("true", json!(true))]
	#[case("FALSE", json!(false))]
	#[case("-3", json!(-3))]
	#[case("18446744073709551615", json!(18446744073709551615u64))]
	#[case("2.5", json!(2.5))]
	#[case("NaN", json!("NaN"))]
	#[case("", json!(""))]
	#[case("abc", json!("abc"))]
	fn test_infer(#[case] raw: &str, #[case] expected: Value) {
		assert_eq!(infer(raw), expected);
	}

	#[rstest]
	#[case(json!(1), "42", json!(42))]
	#[case(json!(1.5), "2.25", json!(2.25))]
	#[case(json!(false), "yes", json!(true))]
	#[case(json!(null), "12", json!("12"))]
	#[case(json!("text"), "12", json!("12"))]
	fn test_coerce(#[case] existing: Value, #[case] raw: &str, #[case] expected: Value) {
		assert_eq!(coerce(Some(&existing), raw.to_string()), expected);
	}

	#[rstest]
	fn test_missing_target_is_a_configuration_error() {
		let request = Request::builder().uri("/").build().unwrap();
		let config = BindingConfig::new().with_attribute_name("x");
		let result = tokio_test::block_on(DefaultRequestMapper::new().map(&request, &config));
		assert!(matches!(result, Err(Error::Configuration(_))));
	}

	#[rstest]
	fn test_mapper_is_object_safe() {
		let _: Arc<dyn RequestMapper> = Arc::new(DefaultRequestMapper::new());
	}
}
