use super::Request;
use hyper::Uri;
use hyper::header::CONTENT_TYPE;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

impl Request {
	/// Parse query parameters from URI
	pub(super) fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		split_query(uri)
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Get URL-decoded query parameters
	///
	/// `+` is treated as a space, as in form encoding.
	///
	/// # Examples
	///
	/// ```
	/// use parambind_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/test?name=John%20Doe&city=New+York")
	///     .build()
	///     .unwrap();
	///
	/// let decoded = request.decoded_query_params();
	/// assert_eq!(decoded.get("name"), Some(&"John Doe".to_string()));
	/// assert_eq!(decoded.get("city"), Some(&"New York".to_string()));
	/// ```
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_pairs().into_iter().collect()
	}

	/// Decoded query pairs in request order, repeated keys included
	///
	/// # Examples
	///
	/// ```
	/// use parambind_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/items?tag=a&tag=b%20c")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(
	///     request.query_pairs(),
	///     vec![
	///         ("tag".to_string(), "a".to_string()),
	///         ("tag".to_string(), "b c".to_string()),
	///     ]
	/// );
	/// ```
	pub fn query_pairs(&self) -> Vec<(String, String)> {
		split_query(&self.uri)
			.map(|(k, v)| (decode_component(k), decode_component(v)))
			.collect()
	}

	/// Set a path parameter (used by the router for `{name}` segments)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// Media type of the body, without parameters such as `charset`
	pub fn content_type(&self) -> Option<&str> {
		self.headers
			.get(CONTENT_TYPE)
			.and_then(|h| h.to_str().ok())
			.map(|ct| ct.split(';').next().unwrap_or(ct).trim())
	}

	pub fn is_json(&self) -> bool {
		self.content_type()
			.is_some_and(|ct| ct == "application/json" || ct.ends_with("+json"))
	}

	pub fn is_form(&self) -> bool {
		self.content_type() == Some("application/x-www-form-urlencoded")
	}
}

fn split_query(uri: &Uri) -> impl Iterator<Item = (&str, &str)> {
	uri.query()
		.unwrap_or("")
		.split('&')
		.filter(|pair| !pair.is_empty())
		.map(|pair| {
			// Split on first '=' only to preserve '=' in values (e.g., Base64)
			pair.split_once('=').unwrap_or((pair, ""))
		})
}

fn decode_component(raw: &str) -> String {
	let spaced = raw.replace('+', " ");
	percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
	use crate::Request;
	use hyper::Method;
	use rstest::rstest;

	#[rstest]
	#[case("/a?token=abc==", "token", "abc==")]
	#[case("/a?flag", "flag", "")]
	#[case("/a?x=1&&y=2", "y", "2")]
	fn test_query_parsing(#[case] uri: &str, #[case] key: &str, #[case] expected: &str) {
		let request = Request::builder().uri(uri).build().unwrap();
		assert_eq!(request.query_params.get(key).map(String::as_str), Some(expected));
	}

	#[rstest]
	fn test_repeated_keys() {
		let request = Request::builder()
			.uri("/items?tag=a&tag=b&page=2")
			.build()
			.unwrap();

		let pairs = request.query_pairs();
		let tags: Vec<&str> = pairs
			.iter()
			.filter(|(k, _)| k == "tag")
			.map(|(_, v)| v.as_str())
			.collect();
		assert_eq!(tags, vec!["a", "b"]);
		assert_eq!(pairs.len(), 3);
		assert_eq!(request.decoded_query_params().get("tag"), Some(&"b".to_string()));
	}

	#[rstest]
	#[case("application/json", true, false)]
	#[case("application/json; charset=utf-8", true, false)]
	#[case("application/problem+json", true, false)]
	#[case("application/x-www-form-urlencoded", false, true)]
	#[case("text/plain", false, false)]
	fn test_content_type_detection(
		#[case] content_type: &str,
		#[case] json: bool,
		#[case] form: bool,
	) {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/")
			.header("content-type", content_type)
			.build()
			.unwrap();
		assert_eq!(request.is_json(), json);
		assert_eq!(request.is_form(), form);
	}

	#[rstest]
	fn test_invalid_header_is_reported_by_build() {
		let result = Request::builder()
			.uri("/")
			.header("bad header", "x")
			.build();
		assert!(result.is_err());
	}

	#[rstest]
	fn test_context_shares_attributes() {
		let mut request = Request::builder()
			.uri("/users/7?q=a%20b")
			.build()
			.unwrap();
		request.set_path_param("id", "7");

		let context = request.context();
		context.attributes.set("seen", true);

		assert_eq!(context.path(), "/users/7");
		assert_eq!(context.path_params.get("id"), Some(&"7".to_string()));
		assert_eq!(context.query_params.get("q"), Some(&"a b".to_string()));
		assert_eq!(request.attributes().get::<bool>("seen").as_deref(), Some(&true));
	}
}
