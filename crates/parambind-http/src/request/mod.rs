//! The in-flight HTTP request

mod params;

use crate::{Attributes, Extensions};
use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;

/// HTTP request passed through the kernel and its listeners
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	body: Bytes,
	/// Raw (still percent-encoded) query parameters
	pub query_params: HashMap<String, String>,
	/// Parameters captured from the matched route pattern
	pub path_params: HashMap<String, String>,
	attributes: Attributes,
	extensions: Extensions,
}

impl Request {
	/// Create a request from its parts
	///
	/// # Examples
	///
	/// ```
	/// use parambind_http::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/users?page=2"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	///
	/// assert_eq!(request.path(), "/users");
	/// assert_eq!(request.query_params.get("page"), Some(&"2".to_string()));
	/// ```
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			query_params,
			path_params: HashMap::new(),
			attributes: Attributes::new(),
			extensions: Extensions::new(),
		}
	}

	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn body(&self) -> &Bytes {
		&self.body
	}

	/// The per-request attribute bag
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Type-keyed request-scoped state
	pub fn extensions(&self) -> &Extensions {
		&self.extensions
	}

	/// A cloneable view of this request
	///
	/// The context shares the attribute bag with the request.
	pub fn context(&self) -> RequestContext {
		RequestContext {
			method: self.method.clone(),
			uri: self.uri.clone(),
			headers: self.headers.clone(),
			path_params: self.path_params.clone(),
			query_params: self.decoded_query_params(),
			attributes: self.attributes.clone(),
		}
	}
}

/// Read-only snapshot of a request, with shared access to its attributes
#[derive(Debug, Clone)]
pub struct RequestContext {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	pub path_params: HashMap<String, String>,
	/// Percent-decoded query parameters
	pub query_params: HashMap<String, String>,
	pub attributes: Attributes,
}

impl RequestContext {
	pub fn path(&self) -> &str {
		self.uri.path()
	}
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	error: Option<http::Error>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Append one header; an invalid name or value is reported by [`build`](Self::build)
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if self.error.is_some() {
			return self;
		}
		match (
			name.parse::<HeaderName>(),
			value.parse::<HeaderValue>(),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.append(name, value);
			}
			(Err(e), _) => self.error = Some(e.into()),
			(_, Err(e)) => self.error = Some(e.into()),
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Build the request
	///
	/// # Errors
	///
	/// Returns an error if the URI or a header added with
	/// [`header`](Self::header) does not parse.
	///
	/// # Examples
	///
	/// ```
	/// use parambind_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/users")
	///     .header("content-type", "application/json")
	///     .body(r#"{"username":"alice"}"#)
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.content_type(), Some("application/json"));
	/// ```
	pub fn build(self) -> Result<Request, http::Error> {
		if let Some(error) = self.error {
			return Err(error);
		}
		let uri = match self.uri {
			Some(uri) => uri.parse::<Uri>()?,
			None => Uri::from_static("/"),
		};
		Ok(Request::new(
			self.method,
			uri,
			self.version,
			self.headers,
			self.body,
		))
	}
}
