//! HTTP response

use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

/// HTTP response returned by controllers and the kernel
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	/// Serialize `data` as the JSON body
	///
	/// # Examples
	///
	/// ```
	/// use parambind_http::Response;
	///
	/// let response = Response::ok()
	///     .with_json(&serde_json::json!({"status": "ok"}))
	///     .unwrap();
	///
	/// assert_eq!(response.headers["content-type"], "application/json");
	/// assert_eq!(response.json::<serde_json::Value>().unwrap()["status"], "ok");
	/// ```
	pub fn with_json<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self, serde_json::Error> {
		self.body = Bytes::from(serde_json::to_vec(data)?);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	/// Deserialize the JSON body
	pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}
}
