//! Route patterns with `{name}` placeholders

use crate::events::ControllerRef;
use hyper::Method;
use parambind_http::Handler;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param(String),
}

/// A parsed path pattern such as `/users/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
	raw: String,
	segments: Vec<Segment>,
}

impl RoutePattern {
	/// Parse a pattern; `{name}` segments capture one path segment each
	///
	/// # Examples
	///
	/// ```
	/// use parambind_kernel::RoutePattern;
	///
	/// let pattern = RoutePattern::parse("/users/{id}/posts/{post}");
	/// let params = pattern.matches("/users/7/posts/12").unwrap();
	///
	/// assert_eq!(params.get("id"), Some(&"7".to_string()));
	/// assert_eq!(params.get("post"), Some(&"12".to_string()));
	/// assert!(pattern.matches("/users/7").is_none());
	/// ```
	pub fn parse(pattern: &str) -> Self {
		let segments = split(pattern)
			.map(|segment| {
				match segment
					.strip_prefix('{')
					.and_then(|rest| rest.strip_suffix('}'))
				{
					Some(name) => Segment::Param(name.to_string()),
					None => Segment::Literal(segment.to_string()),
				}
			})
			.collect();

		Self {
			raw: pattern.to_string(),
			segments,
		}
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Match `path`, returning the captured parameters
	///
	/// A trailing slash is ignored. Captured values are percent-decoded.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let parts: Vec<&str> = split(path).collect();
		if parts.len() != self.segments.len() {
			return None;
		}

		let mut params = HashMap::new();
		for (segment, part) in self.segments.iter().zip(parts) {
			match segment {
				Segment::Literal(literal) if literal == part => {}
				Segment::Literal(_) => return None,
				Segment::Param(name) => {
					let value = percent_encoding::percent_decode_str(part)
						.decode_utf8_lossy()
						.into_owned();
					params.insert(name.clone(), value);
				}
			}
		}
		Some(params)
	}
}

fn split(path: &str) -> impl Iterator<Item = &str> {
	path.trim_matches('/')
		.split('/')
		.filter(|segment| !segment.is_empty())
}

/// A registered route
#[derive(Clone)]
pub struct Route {
	pub method: Method,
	pub pattern: RoutePattern,
	pub controller: ControllerRef,
	pub handler: Arc<dyn Handler>,
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("method", &self.method)
			.field("pattern", &self.pattern.as_str())
			.field("controller", &self.controller)
			.finish_non_exhaustive()
	}
}
