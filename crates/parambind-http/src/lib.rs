//! HTTP types for parambind
//!
//! - [`Request`]: the in-flight request, with its string-keyed
//!   [`Attributes`] bag and type-keyed [`Extensions`]
//! - [`RequestContext`]: a cloneable view of a request handed to listeners
//! - [`Response`]
//! - [`Handler`]

pub mod attributes;
pub mod extensions;
pub mod handler;
pub mod request;
pub mod response;

pub use attributes::{AttributeValue, Attributes};
pub use extensions::Extensions;
pub use handler::Handler;
pub use request::{Request, RequestBuilder, RequestContext};
pub use response::Response;
