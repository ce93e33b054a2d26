//! The handler trait shared by controllers and the kernel

use async_trait::async_trait;
use parambind_core::exception::Result;
use std::sync::Arc;

use crate::{Request, Response};

/// Turns a request into a response
///
/// Controllers and the kernel itself implement this trait.
#[async_trait]
pub trait Handler: Send + Sync {
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}
