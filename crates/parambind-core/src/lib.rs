//! # parambind core
//!
//! Shared building blocks for the parambind crates:
//!
//! - [`exception`]: the workspace error type and its HTTP status mapping
//! - [`signals`]: prioritized async signals used to publish binding
//!   notifications to listeners

pub mod exception;
pub mod signals;
