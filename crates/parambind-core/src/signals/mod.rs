//! Prioritized async signals
//!
//! A [`Signal`] delivers a payload to every connected receiver, highest
//! priority first, and awaits each receiver before calling the next. The
//! first receiver error stops delivery and is returned to the sender.
//!
//! ```
//! use parambind_core::signals::{Signal, SignalName};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! # tokio_test::block_on(async {
//! let signal = Signal::<String>::new(SignalName::custom("user_created"));
//! let counter = Arc::new(AtomicUsize::new(0));
//! let seen = counter.clone();
//!
//! signal.connect(move |_name| {
//!     let seen = seen.clone();
//!     async move {
//!         seen.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     }
//! });
//!
//! signal.send("alice".to_string()).await.unwrap();
//! assert_eq!(counter.load(Ordering::SeqCst), 1);
//! # });
//! ```

mod error;
mod name;
mod signal;

pub use error::SignalError;
pub use name::SignalName;
pub use signal::{ReceiverFn, Signal};
