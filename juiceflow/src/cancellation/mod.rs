//! Cooperative cancellation.
//!
//! A plant's running flag is a [`CancellationToken`]: the producer polls it
//! between items, and the callbacks registered on it stop the plant's
//! channels.

mod token;

pub use token::{CancelCallback, CancellationToken};
