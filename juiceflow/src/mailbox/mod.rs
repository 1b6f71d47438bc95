//! Blocking handoff channels between plant stages.
//!
//! Each boundary between two adjacent roles in a plant is a
//! [`SingleSlotChannel`]. Its capacity of one is the plant's only
//! backpressure mechanism: a fast stage can get at most one item ahead of a
//! slow one.

mod slot;

pub use slot::{Rejected, SingleSlotChannel};
