//! A singly-linked, double-ended queue of strings with in-place reversal and
//! merge sort.

pub mod error;
pub mod handle;
pub mod harness;
mod mergesort;
pub mod order;
pub mod queue;

pub use error::QueueError;
pub use queue::{Iter, Queue};
