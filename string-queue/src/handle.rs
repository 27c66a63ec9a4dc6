//! The queue operations over a handle that may be absent.
//!
//! An absent queue is never a crash: mutating operations report
//! [`QueueError::InvalidState`], `size` reports zero and the rest do nothing.

use crate::{error::QueueError, queue::Queue};

pub fn create() -> Queue {
    Queue::new()
}

/// Releases every node of `q`, then the queue itself.
pub fn destroy(q: Option<Queue>) {
    if let Some(mut q) = q {
        q.clear();
    }
}

pub fn insert_front(q: Option<&mut Queue>, value: &str) -> Result<(), QueueError> {
    q.ok_or(QueueError::InvalidState)?.insert_front(value)
}

pub fn insert_back(q: Option<&mut Queue>, value: &str) -> Result<(), QueueError> {
    q.ok_or(QueueError::InvalidState)?.insert_back(value)
}

/// See [`Queue::remove_front`] for how `buf` is filled.
pub fn remove_front(q: Option<&mut Queue>, buf: Option<&mut [u8]>) -> Result<(), QueueError> {
    q.ok_or(QueueError::InvalidState)?.remove_front(buf)
}

pub fn size(q: Option<&Queue>) -> usize {
    q.map_or(0, Queue::len)
}

pub fn reverse(q: Option<&mut Queue>) {
    if let Some(q) = q {
        q.reverse();
    }
}

pub fn sort(q: Option<&mut Queue>) {
    if let Some(q) = q {
        q.sort();
    }
}

pub fn sort_by<F>(q: Option<&mut Queue>, less: F)
where
    F: FnMut(&str, &str) -> bool,
{
    if let Some(q) = q {
        q.sort_by(less);
    }
}
