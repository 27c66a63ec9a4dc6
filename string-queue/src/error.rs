use derive_more::{Display, Error};

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Node storage or the copy of a value could not be obtained.
    #[display(fmt = "allocation failed")]
    AllocationError,

    /// The queue is absent, or empty when an element was required.
    #[display(fmt = "queue is absent or empty")]
    InvalidState,
}
