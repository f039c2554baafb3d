use core::fmt;

use crate::client_info::ClientId;

/// Caller errors. Never retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    ZeroClientId,
    ZeroSlotsNeeded { client_id: ClientId },
    /// The client still holds a reservation starting at `start`; release it first
    AlreadyAssigned { client_id: ClientId, start: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAllocErr {
    InvalidInput(InvalidInput),
    /// No contiguous run of `needed` free slots exists. The slot map is unchanged.
    InsufficientCapacity { client_id: ClientId, needed: u16 },
}

impl From<InvalidInput> for SlotAllocErr {
    fn from(e: InvalidInput) -> Self {
        SlotAllocErr::InvalidInput(e)
    }
}

impl fmt::Display for SlotAllocErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotAllocErr::InvalidInput(InvalidInput::ZeroClientId) => write!(f, "invalid client id 0"),
            SlotAllocErr::InvalidInput(InvalidInput::ZeroSlotsNeeded { client_id }) => {
                write!(f, "client {} requested 0 slots", client_id)
            }
            SlotAllocErr::InvalidInput(InvalidInput::AlreadyAssigned { client_id, start }) => {
                write!(f, "client {} already holds slots starting at {}", client_id, start)
            }
            SlotAllocErr::InsufficientCapacity { client_id, needed } => {
                write!(f, "no {} contiguous free slots for client {}", needed, client_id)
            }
        }
    }
}

impl std::error::Error for SlotAllocErr {}
