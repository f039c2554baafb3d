//! Core types for DECT MAC slot management
//!
//! This crate provides the frame slot bookkeeping used by the MAC:
//! - SlotMap, the per-frame occupancy table
//! - ClientInfo and SlotRange for client reservations
//! - SlotAllocator, first-fit contiguous assignment and release
//! - Logging setup and debug macros

pub mod client_info;
pub mod debug;
pub mod slot_alloc;
pub mod slot_alloc_err;
pub mod slot_map;
pub mod slot_range;

// Re-export commonly used items
pub use client_info::{ClientId, ClientInfo};
pub use slot_alloc::SlotAllocator;
pub use slot_alloc_err::{InvalidInput, SlotAllocErr};
pub use slot_map::{MAX_SLOTS, SlotMap, SlotState};
pub use slot_range::SlotRange;

/// Maximum number of clients the MAC tracks at once
pub const MAX_CLIENTS: usize = 10;
