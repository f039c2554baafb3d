use std::sync::atomic::{AtomicU32, Ordering};

use crate::assert_warn;
use crate::client_info::ClientInfo;
use crate::slot_alloc_err::{InvalidInput, SlotAllocErr};
use crate::slot_map::{MAX_SLOTS, SlotMap, SlotState};
use crate::slot_range::SlotRange;

static NEXT_ALLOC_ID: AtomicU32 = AtomicU32::new(1);

/// Grants contiguous slot runs to clients, first-fit by lowest index.
///
/// The allocator is the only writer of its SlotMap. At all times the set of Reserved slots
/// equals the union of the ranges cached in the currently assigned ClientInfos, and those
/// ranges are pairwise disjoint. When shared between threads, each assign/release must run
/// under one lock guarding the whole allocator (see `SharedConfig::state_write`).
///
/// Not Clone: a copy would share its id, letting clients of one copy free slots in the other.
#[derive(Debug)]
pub struct SlotAllocator {
    /// Stamped into every grant, so a client can only be released where it was assigned
    id: u32,
    map: SlotMap,
}

impl Default for SlotAllocator {
    fn default() -> Self {
        Self::new(MAX_SLOTS)
    }
}

impl SlotAllocator {
    pub fn new(capacity: u16) -> Self {
        Self {
            id: NEXT_ALLOC_ID.fetch_add(1, Ordering::Relaxed),
            map: SlotMap::new(capacity),
        }
    }

    pub fn capacity(&self) -> u16 {
        self.map.capacity()
    }

    /// Read-only view for diagnostics
    pub fn slot_map(&self) -> &SlotMap {
        &self.map
    }

    /// Finds the lowest index at which `needed` consecutive Free slots start.
    /// Single pass over the map, no wrap-around. Returns None when `needed` is 0,
    /// larger than the capacity, or when no free run is long enough.
    pub fn find_free_run(&self, needed: u16) -> Option<u16> {
        if needed == 0 || needed > self.map.capacity() {
            return None;
        }

        let mut run_start = 0;
        let mut run_len = 0;
        for (idx, state) in self.map.iter() {
            match state {
                SlotState::Free => {
                    if run_len == 0 {
                        run_start = idx;
                    }
                    run_len += 1;
                    if run_len == needed {
                        return Some(run_start);
                    }
                }
                SlotState::Reserved => {
                    run_len = 0;
                }
            }
        }
        None
    }

    /// Reserves a run of `client.num_slots_needed()` slots and records its start in `client`.
    /// On error, neither the map nor the client is modified.
    pub fn assign(&mut self, client: &mut ClientInfo) -> Result<SlotRange, SlotAllocErr> {
        let client_id = client.client_id();
        let needed = client.num_slots_needed();

        if client_id == 0 {
            tracing::warn!("assign: rejecting client with id 0");
            return Err(InvalidInput::ZeroClientId.into());
        }
        if needed == 0 {
            tracing::warn!(client = client_id, "assign: client requested 0 slots");
            return Err(InvalidInput::ZeroSlotsNeeded { client_id }.into());
        }
        if let Some(start) = client.assigned_slot_start() {
            tracing::warn!(client = client_id, "assign: client already holds slots starting at {}", start);
            return Err(InvalidInput::AlreadyAssigned { client_id, start }.into());
        }

        let Some(start) = self.find_free_run(needed) else {
            tracing::warn!(
                client = client_id,
                "no free slots available: need {}, {} free of {}",
                needed,
                self.map.num_free(),
                self.map.capacity()
            );
            return Err(SlotAllocErr::InsufficientCapacity { client_id, needed });
        };

        let range = SlotRange::new(start, needed);
        for idx in range.iter() {
            self.map.set(idx, SlotState::Reserved);
        }
        client.grant = Some((self.id, start));

        tracing::info!(client = client_id, "assigned slots {}", range);
        Ok(range)
    }

    /// Frees the client's run, if it holds one granted by this allocator, and marks it unassigned.
    /// Returns the freed range; None means nothing changed, either because the client held
    /// nothing or because its run was granted by another allocator.
    pub fn release(&mut self, client: &mut ClientInfo) -> Option<SlotRange> {
        let client_id = client.client_id();
        let Some((alloc_id, _)) = client.grant else {
            tracing::debug!(client = client_id, "release: client holds no slots");
            return None;
        };
        let range = client.assigned_range()?;

        if alloc_id != self.id {
            tracing::warn!(
                client = client_id,
                "release: slots {} were granted by allocator {}, not {}; ignoring",
                range,
                alloc_id,
                self.id
            );
            return None;
        }

        for idx in range.iter() {
            assert_warn!(
                self.map.state(idx) == Some(SlotState::Reserved),
                "client {} releases slot {} which is not reserved",
                client_id,
                idx
            );
            self.map.set(idx, SlotState::Free);
        }
        client.grant = None;

        tracing::info!(client = client_id, "freed slots {}", range);
        Some(range)
    }
}
