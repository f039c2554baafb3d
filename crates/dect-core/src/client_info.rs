use crate::slot_range::SlotRange;

/// Client identifier. Zero is never a valid id.
pub type ClientId = u32;

/// A client admitted by the MAC, together with the slot run it was granted (if any).
/// The slot count is fixed at admission so a cached range can never drift from the map.
/// The grant is only ever written by the SlotAllocator, and records which allocator made it.
/// Not Clone: a copy could release a run the original still owns.
#[derive(Debug, PartialEq, Eq)]
pub struct ClientInfo {
    client_id: ClientId,
    num_slots_needed: u16,
    /// (granting allocator id, start index)
    pub(crate) grant: Option<(u32, u16)>,
}

impl ClientInfo {
    pub fn new(client_id: ClientId, num_slots_needed: u16) -> Self {
        Self {
            client_id,
            num_slots_needed,
            grant: None,
        }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn num_slots_needed(&self) -> u16 {
        self.num_slots_needed
    }

    pub fn assigned_slot_start(&self) -> Option<u16> {
        self.grant.map(|(_, start)| start)
    }

    pub fn is_assigned(&self) -> bool {
        self.grant.is_some()
    }

    /// The run this client currently owns, `[start, start + num_slots_needed)`
    pub fn assigned_range(&self) -> Option<SlotRange> {
        self.assigned_slot_start()
            .map(|start| SlotRange::new(start, self.num_slots_needed))
    }
}
