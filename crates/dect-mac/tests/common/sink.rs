use dect_core::{ClientId, SlotRange};
use dect_mac::PhySchedTrait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhySchedEvent {
    Granted(ClientId, SlotRange),
    Revoked(ClientId, SlotRange),
}

/// A PHY scheduler sink for testing purposes
/// Collects all hand-offs from the MAC for later inspection
#[derive(Default)]
pub struct PhySchedSink {
    events: Vec<PhySchedEvent>,
}

impl PhySchedSink {
    pub fn take_events(&mut self) -> Vec<PhySchedEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PhySchedTrait for PhySchedSink {
    fn slots_granted(&mut self, client_id: ClientId, range: SlotRange) {
        tracing::debug!(client = client_id, "sink: granted {}", range);
        self.events.push(PhySchedEvent::Granted(client_id, range));
    }

    fn slots_revoked(&mut self, client_id: ClientId, range: SlotRange) {
        tracing::debug!(client = client_id, "sink: revoked {}", range);
        self.events.push(PhySchedEvent::Revoked(client_id, range));
    }
}
