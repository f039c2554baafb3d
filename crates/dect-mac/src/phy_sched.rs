use as_any::AsAny;
use dect_core::{ClientId, SlotRange};

/// Downstream hand-off to the PHY scheduler.
/// The MAC calls this after its slot map has changed; reprogramming radio timing is
/// entirely up to the implementor.
pub trait PhySchedTrait: Send + AsAny {
    /// A client was granted `range`; TX/RX timing should follow
    fn slots_granted(&mut self, client_id: ClientId, range: SlotRange);

    /// A client's `range` was freed
    fn slots_revoked(&mut self, _client_id: ClientId, _range: SlotRange) {}
}

/// Scheduler that only reports what it would have programmed
#[derive(Default)]
pub struct LogPhySched;

impl PhySchedTrait for LogPhySched {
    fn slots_granted(&mut self, client_id: ClientId, range: SlotRange) {
        tracing::debug!(client = client_id, "-> phy sched: grant {}", range);
    }

    fn slots_revoked(&mut self, client_id: ClientId, range: SlotRange) {
        tracing::debug!(client = client_id, "-> phy sched: revoke {}", range);
    }
}
