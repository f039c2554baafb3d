use core::fmt;

use dect_config::{CfgClientTdma, SharedConfig};
use dect_core::{ClientId, SlotAllocErr, SlotRange};

use crate::client_mgr::{ClientMgrErr, MacClientMgr};
use crate::phy_sched::{LogPhySched, PhySchedTrait};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacErr {
    Alloc(SlotAllocErr),
    Client(ClientMgrErr),
}

impl From<SlotAllocErr> for MacErr {
    fn from(e: SlotAllocErr) -> Self {
        MacErr::Alloc(e)
    }
}

impl From<ClientMgrErr> for MacErr {
    fn from(e: ClientMgrErr) -> Self {
        MacErr::Client(e)
    }
}

impl fmt::Display for MacErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacErr::Alloc(e) => write!(f, "{}", e),
            MacErr::Client(ClientMgrErr::ClientLimitReached { max_clients }) => {
                write!(f, "client limit of {} reached", max_clients)
            }
            MacErr::Client(ClientMgrErr::AlreadyRegistered { client_id }) => {
                write!(f, "client {} is already admitted", client_id)
            }
        }
    }
}

impl std::error::Error for MacErr {}

/// Read-locked snapshot of slot usage, for operator display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotStatus {
    pub capacity: u16,
    pub num_reserved: usize,
    pub free_runs: Vec<SlotRange>,
    /// (client, granted range), sorted by range start
    pub clients: Vec<(ClientId, SlotRange)>,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} slots reserved", self.num_reserved, self.capacity)?;
        for (client_id, range) in &self.clients {
            write!(f, ", client {} {}", client_id, range)?;
        }
        let largest = self.free_runs.iter().map(|r| r.len).max().unwrap_or(0);
        write!(f, ", {} free runs (largest {})", self.free_runs.len(), largest)
    }
}

/// MAC control component for frame slots.
/// Admits clients, grants them contiguous slot runs, and keeps the PHY scheduler in sync.
pub struct MacSlotMgr {
    config: SharedConfig,
    clients: MacClientMgr,
    phy_sched: Box<dyn PhySchedTrait>,
}

impl MacSlotMgr {
    pub fn new(config: SharedConfig) -> Self {
        Self::with_phy_sched(config, Box::new(LogPhySched))
    }

    pub fn with_phy_sched(config: SharedConfig, phy_sched: Box<dyn PhySchedTrait>) -> Self {
        let max_clients = config.config().clients.max_clients;
        Self {
            config,
            clients: MacClientMgr::new(max_clients),
            phy_sched,
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn clients(&self) -> &MacClientMgr {
        &self.clients
    }

    pub fn phy_sched_mut(&mut self) -> &mut dyn PhySchedTrait {
        self.phy_sched.as_mut()
    }

    /// Admits a client and grants it `num_slots` contiguous slots.
    /// If no slots can be granted, the client is not kept, so its connection attempt is rejected.
    pub fn admit_client(&mut self, client_id: ClientId, num_slots: u16) -> Result<SlotRange, MacErr> {
        let client = match self.clients.register(client_id, num_slots) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(client = client_id, "admission refused: {:?}", e);
                return Err(e.into());
            }
        };

        // Search and mark under one write lock
        let result = self.config.state_write().slot_alloc.assign(client);

        match result {
            Ok(range) => {
                self.phy_sched.slots_granted(client_id, range);
                Ok(range)
            }
            Err(e) => {
                tracing::info!(client = client_id, "rejecting client: {}", e);
                self.clients.remove(client_id);
                Err(e.into())
            }
        }
    }

    /// Admits a client whose demand comes from its cluster TDMA configuration
    pub fn admit_client_tdma(&mut self, client_id: ClientId, tdma: &CfgClientTdma) -> Result<SlotRange, MacErr> {
        tracing::debug!(
            client = client_id,
            "tdma cfg: start_frame {} packets/superframe {} slots/packet {}",
            tdma.start_frame,
            tdma.packets_per_superframe,
            tdma.slots_per_packet
        );
        self.admit_client(client_id, tdma.slots_needed())
    }

    /// Releases a client's slots and forgets the client. Unknown clients are a no-op.
    /// Returns the range that was freed, if any.
    pub fn teardown_client(&mut self, client_id: ClientId) -> Option<SlotRange> {
        let Some(mut client) = self.clients.remove(client_id) else {
            tracing::debug!(client = client_id, "teardown of unknown client");
            return None;
        };

        let freed = self.config.state_write().slot_alloc.release(&mut client);
        if let Some(range) = freed {
            self.phy_sched.slots_revoked(client_id, range);
        }
        freed
    }

    pub fn status(&self) -> SlotStatus {
        let state = self.config.state_read();
        let map = state.slot_alloc.slot_map();

        let mut clients: Vec<(ClientId, SlotRange)> = self
            .clients
            .iter()
            .filter_map(|c| c.assigned_range().map(|r| (c.client_id(), r)))
            .collect();
        clients.sort_by_key(|(_, r)| r.start);

        SlotStatus {
            capacity: map.capacity(),
            num_reserved: map.num_reserved(),
            free_runs: map.free_runs(),
            clients,
        }
    }
}

#[cfg(test)]
mod tests {
    use dect_config::MacConfig;
    use dect_core::{InvalidInput, debug};

    use super::*;

    fn small_mgr(max_slots: u16, max_clients: usize) -> MacSlotMgr {
        let mut cfg = MacConfig::default();
        cfg.frame.max_slots = max_slots;
        cfg.clients.max_clients = max_clients;
        MacSlotMgr::new(SharedConfig::from_config(cfg))
    }

    #[test]
    fn test_rejected_client_is_forgotten() {
        debug::setup_logging_verbose();
        let mut mgr = small_mgr(8, 4);
        assert_eq!(mgr.admit_client(1, 6), Ok(SlotRange::new(0, 6)));

        let res = mgr.admit_client(2, 3);
        assert_eq!(res, Err(MacErr::Alloc(SlotAllocErr::InsufficientCapacity { client_id: 2, needed: 3 })));
        assert!(!mgr.clients().is_known(2));

        let res = mgr.admit_client(3, 0);
        assert_eq!(res, Err(MacErr::Alloc(SlotAllocErr::InvalidInput(InvalidInput::ZeroSlotsNeeded { client_id: 3 }))));
        assert!(!mgr.clients().is_known(3));
    }

    #[test]
    fn test_double_admit_keeps_original_grant() {
        let mut mgr = small_mgr(16, 4);
        mgr.admit_client(1, 4).unwrap();
        assert_eq!(
            mgr.admit_client(1, 2),
            Err(MacErr::Client(ClientMgrErr::AlreadyRegistered { client_id: 1 }))
        );
        assert_eq!(mgr.clients().get(1).and_then(|c| c.assigned_range()), Some(SlotRange::new(0, 4)));
        assert_eq!(mgr.status().num_reserved, 4);
    }

    #[test]
    fn test_status_display() {
        let mut mgr = small_mgr(16, 4);
        mgr.admit_client(7, 4).unwrap();
        mgr.admit_client(8, 2).unwrap();
        mgr.teardown_client(7);
        let status = mgr.status();
        assert_eq!(status.free_runs, vec![SlotRange::new(0, 4), SlotRange::new(6, 10)]);
        assert_eq!(status.to_string(), "2/16 slots reserved, client 8 [4 .. 5], 2 free runs (largest 10)");
    }
}
