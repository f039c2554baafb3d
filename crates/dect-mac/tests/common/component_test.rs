use as_any::AsAny;
use dect_config::{MacConfig, SharedConfig};
use dect_core::{ClientId, SlotRange, SlotState};
use dect_mac::MacSlotMgr;

use super::sink::{PhySchedEvent, PhySchedSink};

/// Creates a default config for testing. It can still be modified as needed
/// before passing it to the ComponentTest constructor
pub fn default_test_config() -> MacConfig {
    MacConfig::default()
}

/// Infrastructure for testing the MAC slot manager
/// Wires a MacSlotMgr to a PhySchedSink so hand-offs can be inspected
pub struct ComponentTest {
    pub config: SharedConfig,
    pub mgr: MacSlotMgr,
}

impl ComponentTest {
    pub fn new(config: MacConfig) -> Self {
        let shared_config = SharedConfig::from_config(config);
        let mgr = MacSlotMgr::with_phy_sched(shared_config.clone(), Box::new(PhySchedSink::default()));
        Self {
            config: shared_config,
            mgr,
        }
    }

    pub fn dump_sink(&mut self) -> Vec<PhySchedEvent> {
        match self.mgr.phy_sched_mut().as_any_mut().downcast_mut::<PhySchedSink>() {
            Some(sink) => sink.take_events(),
            None => panic!("PHY scheduler is not a PhySchedSink"),
        }
    }

    /// Indices currently Reserved in the shared slot map
    pub fn reserved_slots(&self) -> Vec<u16> {
        let state = self.config.state_read();
        state
            .slot_alloc
            .slot_map()
            .iter()
            .filter(|(_, s)| *s == SlotState::Reserved)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Asserts that the map holds exactly the union of all client ranges, and that they are disjoint
    pub fn check_invariant(&self) {
        let ranges: Vec<(ClientId, SlotRange)> = self
            .mgr
            .clients()
            .iter()
            .filter_map(|c| c.assigned_range().map(|r| (c.client_id(), r)))
            .collect();
        for (i, (ca, a)) in ranges.iter().enumerate() {
            for (cb, b) in ranges.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "client {} {} overlaps client {} {}", ca, a, cb, b);
            }
        }
        let mut expected: Vec<u16> = ranges.iter().flat_map(|(_, r)| r.iter()).collect();
        expected.sort_unstable();
        assert_eq!(self.reserved_slots(), expected);
    }
}
