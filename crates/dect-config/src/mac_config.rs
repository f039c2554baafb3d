use std::sync::{Arc, RwLock};

use dect_core::{MAX_CLIENTS, MAX_SLOTS, SlotAllocator};

/// Frame layout
#[derive(Debug, Clone)]
pub struct CfgFrame {
    /// Number of slots in one frame. Fixed for the lifetime of the slot map.
    pub max_slots: u16,
}

impl Default for CfgFrame {
    fn default() -> Self {
        Self { max_slots: MAX_SLOTS }
    }
}

#[derive(Debug, Clone)]
pub struct CfgClients {
    /// Upper bound on simultaneously admitted clients
    pub max_clients: usize,
}

impl Default for CfgClients {
    fn default() -> Self {
        Self { max_clients: MAX_CLIENTS }
    }
}

/// Cluster TDMA parameters for a client. The slot demand per frame is
/// `packets_per_superframe * slots_per_packet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgClientTdma {
    pub start_frame: u16,
    pub packets_per_superframe: u8,
    pub slots_per_packet: u8,
}

impl CfgClientTdma {
    pub fn slots_needed(&self) -> u16 {
        self.packets_per_superframe as u16 * self.slots_per_packet as u16
    }
}

#[derive(Debug, Clone)]
pub struct MacConfig {
    pub debug_log: Option<String>,

    pub frame: CfgFrame,

    pub clients: CfgClients,

    /// Used when a client is admitted without an explicit slot count
    pub client_defaults: Option<CfgClientTdma>,
}

impl Default for MacConfig {
    fn default() -> Self {
        Self {
            debug_log: None,
            frame: CfgFrame::default(),
            clients: CfgClients::default(),
            client_defaults: None,
        }
    }
}

impl MacConfig {
    /// Validate that all configuration fields are usable.
    pub fn validate(&self) -> Result<(), &str> {
        if self.frame.max_slots == 0 {
            return Err("frame.max_slots must be at least 1");
        }
        if self.clients.max_clients == 0 {
            return Err("clients.max_clients must be at least 1");
        }
        if let Some(defaults) = &self.client_defaults {
            if defaults.slots_needed() == 0 {
                return Err("client_defaults must request at least one slot");
            }
            if defaults.slots_needed() > self.frame.max_slots {
                return Err("client_defaults requests more slots than the frame holds");
            }
        }
        Ok(())
    }
}

/// Mutable MAC state (lock-protected). Every assign/release happens under `state_write()`.
#[derive(Debug)]
pub struct MacState {
    pub slot_alloc: SlotAllocator,
}

impl MacState {
    pub fn for_config(cfg: &MacConfig) -> Self {
        Self {
            slot_alloc: SlotAllocator::new(cfg.frame.max_slots),
        }
    }
}

/// Shared configuration: immutable config + mutable state.
#[derive(Clone)]
pub struct SharedConfig {
    /// Read-only configuration (immutable after construction).
    cfg: Arc<MacConfig>,
    /// Mutable state guarded with RwLock (written by the MAC, read by diagnostics).
    state: Arc<RwLock<MacState>>,
}

impl SharedConfig {
    pub fn new() -> Self {
        Self::from_config(MacConfig::default())
    }

    /// Builds shared config with fresh state sized to the configured frame
    pub fn from_config(cfg: MacConfig) -> Self {
        let state = MacState::for_config(&cfg);
        Self::from_parts(cfg, state)
    }

    pub fn from_parts(cfg: MacConfig, state: MacState) -> Self {
        // Check config for validity before returning the SharedConfig object
        if let Err(e) = cfg.validate() {
            panic!("Invalid MAC configuration: {}", e);
        }
        if state.slot_alloc.capacity() != cfg.frame.max_slots {
            panic!(
                "Slot allocator capacity {} does not match frame.max_slots {}",
                state.slot_alloc.capacity(),
                cfg.frame.max_slots
            );
        }

        Self {
            cfg: Arc::new(cfg),
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Access immutable config.
    pub fn config(&self) -> Arc<MacConfig> {
        Arc::clone(&self.cfg)
    }

    /// Read guard for mutable state.
    pub fn state_read(&self) -> std::sync::RwLockReadGuard<'_, MacState> {
        self.state.read().expect("MacState RwLock blocked")
    }

    /// Write guard for mutable state.
    pub fn state_write(&self) -> std::sync::RwLockWriteGuard<'_, MacState> {
        self.state.write().expect("MacState RwLock blocked")
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use dect_core::{ClientInfo, SlotRange, debug};

    use super::*;

    #[test]
    fn test_validate() {
        let mut cfg = MacConfig::default();
        assert!(cfg.validate().is_ok());

        cfg.frame.max_slots = 0;
        assert!(cfg.validate().is_err());
        cfg.frame.max_slots = 16;

        cfg.client_defaults = Some(CfgClientTdma { start_frame: 0, packets_per_superframe: 0, slots_per_packet: 4 });
        assert!(cfg.validate().is_err());
        cfg.client_defaults = Some(CfgClientTdma { start_frame: 0, packets_per_superframe: 5, slots_per_packet: 4 });
        assert!(cfg.validate().is_err());
        cfg.client_defaults = Some(CfgClientTdma { start_frame: 0, packets_per_superframe: 2, slots_per_packet: 4 });
        assert!(cfg.validate().is_ok());
    }

    #[test]
    #[should_panic(expected = "Invalid MAC configuration")]
    fn test_invalid_config_panics() {
        let mut cfg = MacConfig::default();
        cfg.clients.max_clients = 0;
        SharedConfig::from_config(cfg);
    }

    #[test]
    fn test_state_sized_to_frame() {
        let mut cfg = MacConfig::default();
        cfg.frame.max_slots = 48;
        let shared = SharedConfig::from_config(cfg);
        assert_eq!(shared.state_read().slot_alloc.capacity(), 48);
    }

    #[test]
    fn test_concurrent_assign_release() {
        debug::setup_logging_verbose();
        let shared = SharedConfig::new();

        let handles: Vec<_> = (1..=8u32)
            .map(|tid| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let mut kept: Vec<ClientInfo> = vec![];
                    for round in 0..40u32 {
                        let mut client = ClientInfo::new(tid * 1000 + round, (tid % 4 + 1) as u16);
                        if shared.state_write().slot_alloc.assign(&mut client).is_err() {
                            continue;
                        }
                        // Keep every other reservation so the map stays partly filled
                        if round % 2 == 0 {
                            shared.state_write().slot_alloc.release(&mut client);
                        } else {
                            kept.push(client);
                        }
                    }
                    kept
                })
            })
            .collect();

        let mut clients: Vec<ClientInfo> = vec![];
        for handle in handles {
            clients.extend(handle.join().unwrap());
        }

        let ranges: Vec<SlotRange> = clients.iter().filter_map(|c| c.assigned_range()).collect();
        for (i, a) in ranges.iter().enumerate() {
            for b in ranges.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "ranges overlap: {} {}", a, b);
            }
        }
        let state = shared.state_read();
        let map = state.slot_alloc.slot_map();
        let total: usize = ranges.iter().map(|r| r.len as usize).sum();
        assert_eq!(map.num_reserved(), total);
        assert!(ranges.iter().all(|r| r.iter().all(|idx| !map.is_free(idx))));
    }
}
